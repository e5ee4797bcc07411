//! Room type and main use
//!
//! Descriptive tags chosen by the user. The use type steers the setup
//! recommendations; the room type is carried through for reports.

use serde::{Deserialize, Serialize};

/// Kind of space being analysed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    #[default]
    Studio,
    HomeStudio,
    RehearsalRoom,
    ConcertHall,
    Auditorium,
}

impl RoomType {
    pub const ALL: [RoomType; 5] = [
        RoomType::Studio,
        RoomType::HomeStudio,
        RoomType::RehearsalRoom,
        RoomType::ConcertHall,
        RoomType::Auditorium,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            RoomType::Studio => "Studio",
            RoomType::HomeStudio => "Home studio",
            RoomType::RehearsalRoom => "Rehearsal room",
            RoomType::ConcertHall => "Concert hall",
            RoomType::Auditorium => "Auditorium",
        }
    }
}

/// Main activity the room is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseType {
    #[default]
    Recording,
    Mixing,
    Rehearsal,
    Performance,
    Podcast,
}

impl UseType {
    pub fn display_name(&self) -> &'static str {
        match self {
            UseType::Recording => "Recording",
            UseType::Mixing => "Mixing",
            UseType::Rehearsal => "Rehearsal",
            UseType::Performance => "Performance",
            UseType::Podcast => "Podcast",
        }
    }
}
