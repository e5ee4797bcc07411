//! Parameter bundle
//!
//! The full set of user inputs for one analysis. This, not the derived
//! results, is the unit of save/load: reloading a bundle reproduces the
//! same report.

use serde::{Deserialize, Serialize};

use crate::analysis::{ChannelGroup, SoundSource, SpeakerLayout};
use crate::catalog::SpeakerSpec;
use crate::materials::SurfaceAssignment;
use crate::room::{RoomGeometry, RoomType, UseType};

/// Where the main speaker's parameters come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SpeakerRef {
    Catalog { brand: String, model: String },
    Manual { spec: SpeakerSpec },
}

/// Level the system must reach at a listening distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetLevel {
    pub spl_db: f64,
    pub distance: f64,
}

/// All inputs of one analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterBundle {
    pub name: String,
    pub room: RoomGeometry,
    #[serde(default)]
    pub room_type: RoomType,
    #[serde(default)]
    pub use_type: UseType,
    pub instrument: String,
    #[serde(default)]
    pub surfaces: SurfaceAssignment,
    #[serde(default)]
    pub layout: SpeakerLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_speaker: Option<SpeakerRef>,
    #[serde(default)]
    pub channel_groups: Vec<ChannelGroup>,
    #[serde(default)]
    pub sources: Vec<SoundSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetLevel>,
    /// Overrides the configured SPL grid spacing (m)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_resolution: Option<f64>,
    /// Overrides the configured mode cutoff (Hz)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_mode_frequency: Option<f64>,
}

impl ParameterBundle {
    /// Bundle with just a room and a profile; everything else defaulted
    pub fn new(name: &str, room: RoomGeometry, instrument: &str) -> Self {
        Self {
            name: name.to_string(),
            room,
            room_type: RoomType::default(),
            use_type: UseType::default(),
            instrument: instrument.to_string(),
            surfaces: SurfaceAssignment::default(),
            layout: SpeakerLayout::default(),
            main_speaker: None,
            channel_groups: Vec::new(),
            sources: Vec::new(),
            target: None,
            grid_resolution: None,
            max_mode_frequency: None,
        }
    }

    pub fn with_room_type(mut self, room_type: RoomType) -> Self {
        self.room_type = room_type;
        self
    }

    pub fn with_use_type(mut self, use_type: UseType) -> Self {
        self.use_type = use_type;
        self
    }

    pub fn with_surfaces(mut self, surfaces: SurfaceAssignment) -> Self {
        self.surfaces = surfaces;
        self
    }

    pub fn with_layout(mut self, layout: SpeakerLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_main_speaker(mut self, speaker: SpeakerRef) -> Self {
        self.main_speaker = Some(speaker);
        self
    }

    pub fn with_channel_group(mut self, group: ChannelGroup) -> Self {
        self.channel_groups.push(group);
        self
    }

    pub fn with_source(mut self, source: SoundSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_target(mut self, spl_db: f64, distance: f64) -> Self {
        self.target = Some(TargetLevel { spl_db, distance });
        self
    }

    pub fn with_grid_resolution(mut self, resolution: f64) -> Self {
        self.grid_resolution = Some(resolution);
        self
    }

    pub fn with_max_mode_frequency(mut self, frequency: f64) -> Self {
        self.max_mode_frequency = Some(frequency);
        self
    }
}
