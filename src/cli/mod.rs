//! CLI Module
//!
//! Command-line interface for the acoustic analysis engine.

pub mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::room::{RoomType, UseType};

/// Acustica - room acoustics analysis
#[derive(Parser, Debug)]
#[command(name = "acustica")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Room dimensions in metres
#[derive(Args, Debug, Clone, Copy)]
pub struct RoomArgs {
    /// Length (m)
    pub length: f64,

    /// Width (m)
    pub width: f64,

    /// Height (m)
    pub height: f64,
}

/// Profile options shared by `analyze` and `project save`
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Instrument or use-case profile
    #[arg(short, long, default_value = "Voce/Podcast")]
    pub instrument: String,

    /// Main use of the room
    #[arg(long, value_enum, default_value_t = UseArg::Recording)]
    pub use_type: UseArg,

    /// Kind of room
    #[arg(long, value_enum, default_value_t = RoomArg::Studio)]
    pub room_type: RoomArg,

    /// Surface material as NAME=PERCENT of the total surface (repeatable)
    #[arg(short, long = "surface", value_name = "NAME=PERCENT")]
    pub surfaces: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseArg {
    Recording,
    Mixing,
    Rehearsal,
    Performance,
    Podcast,
}

impl From<UseArg> for UseType {
    fn from(arg: UseArg) -> Self {
        match arg {
            UseArg::Recording => UseType::Recording,
            UseArg::Mixing => UseType::Mixing,
            UseArg::Rehearsal => UseType::Rehearsal,
            UseArg::Performance => UseType::Performance,
            UseArg::Podcast => UseType::Podcast,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomArg {
    Studio,
    HomeStudio,
    RehearsalRoom,
    ConcertHall,
    Auditorium,
}

impl From<RoomArg> for RoomType {
    fn from(arg: RoomArg) -> Self {
        match arg {
            RoomArg::Studio => RoomType::Studio,
            RoomArg::HomeStudio => RoomType::HomeStudio,
            RoomArg::RehearsalRoom => RoomType::RehearsalRoom,
            RoomArg::ConcertHall => RoomType::ConcertHall,
            RoomArg::Auditorium => RoomType::Auditorium,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full analysis of a room or a saved project
    #[command(name = "analyze")]
    Analyze {
        /// Length, width and height (m); omit when using --project
        #[arg(num_args = 3, value_names = ["LENGTH", "WIDTH", "HEIGHT"], required_unless_present = "project")]
        dimensions: Vec<f64>,

        /// Analyze a saved project instead
        #[arg(short, long, conflicts_with = "dimensions")]
        project: Option<String>,

        /// Project directory
        #[arg(long, default_value = "projects")]
        store: PathBuf,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List room modes below a cutoff
    #[command(name = "modes")]
    Modes {
        #[command(flatten)]
        room: RoomArgs,

        /// Highest mode frequency (Hz)
        #[arg(short, long)]
        max_frequency: Option<f64>,
    },

    /// SPL field of a single source
    #[command(name = "spl")]
    Spl {
        #[command(flatten)]
        room: RoomArgs,

        /// Source x position (m)
        #[arg(short, long, default_value_t = 1.0)]
        x: f64,

        /// Source y position (m)
        #[arg(short, long, default_value_t = 1.0)]
        y: f64,

        /// Sensitivity (dB SPL, 1 W / 1 m)
        #[arg(long, default_value_t = 96.0)]
        sensitivity: f64,

        /// Catalog speaker as BRAND/MODEL; replaces --sensitivity and sets the directivity
        #[arg(long, value_name = "BRAND/MODEL")]
        speaker: Option<String>,

        /// Electrical power (W)
        #[arg(short, long, default_value_t = 100.0)]
        power: f64,

        /// Grid spacing (m)
        #[arg(short, long)]
        resolution: Option<f64>,
    },

    /// List the material absorption table
    #[command(name = "materials")]
    Materials,

    /// List the speaker catalog
    #[command(name = "speakers")]
    Speakers,

    /// List instrument profiles
    #[command(name = "instruments")]
    Instruments,

    /// Manage saved projects
    #[command(name = "project")]
    Project {
        /// Project directory
        #[arg(long, global = true, default_value = "projects")]
        store: PathBuf,

        #[command(subcommand)]
        action: ProjectCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Save a room as a project
    Save {
        /// Project name
        name: String,

        #[command(flatten)]
        room: RoomArgs,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Replace an existing project
        #[arg(short, long)]
        force: bool,
    },

    /// Print a saved project
    Load {
        /// Project name
        name: String,
    },

    /// List saved projects
    List,

    /// Delete a saved project
    Delete {
        /// Project name
        name: String,
    },
}
