//! Acoustic Analysis
//!
//! Pure computations over immutable inputs:
//! - reverberation time (simple broadband and material-aware per band)
//! - room modes below a cutoff
//! - SPL fields over the footprint
//! - amplifier sizing and headroom
//! - instrument suitability and treatment recommendations

mod amplification;
mod directivity;
mod modes;
mod recommendations;
mod reverb;
mod spl;
mod suitability;

pub use amplification::{
    AmplificationSizer, ChannelGroup, GroupLevel, Headroom, HeadroomVerdict, PowerSummary,
    SpeakerLayout,
};
pub use directivity::{
    CosineLobe, Directivity, DirectivityPattern, FixedOffset, Omnidirectional, DEFAULT_HORN_GAIN_DB,
};
pub use modes::{ModalAnalyzer, ModeCounts, ModeKind, RoomMode};
pub use recommendations::{recommend, Finding, Recommendation};
pub use reverb::{sabine_rt60, BandRt60, ReverberationEstimator, Rt60Profile, SABINE_CONSTANT};
pub use spl::{
    energy_sum, required_power, spl_at_distance, GridSpec, Point, SoundSource, SplField,
    SplFieldSimulator,
};
pub use suitability::{IdealRange, InstrumentProfile, SuitabilityResult, SuitabilityScorer, Verdict};
