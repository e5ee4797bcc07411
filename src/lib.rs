//! Acustica - Room Acoustics Analysis Engine
//!
//! Estimates how a rectangular room behaves acoustically:
//! 1. Reverberation time (fixed-coefficient and material-aware per octave band)
//! 2. Room modes and the Schroeder frequency
//! 3. Sound pressure level fields from point sources
//! 4. Amplifier sizing and headroom
//! 5. Suitability for an instrument or use case, with treatment advice
//!
//! # Architecture
//!
//! Every computation is a pure function of immutable inputs. The
//! [`AcousticEngine`] owns the read-only reference catalogs and the
//! configuration, and turns a [`ParameterBundle`] into an
//! [`AnalysisReport`]. Bundles, not reports, are what gets saved.

pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod materials;
pub mod room;
pub mod state;

pub use config::EngineConfig;
pub use engine::{AcousticEngine, AnalysisReport};
pub use error::{AcousticError, Result};
pub use room::RoomGeometry;
pub use state::{ParameterBundle, ProjectStore};
