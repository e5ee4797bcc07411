//! Reference Catalogs
//!
//! Static lookup data consumed by the engine. The material table lives in
//! `materials`; instrument profiles live with the suitability scorer.

mod speakers;

pub use speakers::{DirectivityClass, SpeakerCatalog, SpeakerKind, SpeakerSpec};
