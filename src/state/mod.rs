//! State Module
//!
//! Analysis inputs as a saveable bundle, and the directory store that
//! persists them.

mod bundle;
mod store;

pub use bundle::{ParameterBundle, SpeakerRef, TargetLevel};
pub use store::{ProjectDocument, ProjectStore, ProjectSummary, CURRENT_SCHEMA_VERSION};
