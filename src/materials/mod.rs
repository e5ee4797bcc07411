//! Materials
//!
//! Frequency-banded absorption coefficients and the surface assignments
//! they are aggregated over.

mod band;
mod surfaces;
mod table;

pub use band::{OctaveBand, NUM_OCTAVE_BANDS};
pub use surfaces::{SurfaceArea, SurfaceAssignment};
pub use table::{normalize_name, MaterialEntry, MaterialTable};
