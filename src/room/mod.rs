//! Room Model
//!
//! Geometry and descriptive profile of the analysed room.

mod geometry;
mod profile;

pub use geometry::{Axis, ProportionQuality, RoomDimensions, RoomGeometry};
pub use profile::{RoomType, UseType};
