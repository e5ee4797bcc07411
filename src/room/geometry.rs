//! Room geometry
//!
//! Validated dimensions of a rectangular room and the scalar properties
//! derived from them. A geometry is never mutated; a new one replaces it.

use serde::{Deserialize, Serialize};

use crate::error::{AcousticError, Result};

/// Golden ratio used to rate length/width proportions
const GOLDEN_RATIO: f64 = 1.618;

/// Deviation from the golden ratio still rated optimal
const OPTIMAL_RATIO_TOLERANCE: f64 = 0.3;

/// Deviation from the golden ratio still rated good
const GOOD_RATIO_TOLERANCE: f64 = 0.6;

/// One of the three room axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Length,
    Width,
    Height,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Length, Axis::Width, Axis::Height];

    pub fn name(&self) -> &'static str {
        match self {
            Axis::Length => "length",
            Axis::Width => "width",
            Axis::Height => "height",
        }
    }
}

/// Qualitative rating of the length/width ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProportionQuality {
    Optimal,
    Good,
    NeedsImprovement,
}

/// Unvalidated dimensions as supplied by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

/// Rectangular room, all dimensions in meters and strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RoomDimensions")]
pub struct RoomGeometry {
    length: f64,
    width: f64,
    height: f64,
}

impl TryFrom<RoomDimensions> for RoomGeometry {
    type Error = AcousticError;

    fn try_from(raw: RoomDimensions) -> Result<Self> {
        RoomGeometry::new(raw.length, raw.width, raw.height)
    }
}

impl RoomGeometry {
    /// Create a geometry, failing with `InvalidGeometry` on any
    /// non-positive or non-finite dimension.
    ///
    /// Practical floors (1 m length/width, 2 m height) belong to the
    /// input layer and are not enforced here.
    pub fn new(length: f64, width: f64, height: f64) -> Result<Self> {
        for (dimension, value) in [("length", length), ("width", width), ("height", height)] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(AcousticError::InvalidGeometry { dimension, value });
            }
        }
        Ok(Self {
            length,
            width,
            height,
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Dimension along an axis
    pub fn dimension(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Length => self.length,
            Axis::Width => self.width,
            Axis::Height => self.height,
        }
    }

    /// Volume in m³
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Total boundary surface in m²
    pub fn surface_area(&self) -> f64 {
        2.0 * (self.length * self.width + self.length * self.height + self.width * self.height)
    }

    /// Floor area in m²
    pub fn floor_area(&self) -> f64 {
        self.length * self.width
    }

    /// Ratio between two dimensions, `dim_a / dim_b`
    pub fn aspect(&self, dim_a: Axis, dim_b: Axis) -> f64 {
        self.dimension(dim_a) / self.dimension(dim_b)
    }

    /// Length over width
    pub fn aspect_lw(&self) -> f64 {
        self.aspect(Axis::Length, Axis::Width)
    }

    /// Rate the length/width ratio against the golden ratio
    pub fn proportion_quality(&self) -> ProportionQuality {
        let deviation = (self.aspect_lw() - GOLDEN_RATIO).abs();
        if deviation < OPTIMAL_RATIO_TOLERANCE {
            ProportionQuality::Optimal
        } else if deviation < GOOD_RATIO_TOLERANCE {
            ProportionQuality::Good
        } else {
            ProportionQuality::NeedsImprovement
        }
    }

    /// First axial mode along each axis, `c / (2 * dim)`
    pub fn axial_fundamentals(&self, speed_of_sound: f64) -> [(Axis, f64); 3] {
        Axis::ALL.map(|axis| (axis, speed_of_sound / (2.0 * self.dimension(axis))))
    }

    /// Whether a floor-plane point lies inside the footprint (edges included)
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        (0.0..=self.length).contains(&x) && (0.0..=self.width).contains(&y)
    }
}
