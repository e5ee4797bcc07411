//! Surface assignments
//!
//! Maps materials to exposed areas for one analysis. The total is expected
//! to approximate the room surface but is not required to: partial or
//! over-specified coverage only changes the summed absorption.

use serde::{Deserialize, Serialize};

use crate::error::{AcousticError, Result};
use crate::room::RoomGeometry;

/// One material covering an area (m²)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceArea {
    pub material: String,
    pub area: f64,
}

/// Ordered list of material areas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SurfaceArea>", into = "Vec<SurfaceArea>")]
pub struct SurfaceAssignment {
    surfaces: Vec<SurfaceArea>,
}

impl TryFrom<Vec<SurfaceArea>> for SurfaceAssignment {
    type Error = AcousticError;

    fn try_from(surfaces: Vec<SurfaceArea>) -> Result<Self> {
        let mut assignment = SurfaceAssignment::default();
        for surface in surfaces {
            assignment.add(surface.material, surface.area)?;
        }
        Ok(assignment)
    }
}

impl From<SurfaceAssignment> for Vec<SurfaceArea> {
    fn from(assignment: SurfaceAssignment) -> Self {
        assignment.surfaces
    }
}

impl SurfaceAssignment {
    /// Build from (material, area) pairs
    pub fn from_areas<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut assignment = Self::default();
        for (material, area) in pairs {
            assignment.add(material, area)?;
        }
        Ok(assignment)
    }

    /// Build from (material, percent of total room surface) pairs
    pub fn from_coverage<I>(geometry: &RoomGeometry, coverage: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let total = geometry.surface_area();
        let mut assignment = Self::default();
        for (material, percent) in coverage {
            if !(percent >= 0.0) || !percent.is_finite() {
                return Err(AcousticError::invalid_parameter(
                    format!("coverage[{}]", material),
                    percent,
                    ">= 0 %",
                ));
            }
            assignment.add(material, total * percent / 100.0)?;
        }
        Ok(assignment)
    }

    /// Append a material area; areas must be finite and >= 0
    pub fn add(&mut self, material: impl Into<String>, area: f64) -> Result<()> {
        let material = material.into();
        if !(area >= 0.0) || !area.is_finite() {
            return Err(AcousticError::NegativeArea { material, area });
        }
        self.surfaces.push(SurfaceArea { material, area });
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SurfaceArea> {
        self.surfaces.iter()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Sum of all assigned areas
    pub fn total_area(&self) -> f64 {
        self.surfaces.iter().map(|s| s.area).sum()
    }

    /// Assigned area relative to the room surface (1.0 = full coverage)
    pub fn coverage_ratio(&self, geometry: &RoomGeometry) -> f64 {
        self.total_area() / geometry.surface_area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_area_rejected() {
        let err = SurfaceAssignment::from_areas([("carpet".to_string(), -1.0)]).unwrap_err();
        assert_eq!(err.error_code(), "NEGATIVE_AREA");
    }

    #[test]
    fn test_zero_area_allowed() {
        let surfaces = SurfaceAssignment::from_areas([("glass".to_string(), 0.0)]).unwrap();
        assert_eq!(surfaces.len(), 1);
        assert_eq!(surfaces.total_area(), 0.0);
    }

    #[test]
    fn test_from_coverage() {
        let room = RoomGeometry::new(10.0, 8.0, 3.0).unwrap();
        let surfaces = SurfaceAssignment::from_coverage(
            &room,
            [("plaster".to_string(), 75.0), ("acoustic_panel".to_string(), 25.0)],
        )
        .unwrap();
        assert!((surfaces.total_area() - 208.0).abs() < 1e-9);
        assert!((surfaces.coverage_ratio(&room) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_deserialize_validates_areas() {
        let ok: SurfaceAssignment =
            serde_json::from_str(r#"[{"material": "carpet", "area": 80.0}]"#).unwrap();
        assert_eq!(ok.len(), 1);

        let bad = serde_json::from_str::<SurfaceAssignment>(r#"[{"material": "carpet", "area": -3.0}]"#);
        assert!(bad.is_err());
    }
}
