//! Material absorption table
//!
//! Static reference data: one absorption coefficient per octave band for
//! each named material. Loaded once, read-only afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::band::{OctaveBand, NUM_OCTAVE_BANDS};
use super::surfaces::SurfaceAssignment;
use crate::config::MaterialPolicy;
use crate::error::{AcousticError, Result};

// ============================================================================
// Built-in Materials
// ============================================================================

/// Absorption coefficients at 125, 250, 500, 1000, 2000 and 4000 Hz
const BUILTIN_MATERIALS: &[(&str, [f64; NUM_OCTAVE_BANDS])] = &[
    ("concrete", [0.01, 0.01, 0.02, 0.02, 0.02, 0.03]),
    ("plaster", [0.01, 0.02, 0.02, 0.03, 0.04, 0.05]),
    ("brick", [0.03, 0.03, 0.03, 0.04, 0.05, 0.07]),
    ("drywall", [0.29, 0.10, 0.05, 0.04, 0.07, 0.09]),
    ("wood", [0.10, 0.08, 0.08, 0.08, 0.08, 0.08]),
    ("glass", [0.18, 0.06, 0.04, 0.03, 0.02, 0.02]),
    ("carpet", [0.02, 0.06, 0.15, 0.40, 0.60, 0.60]),
    ("curtain", [0.07, 0.30, 0.50, 0.70, 0.70, 0.65]),
    ("acoustic_foam", [0.08, 0.25, 0.65, 0.90, 0.95, 0.95]),
    ("acoustic_panel", [0.25, 0.70, 0.95, 0.98, 0.97, 0.95]),
    ("bass_trap", [0.60, 0.85, 0.95, 0.95, 0.90, 0.85]),
    ("diffuser", [0.15, 0.20, 0.25, 0.25, 0.25, 0.25]),
    ("audience", [0.25, 0.35, 0.42, 0.46, 0.50, 0.50]),
];

/// Normalize a material name for lookup ("Acoustic Foam" -> "acoustic_foam")
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

// ============================================================================
// Material Entry
// ============================================================================

/// A named material with one absorption coefficient per octave band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    pub name: String,
    pub coefficients: [f64; NUM_OCTAVE_BANDS],
}

impl MaterialEntry {
    /// Create an entry, every coefficient must lie in [0, 1]
    pub fn new(name: &str, coefficients: [f64; NUM_OCTAVE_BANDS]) -> Result<Self> {
        for (band, value) in OctaveBand::ALL.iter().zip(coefficients) {
            if !(0.0..=1.0).contains(&value) {
                return Err(AcousticError::invalid_parameter(
                    format!("{}@{}Hz", name, band.center_hz()),
                    value,
                    "0.0 to 1.0",
                ));
            }
        }
        Ok(Self {
            name: normalize_name(name),
            coefficients,
        })
    }

    pub fn coefficient(&self, band: OctaveBand) -> f64 {
        self.coefficients[band.index()]
    }

    /// Mean coefficient across all bands
    pub fn average(&self) -> f64 {
        self.coefficients.iter().sum::<f64>() / NUM_OCTAVE_BANDS as f64
    }
}

// ============================================================================
// Material Table
// ============================================================================

/// Lookup table of materials plus the policy for names it does not know
#[derive(Debug, Clone)]
pub struct MaterialTable {
    entries: BTreeMap<String, MaterialEntry>,
    policy: MaterialPolicy,
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MaterialTable {
    /// Empty table with the default fallback policy
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            policy: MaterialPolicy::default(),
        }
    }

    /// Table pre-populated with the built-in materials
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (name, coefficients) in BUILTIN_MATERIALS {
            table.entries.insert(
                name.to_string(),
                MaterialEntry {
                    name: name.to_string(),
                    coefficients: *coefficients,
                },
            );
        }
        table
    }

    /// Replace the unknown-material policy
    pub fn with_policy(mut self, policy: MaterialPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MaterialPolicy {
        self.policy
    }

    /// Add or replace a material
    pub fn insert(&mut self, entry: MaterialEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&MaterialEntry> {
        self.entries.get(&normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All materials in name order
    pub fn iter(&self) -> impl Iterator<Item = &MaterialEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Absorption coefficient of a material in one band.
    ///
    /// Unknown names resolve through the table's policy: the fallback
    /// coefficient (logged) or `UnknownMaterial`.
    pub fn coefficient(&self, material_name: &str, band: OctaveBand) -> Result<f64> {
        if let Some(entry) = self.get(material_name) {
            return Ok(entry.coefficient(band));
        }
        match self.policy {
            MaterialPolicy::Fallback { coefficient } => {
                log::warn!(
                    "Unknown material '{}', using fallback coefficient {} at {} Hz",
                    material_name,
                    coefficient,
                    band.center_hz()
                );
                Ok(coefficient)
            }
            MaterialPolicy::Strict => Err(AcousticError::UnknownMaterial {
                name: material_name.to_string(),
            }),
        }
    }

    /// Total absorption in m² sabins: Σ area × coefficient(material, band)
    pub fn aggregate_absorption(&self, assignments: &SurfaceAssignment, band: OctaveBand) -> Result<f64> {
        assignments.iter().try_fold(0.0, |total, surface| -> Result<f64> {
            Ok(total + surface.area * self.coefficient(&surface.material, band)?)
        })
    }

    /// Names in the assignment that the table does not know
    pub fn unknown_materials<'a>(&self, assignments: &'a SurfaceAssignment) -> Vec<&'a str> {
        assignments
            .iter()
            .map(|s| s.material.as_str())
            .filter(|name| !self.contains(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(pairs: &[(&str, f64)]) -> SurfaceAssignment {
        SurfaceAssignment::from_areas(pairs.iter().map(|(m, a)| (m.to_string(), *a))).unwrap()
    }

    #[test]
    fn test_builtin_lookup() {
        let table = MaterialTable::builtin();
        assert_eq!(table.len(), BUILTIN_MATERIALS.len());
        assert!((table.coefficient("carpet", OctaveBand::Hz1000).unwrap() - 0.40).abs() < 1e-12);
        assert!((table.coefficient("Acoustic Foam", OctaveBand::Hz500).unwrap() - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_builtin_coefficients_in_range() {
        for entry in MaterialTable::builtin().iter() {
            assert!(MaterialEntry::new(&entry.name, entry.coefficients).is_ok(), "{}", entry.name);
        }
    }

    #[test]
    fn test_unknown_material_fallback() {
        let table = MaterialTable::builtin();
        let coeff = table.coefficient("unobtanium", OctaveBand::Hz125).unwrap();
        assert!((coeff - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_material_strict() {
        let table = MaterialTable::builtin().with_policy(MaterialPolicy::Strict);
        let err = table.coefficient("unobtanium", OctaveBand::Hz125).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_MATERIAL");
    }

    #[test]
    fn test_aggregate_absorption() {
        let table = MaterialTable::builtin();
        let surfaces = assignment(&[("carpet", 80.0), ("plaster", 128.0)]);
        let a = table.aggregate_absorption(&surfaces, OctaveBand::Hz1000).unwrap();
        assert!((a - (80.0 * 0.40 + 128.0 * 0.03)).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_tolerates_partial_coverage() {
        let table = MaterialTable::builtin();
        let empty = SurfaceAssignment::default();
        assert_eq!(table.aggregate_absorption(&empty, OctaveBand::Hz500).unwrap(), 0.0);
    }

    #[test]
    fn test_unknown_materials_listed() {
        let table = MaterialTable::builtin();
        let surfaces = assignment(&[("carpet", 10.0), ("velvet", 5.0)]);
        assert_eq!(table.unknown_materials(&surfaces), vec!["velvet"]);
    }

    #[test]
    fn test_entry_rejects_out_of_range() {
        assert!(MaterialEntry::new("bad", [0.1, 0.2, 1.2, 0.3, 0.3, 0.3]).is_err());
        let custom = MaterialEntry::new("Cork Tiles", [0.05, 0.1, 0.2, 0.55, 0.6, 0.55]).unwrap();
        assert_eq!(custom.name, "cork_tiles");
        assert!((custom.average() - 2.05 / 6.0).abs() < 1e-12);
    }
}
