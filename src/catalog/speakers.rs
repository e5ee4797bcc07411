//! Loudspeaker catalog
//!
//! Read-only reference entries; users may also enter a `SpeakerSpec` by
//! hand, which goes through the same validation.

use serde::{Deserialize, Serialize};

use crate::analysis::Directivity;
use crate::error::{AcousticError, Result};

/// How a speaker is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerKind {
    /// Needs an external amplifier channel
    Passive,
    /// Built-in amplification
    Active,
    Subwoofer,
}

impl SpeakerKind {
    pub const ALL: [SpeakerKind; 3] = [SpeakerKind::Passive, SpeakerKind::Active, SpeakerKind::Subwoofer];

    pub fn name(&self) -> &'static str {
        match self {
            SpeakerKind::Passive => "passive",
            SpeakerKind::Active => "active",
            SpeakerKind::Subwoofer => "subwoofer",
        }
    }
}

/// Coarse radiation class of a speaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectivityClass {
    #[default]
    Omnidirectional,
    Horn,
}

impl DirectivityClass {
    /// Default strategy for the class (flat offset for horns)
    pub fn default_pattern(&self) -> Directivity {
        match self {
            DirectivityClass::Omnidirectional => Directivity::Omnidirectional,
            DirectivityClass::Horn => Directivity::horn(),
        }
    }
}

/// Loudspeaker parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerSpec {
    pub brand: String,
    pub model: String,
    pub kind: SpeakerKind,
    /// dB SPL at 1 W / 1 m
    pub sensitivity_db: f64,
    /// Peak power handling (W)
    pub max_power_watts: f64,
    /// Continuous (RMS) power handling (W)
    pub nominal_power_watts: f64,
    pub impedance_ohms: f64,
    #[serde(default)]
    pub directivity: DirectivityClass,
}

impl SpeakerSpec {
    pub fn validate(&self) -> Result<()> {
        if !self.sensitivity_db.is_finite() {
            return Err(AcousticError::invalid_parameter(
                "sensitivity_db",
                self.sensitivity_db,
                "a finite dB value",
            ));
        }
        for value in [self.max_power_watts, self.nominal_power_watts] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(AcousticError::InvalidPower { value });
            }
        }
        if self.nominal_power_watts > self.max_power_watts {
            return Err(AcousticError::invalid_parameter(
                "nominal_power_watts",
                self.nominal_power_watts,
                format!("<= max_power_watts ({})", self.max_power_watts),
            ));
        }
        if !(self.impedance_ohms > 0.0) || !self.impedance_ohms.is_finite() {
            return Err(AcousticError::invalid_parameter(
                "impedance_ohms",
                self.impedance_ohms,
                "> 0 Ω",
            ));
        }
        Ok(())
    }

    /// "Brand Model"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// (brand, model, kind, sensitivity, max W, nominal W, Ω, directivity)
type CatalogRow = (&'static str, &'static str, SpeakerKind, f64, f64, f64, f64, DirectivityClass);

const BUILTIN_SPEAKERS: &[CatalogRow] = &[
    ("Generic", "Passive 8", SpeakerKind::Passive, 89.0, 300.0, 150.0, 8.0, DirectivityClass::Omnidirectional),
    ("Generic", "Passive 12", SpeakerKind::Passive, 96.0, 800.0, 400.0, 8.0, DirectivityClass::Horn),
    ("Generic", "Passive 15", SpeakerKind::Passive, 98.0, 1000.0, 500.0, 8.0, DirectivityClass::Horn),
    ("Generic", "Active 10", SpeakerKind::Active, 95.0, 600.0, 300.0, 8.0, DirectivityClass::Horn),
    ("Generic", "Active 12", SpeakerKind::Active, 97.0, 1000.0, 500.0, 8.0, DirectivityClass::Horn),
    ("Generic", "Studio Monitor 5", SpeakerKind::Active, 86.0, 100.0, 50.0, 8.0, DirectivityClass::Omnidirectional),
    ("Generic", "Sub 15", SpeakerKind::Subwoofer, 97.0, 1200.0, 600.0, 8.0, DirectivityClass::Omnidirectional),
    ("Generic", "Sub 18", SpeakerKind::Subwoofer, 99.0, 2000.0, 1000.0, 8.0, DirectivityClass::Omnidirectional),
];

/// Lookup table of known speakers
#[derive(Debug, Clone, Default)]
pub struct SpeakerCatalog {
    speakers: Vec<SpeakerSpec>,
}

impl SpeakerCatalog {
    pub fn builtin() -> Self {
        let speakers = BUILTIN_SPEAKERS
            .iter()
            .map(
                |&(brand, model, kind, sensitivity_db, max_power_watts, nominal_power_watts, impedance_ohms, directivity)| {
                    SpeakerSpec {
                        brand: brand.to_string(),
                        model: model.to_string(),
                        kind,
                        sensitivity_db,
                        max_power_watts,
                        nominal_power_watts,
                        impedance_ohms,
                        directivity,
                    }
                },
            )
            .collect();
        Self { speakers }
    }

    /// Add a validated entry
    pub fn insert(&mut self, spec: SpeakerSpec) -> Result<()> {
        spec.validate()?;
        self.speakers.push(spec);
        Ok(())
    }

    /// Find by brand and model, case-insensitive
    pub fn find(&self, brand: &str, model: &str) -> Result<&SpeakerSpec> {
        self.speakers
            .iter()
            .find(|s| s.brand.eq_ignore_ascii_case(brand.trim()) && s.model.eq_ignore_ascii_case(model.trim()))
            .ok_or_else(|| AcousticError::UnknownSpeaker {
                brand: brand.to_string(),
                model: model.to_string(),
            })
    }

    pub fn by_kind(&self, kind: SpeakerKind) -> impl Iterator<Item = &SpeakerSpec> {
        self.speakers.iter().filter(move |s| s.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeakerSpec> {
        self.speakers.iter()
    }

    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }
}
