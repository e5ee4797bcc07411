//! Engine configuration
//!
//! Every tunable constant of the analysis engine lives here. Defaults
//! reproduce the reference calculator; a JSON file can override any subset
//! of fields.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AcousticError, Result};

// ============================================================================
// Defaults
// ============================================================================

/// Speed of sound used throughout the engine (m/s)
pub const DEFAULT_SPEED_OF_SOUND: f64 = 340.0;

/// Average absorption coefficient of the simple broadband RT60 model
pub const DEFAULT_SIMPLE_ABSORPTION: f64 = 0.25;

/// Coefficient substituted for materials missing from the table
pub const DEFAULT_FALLBACK_COEFFICIENT: f64 = 0.25;

/// RT60 reported before clamping when total absorption is zero (s)
pub const DEFAULT_DEGENERATE_RT60: f64 = 10.0;

// ============================================================================
// Types
// ============================================================================

/// Inclusive range used to clamp RT60 results (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClampRange {
    pub min: f64,
    pub max: f64,
}

impl ClampRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a value into the range
    pub fn apply(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !(self.min > 0.0) || !(self.max >= self.min) || !self.max.is_finite() {
            return Err(AcousticError::invalid_parameter(
                name,
                format!("[{}, {}]", self.min, self.max),
                "0 < min <= max < inf",
            ));
        }
        Ok(())
    }
}

/// What to do when a surface references a material missing from the table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MaterialPolicy {
    /// Substitute a fixed coefficient in every band and log a warning
    Fallback { coefficient: f64 },
    /// Fail with `UnknownMaterial`
    Strict,
}

impl Default for MaterialPolicy {
    fn default() -> Self {
        MaterialPolicy::Fallback {
            coefficient: DEFAULT_FALLBACK_COEFFICIENT,
        }
    }
}

/// Tunable constants of the analysis engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Speed of sound (m/s)
    pub speed_of_sound: f64,
    /// Fixed average absorption of the simple broadband model
    pub simple_absorption_coefficient: f64,
    /// Clamp applied to the simple broadband RT60
    pub simple_rt60_clamp: ClampRange,
    /// Clamp applied to every material-aware RT60 value
    pub band_rt60_clamp: ClampRange,
    /// Value standing in for "infinite" reverberation before clamping
    pub degenerate_rt60: f64,
    /// Default cutoff for mode enumeration (Hz)
    pub mode_max_frequency: f64,
    /// Cutoff below which axial modes are flagged as problematic (Hz)
    pub problematic_mode_frequency: f64,
    /// Minimum source-to-listener distance (m)
    pub floor_distance: f64,
    /// Default SPL grid spacing (m)
    pub grid_resolution: f64,
    /// Unknown material handling
    pub material_policy: MaterialPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            speed_of_sound: DEFAULT_SPEED_OF_SOUND,
            simple_absorption_coefficient: DEFAULT_SIMPLE_ABSORPTION,
            simple_rt60_clamp: ClampRange::new(0.3, 2.5),
            band_rt60_clamp: ClampRange::new(0.1, 5.0),
            degenerate_rt60: DEFAULT_DEGENERATE_RT60,
            mode_max_frequency: 300.0,
            problematic_mode_frequency: 200.0,
            floor_distance: 0.25,
            grid_resolution: 0.5,
            material_policy: MaterialPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file; missing fields keep defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AcousticError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded engine configuration from {}", path.display());
        Ok(config)
    }

    /// Validate all constants
    pub fn validate(&self) -> Result<()> {
        let positives = [
            ("speed_of_sound", self.speed_of_sound),
            ("degenerate_rt60", self.degenerate_rt60),
            ("mode_max_frequency", self.mode_max_frequency),
            ("problematic_mode_frequency", self.problematic_mode_frequency),
            ("floor_distance", self.floor_distance),
            ("grid_resolution", self.grid_resolution),
        ];
        for (name, value) in positives {
            if !(value > 0.0) || !value.is_finite() {
                return Err(AcousticError::invalid_parameter(name, value, "> 0"));
            }
        }
        if !(0.0..=1.0).contains(&self.simple_absorption_coefficient) {
            return Err(AcousticError::invalid_parameter(
                "simple_absorption_coefficient",
                self.simple_absorption_coefficient,
                "0.0 to 1.0",
            ));
        }
        if let MaterialPolicy::Fallback { coefficient } = self.material_policy {
            if !(0.0..=1.0).contains(&coefficient) {
                return Err(AcousticError::invalid_parameter(
                    "material_policy.coefficient",
                    coefficient,
                    "0.0 to 1.0",
                ));
            }
        }
        self.simple_rt60_clamp.validate("simple_rt60_clamp")?;
        self.band_rt60_clamp.validate("band_rt60_clamp")?;
        Ok(())
    }
}
