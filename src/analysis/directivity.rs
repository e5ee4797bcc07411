//! Directivity strategies
//!
//! A simplified, frequency-independent pattern giving the dB offset of a
//! source as a function of the angle from its forward axis. Callers pick
//! the strategy explicitly.

use serde::{Deserialize, Serialize};

/// Offset applied to horn/directional sources (dB)
pub const DEFAULT_HORN_GAIN_DB: f64 = 3.0;

/// Angle-dependent level offset of a source
pub trait DirectivityPattern {
    /// Offset in dB at `angle` radians off the forward axis
    fn gain_db(&self, angle: f64) -> f64;
}

/// Same level in every direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Omnidirectional;

impl DirectivityPattern for Omnidirectional {
    fn gain_db(&self, _angle: f64) -> f64 {
        0.0
    }
}

/// Constant offset regardless of angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedOffset {
    pub gain_db: f64,
}

impl DirectivityPattern for FixedOffset {
    fn gain_db(&self, _angle: f64) -> f64 {
        self.gain_db
    }
}

/// Offset modulated by `cos(2θ)²`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosineLobe {
    pub gain_db: f64,
}

impl DirectivityPattern for CosineLobe {
    fn gain_db(&self, angle: f64) -> f64 {
        let lobe = (2.0 * angle).cos();
        self.gain_db * lobe * lobe
    }
}

/// Serializable selection of a directivity strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum Directivity {
    #[default]
    Omnidirectional,
    FixedOffset { gain_db: f64 },
    CosineLobe { gain_db: f64 },
}

impl Directivity {
    /// Flat horn offset
    pub fn horn() -> Self {
        Directivity::FixedOffset {
            gain_db: DEFAULT_HORN_GAIN_DB,
        }
    }

    /// Angle-modulated horn pattern
    pub fn horn_lobe() -> Self {
        Directivity::CosineLobe {
            gain_db: DEFAULT_HORN_GAIN_DB,
        }
    }
}

impl DirectivityPattern for Directivity {
    fn gain_db(&self, angle: f64) -> f64 {
        match *self {
            Directivity::Omnidirectional => Omnidirectional.gain_db(angle),
            Directivity::FixedOffset { gain_db } => FixedOffset { gain_db }.gain_db(angle),
            Directivity::CosineLobe { gain_db } => CosineLobe { gain_db }.gain_db(angle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn test_omnidirectional_is_flat() {
        for angle in [0.0, 0.3, FRAC_PI_2, 3.0] {
            assert_eq!(Directivity::Omnidirectional.gain_db(angle), 0.0);
        }
    }

    #[test]
    fn test_fixed_offset() {
        let horn = Directivity::horn();
        assert_eq!(horn.gain_db(0.0), 3.0);
        assert_eq!(horn.gain_db(1.2), 3.0);
    }

    #[test]
    fn test_cosine_lobe() {
        let lobe = Directivity::horn_lobe();
        assert_abs_diff_eq!(lobe.gain_db(0.0), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(lobe.gain_db(FRAC_PI_4), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(lobe.gain_db(FRAC_PI_2), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&Directivity::horn()).unwrap();
        assert_eq!(json, r#"{"pattern":"fixed_offset","gain_db":3.0}"#);
        let back: Directivity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Directivity::horn());
    }
}
