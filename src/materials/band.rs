//! Standard octave bands

use serde::{Deserialize, Serialize};

/// Number of octave bands carried by every material
pub const NUM_OCTAVE_BANDS: usize = 6;

/// Octave band centre frequencies, 125 Hz to 4 kHz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OctaveBand {
    #[serde(rename = "125")]
    Hz125,
    #[serde(rename = "250")]
    Hz250,
    #[serde(rename = "500")]
    Hz500,
    #[serde(rename = "1000")]
    Hz1000,
    #[serde(rename = "2000")]
    Hz2000,
    #[serde(rename = "4000")]
    Hz4000,
}

impl OctaveBand {
    pub const ALL: [OctaveBand; NUM_OCTAVE_BANDS] = [
        OctaveBand::Hz125,
        OctaveBand::Hz250,
        OctaveBand::Hz500,
        OctaveBand::Hz1000,
        OctaveBand::Hz2000,
        OctaveBand::Hz4000,
    ];

    /// Position of the band in coefficient arrays
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Centre frequency in Hz
    pub fn center_hz(&self) -> f64 {
        125.0 * (1u32 << self.index()) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_centres() {
        let centres: Vec<f64> = OctaveBand::ALL.iter().map(|b| b.center_hz()).collect();
        assert_eq!(centres, vec![125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0]);
    }

    #[test]
    fn test_band_serializes_as_frequency() {
        let json = serde_json::to_string(&OctaveBand::Hz1000).unwrap();
        assert_eq!(json, "\"1000\"");
    }
}
