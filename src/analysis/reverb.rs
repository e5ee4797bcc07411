//! Reverberation time estimation
//!
//! Sabine's equation `RT60 = 0.161 * V / A` in two flavours that are kept
//! separate on purpose:
//! - a simple broadband estimate assuming a fixed average absorption over
//!   the whole surface, clamped to the quick-feedback range (0.3-2.5 s)
//! - a material-aware estimate per octave band, clamped to 0.1-5.0 s
//!
//! Zero total absorption never raises: it maps to `degenerate_rt60` before
//! clamping so callers always receive a finite number.

use serde::{Deserialize, Serialize};

use crate::config::{ClampRange, EngineConfig};
use crate::error::Result;
use crate::materials::{MaterialTable, OctaveBand, SurfaceAssignment};
use crate::room::RoomGeometry;

// ============================================================================
// Constants
// ============================================================================

/// Sabine constant in s/m for metric units
pub const SABINE_CONSTANT: f64 = 0.161;

/// Denominator constant of the Schroeder frequency expression
const SCHROEDER_CONSTANT: f64 = 1.316;

/// Raw Sabine RT60, `degenerate` when absorption is zero or NaN.
///
/// An absorption total that overflowed to infinity gives 0.0.
pub fn sabine_rt60(volume: f64, absorption: f64, degenerate: f64) -> f64 {
    if absorption > 0.0 {
        SABINE_CONSTANT * volume / absorption
    } else {
        degenerate
    }
}

// ============================================================================
// RT60 Profile
// ============================================================================

/// RT60 of one octave band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandRt60 {
    pub band: OctaveBand,
    /// Total absorption in m² sabins
    pub absorption: f64,
    /// Clamped reverberation time in seconds
    pub rt60: f64,
}

/// Per-band reverberation times plus a single broadband value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rt60Profile {
    pub bands: Vec<BandRt60>,
    /// Sabine RT60 over the mean absorption of all bands, clamped
    pub broadband: f64,
}

impl Rt60Profile {
    /// RT60 of one band
    pub fn get(&self, band: OctaveBand) -> Option<f64> {
        self.bands.iter().find(|b| b.band == band).map(|b| b.rt60)
    }

    /// Mean of the 500 Hz and 1 kHz bands
    pub fn mid_frequency(&self) -> Option<f64> {
        let lo = self.get(OctaveBand::Hz500)?;
        let hi = self.get(OctaveBand::Hz1000)?;
        Some((lo + hi) / 2.0)
    }

    /// (frequency Hz, seconds) pairs in ascending frequency
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.bands.iter().map(|b| (b.band.center_hz(), b.rt60)).collect()
    }
}

// ============================================================================
// Estimator
// ============================================================================

/// Computes RT60 and the Schroeder frequency
#[derive(Debug, Clone)]
pub struct ReverberationEstimator {
    speed_of_sound: f64,
    simple_absorption: f64,
    simple_clamp: ClampRange,
    band_clamp: ClampRange,
    degenerate_rt60: f64,
}

impl Default for ReverberationEstimator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ReverberationEstimator {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            speed_of_sound: config.speed_of_sound,
            simple_absorption: config.simple_absorption_coefficient,
            simple_clamp: config.simple_rt60_clamp,
            band_clamp: config.band_rt60_clamp,
            degenerate_rt60: config.degenerate_rt60,
        }
    }

    pub fn simple_clamp(&self) -> ClampRange {
        self.simple_clamp
    }

    pub fn band_clamp(&self) -> ClampRange {
        self.band_clamp
    }

    /// Simple broadband RT60 assuming the fixed average absorption
    /// coefficient over the whole room surface
    pub fn broadband_simple(&self, geometry: &RoomGeometry) -> f64 {
        let absorption = self.simple_absorption * geometry.surface_area();
        let raw = sabine_rt60(geometry.volume(), absorption, self.degenerate_rt60);
        self.simple_clamp.apply(raw)
    }

    /// RT60 for one band from already aggregated absorption
    pub fn band_rt60(&self, geometry: &RoomGeometry, absorption: f64) -> f64 {
        self.band_clamp
            .apply(sabine_rt60(geometry.volume(), absorption, self.degenerate_rt60))
    }

    /// Material-aware RT60 for every octave band
    pub fn band_profile(
        &self,
        geometry: &RoomGeometry,
        table: &MaterialTable,
        assignments: &SurfaceAssignment,
    ) -> Result<Rt60Profile> {
        let mut bands = Vec::with_capacity(OctaveBand::ALL.len());
        for band in OctaveBand::ALL {
            let absorption = table.aggregate_absorption(assignments, band)?;
            bands.push(BandRt60 {
                band,
                absorption,
                rt60: self.band_rt60(geometry, absorption),
            });
        }

        let mean_absorption = bands.iter().map(|b| b.absorption).sum::<f64>() / bands.len() as f64;
        let broadband = self.band_rt60(geometry, mean_absorption);

        log::debug!(
            "RT60 profile for {:.1} m³: broadband {:.2} s over {} surfaces",
            geometry.volume(),
            broadband,
            assignments.len()
        );

        Ok(Rt60Profile { bands, broadband })
    }

    /// Schroeder frequency `sqrt(RT60 * c² / (1.316 * V))` in Hz
    pub fn schroeder_frequency(&self, geometry: &RoomGeometry, rt60: f64) -> f64 {
        let c = self.speed_of_sound;
        (rt60 * c * c / (SCHROEDER_CONSTANT * geometry.volume())).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MaterialPolicy;
    use approx::assert_abs_diff_eq;

    fn reference_room() -> RoomGeometry {
        RoomGeometry::new(10.0, 8.0, 3.0).unwrap()
    }

    #[test]
    fn test_simple_reference_room() {
        let estimator = ReverberationEstimator::default();
        // 0.161 * 240 / (0.25 * 208)
        let rt60 = estimator.broadband_simple(&reference_room());
        assert_abs_diff_eq!(rt60, 0.743, epsilon = 0.001);
    }

    #[test]
    fn test_simple_clamps_large_rooms() {
        let estimator = ReverberationEstimator::default();
        let hall = RoomGeometry::new(60.0, 40.0, 20.0).unwrap();
        assert_eq!(estimator.broadband_simple(&hall), 2.5);

        let booth = RoomGeometry::new(1.0, 1.0, 2.0).unwrap();
        assert_eq!(estimator.broadband_simple(&booth), 0.3);
    }

    #[test]
    fn test_simple_zero_absorption_is_finite() {
        let config = EngineConfig {
            simple_absorption_coefficient: 0.0,
            ..Default::default()
        };
        let estimator = ReverberationEstimator::from_config(&config);
        assert_eq!(estimator.broadband_simple(&reference_room()), 2.5);
    }

    #[test]
    fn test_band_profile_zero_absorption() {
        let estimator = ReverberationEstimator::default();
        let table = MaterialTable::builtin();
        let profile = estimator
            .band_profile(&reference_room(), &table, &SurfaceAssignment::default())
            .unwrap();

        assert_eq!(profile.bands.len(), 6);
        for band in &profile.bands {
            assert_eq!(band.rt60, 5.0);
        }
        assert_eq!(profile.broadband, 5.0);
    }

    #[test]
    fn test_band_profile_follows_materials() {
        let estimator = ReverberationEstimator::default();
        let table = MaterialTable::builtin();
        let surfaces = SurfaceAssignment::from_areas([
            ("plaster".to_string(), 128.0),
            ("carpet".to_string(), 80.0),
        ])
        .unwrap();
        let profile = estimator.band_profile(&reference_room(), &table, &surfaces).unwrap();

        // Carpet absorbs far more at 4 kHz than at 125 Hz
        let low = profile.get(OctaveBand::Hz125).unwrap();
        let high = profile.get(OctaveBand::Hz4000).unwrap();
        assert!(low > high);

        let expected_1k = 0.161 * 240.0 / (128.0 * 0.03 + 80.0 * 0.40);
        assert_abs_diff_eq!(profile.get(OctaveBand::Hz1000).unwrap(), expected_1k, epsilon = 1e-9);
        assert!(profile.mid_frequency().is_some());
    }

    #[test]
    fn test_band_profile_always_in_clamp() {
        let estimator = ReverberationEstimator::default();
        let table = MaterialTable::builtin();
        for area in [0.0, 0.001, 1.0, 50.0, 1e6] {
            let surfaces = SurfaceAssignment::from_areas([("bass_trap".to_string(), area)]).unwrap();
            let profile = estimator.band_profile(&reference_room(), &table, &surfaces).unwrap();
            for band in &profile.bands {
                assert!(estimator.band_clamp().contains(band.rt60), "{:?}", band);
            }
            assert!(estimator.band_clamp().contains(profile.broadband));
        }
    }

    #[test]
    fn test_band_profile_strict_policy() {
        let estimator = ReverberationEstimator::default();
        let table = MaterialTable::builtin().with_policy(MaterialPolicy::Strict);
        let surfaces = SurfaceAssignment::from_areas([("marble".to_string(), 10.0)]).unwrap();
        assert!(estimator.band_profile(&reference_room(), &table, &surfaces).is_err());
    }

    #[test]
    fn test_schroeder_frequency() {
        let estimator = ReverberationEstimator::default();
        let room = reference_room();
        let rt60 = estimator.broadband_simple(&room);
        let expected = (rt60 * 340.0 * 340.0 / (1.316 * 240.0)).sqrt();
        assert_abs_diff_eq!(estimator.schroeder_frequency(&room, rt60), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_sabine_degenerate() {
        assert_eq!(sabine_rt60(100.0, 0.0, 10.0), 10.0);
        assert_eq!(sabine_rt60(100.0, f64::NAN, 10.0), 10.0);
        assert_abs_diff_eq!(sabine_rt60(100.0, 16.1, 10.0), 1.0, epsilon = 1e-12);
        assert_eq!(sabine_rt60(240.0, f64::INFINITY, 10.0), 0.0);
    }

    #[test]
    fn test_band_profile_overflowing_absorption() {
        let estimator = ReverberationEstimator::default();
        let table = MaterialTable::builtin();
        let surfaces = SurfaceAssignment::from_areas([
            ("bass_trap".to_string(), 1e308),
            ("bass_trap".to_string(), 1e308),
        ])
        .unwrap();
        let profile = estimator
            .band_profile(&reference_room(), &table, &surfaces)
            .unwrap();

        assert!(profile.bands.iter().all(|b| b.rt60 == 0.1));
        assert_eq!(profile.broadband, 0.1);
    }
}
