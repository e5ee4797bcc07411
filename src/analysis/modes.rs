//! Room mode analysis
//!
//! Enumerates the standing-wave resonances of a rectangular room:
//!
//! `f = (c/2) * sqrt((nx/L)² + (ny/W)² + (nz/H)²)`
//!
//! The search bound per axis is derived from the cutoff, since any mode
//! with index `n` on an axis of length `d` has `f >= c*n / (2d)`. No mode
//! at or below the cutoff can therefore lie beyond `floor(2*f_max*d / c)`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{AcousticError, Result};
use crate::room::{Axis, RoomGeometry};

/// Upper bound on index triples examined per enumeration
const MAX_MODE_CANDIDATES: u64 = 1_000_000;

/// Mode class by number of zero indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    /// Two indices zero: one-dimensional standing wave
    Axial,
    /// One index zero: wave between two pairs of surfaces
    Tangential,
    /// No index zero: wave involving all six surfaces
    Oblique,
}

impl ModeKind {
    /// Classify an index triple; `None` for (0, 0, 0)
    pub fn classify(indices: [u32; 3]) -> Option<Self> {
        match indices.iter().filter(|&&n| n == 0).count() {
            2 => Some(ModeKind::Axial),
            1 => Some(ModeKind::Tangential),
            0 => Some(ModeKind::Oblique),
            _ => None,
        }
    }
}

/// One resonance of the room
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomMode {
    /// (nx, ny, nz) along length, width, height
    pub indices: [u32; 3],
    /// Frequency in Hz
    pub frequency: f64,
    pub kind: ModeKind,
}

impl RoomMode {
    /// Axis of an axial mode
    pub fn axis(&self) -> Option<Axis> {
        if self.kind != ModeKind::Axial {
            return None;
        }
        Axis::ALL
            .into_iter()
            .zip(self.indices)
            .find(|(_, n)| *n > 0)
            .map(|(axis, _)| axis)
    }

    /// Ascending frequency, ties broken by index triple
    fn ordering(&self, other: &Self) -> Ordering {
        self.frequency
            .total_cmp(&other.frequency)
            .then_with(|| self.indices.cmp(&other.indices))
    }
}

/// Number of modes of each class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeCounts {
    pub axial: usize,
    pub tangential: usize,
    pub oblique: usize,
}

impl ModeCounts {
    pub fn from_modes(modes: &[RoomMode]) -> Self {
        let mut counts = Self::default();
        for mode in modes {
            match mode.kind {
                ModeKind::Axial => counts.axial += 1,
                ModeKind::Tangential => counts.tangential += 1,
                ModeKind::Oblique => counts.oblique += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.axial + self.tangential + self.oblique
    }
}

/// Enumerates and classifies room modes
#[derive(Debug, Clone)]
pub struct ModalAnalyzer {
    speed_of_sound: f64,
}

impl Default for ModalAnalyzer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ModalAnalyzer {
    pub fn new(speed_of_sound: f64) -> Self {
        Self { speed_of_sound }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.speed_of_sound)
    }

    /// Frequency of an index triple
    pub fn frequency(&self, geometry: &RoomGeometry, indices: [u32; 3]) -> f64 {
        let sum: f64 = Axis::ALL
            .iter()
            .zip(indices)
            .map(|(axis, n)| {
                let k = n as f64 / geometry.dimension(*axis);
                k * k
            })
            .sum();
        self.speed_of_sound / 2.0 * sum.sqrt()
    }

    /// Smallest per-axis index bound guaranteed to contain every mode up
    /// to `max_frequency`
    pub fn search_bounds(&self, geometry: &RoomGeometry, max_frequency: f64) -> [u32; 3] {
        Axis::ALL.map(|axis| {
            let n = 2.0 * max_frequency * geometry.dimension(axis) / self.speed_of_sound;
            // `as` saturates: negative and NaN cutoffs become 0. The +1 absorbs rounding.
            (n.floor() as u32).saturating_add(1)
        })
    }

    /// All modes up to and including `max_frequency`, ascending.
    ///
    /// The cutoff must be positive and finite, and small enough that the
    /// search stays within `MAX_MODE_CANDIDATES` index triples.
    pub fn modes(&self, geometry: &RoomGeometry, max_frequency: f64) -> Result<Vec<RoomMode>> {
        if !(max_frequency > 0.0) || !max_frequency.is_finite() {
            return Err(AcousticError::invalid_parameter(
                "max_mode_frequency",
                max_frequency,
                "> 0 Hz",
            ));
        }
        let bounds = self.search_bounds(geometry, max_frequency);
        let candidates = bounds
            .iter()
            .map(|&n| u64::from(n) + 1)
            .fold(1u64, |acc, n| acc.saturating_mul(n));
        if candidates > MAX_MODE_CANDIDATES {
            return Err(AcousticError::invalid_parameter(
                "max_mode_frequency",
                max_frequency,
                format!(
                    "a cutoff needing at most {} index triples for this room",
                    MAX_MODE_CANDIDATES
                ),
            ));
        }
        Ok(self.enumerate(geometry, max_frequency, bounds))
    }

    /// Enumerate with explicit per-axis index bounds (inclusive)
    pub fn enumerate(
        &self,
        geometry: &RoomGeometry,
        max_frequency: f64,
        bounds: [u32; 3],
    ) -> Vec<RoomMode> {
        let mut modes = Vec::new();

        for nx in 0..=bounds[0] {
            for ny in 0..=bounds[1] {
                for nz in 0..=bounds[2] {
                    let indices = [nx, ny, nz];
                    let Some(kind) = ModeKind::classify(indices) else {
                        continue;
                    };
                    let frequency = self.frequency(geometry, indices);
                    if frequency <= max_frequency {
                        modes.push(RoomMode {
                            indices,
                            frequency,
                            kind,
                        });
                    }
                }
            }
        }

        modes.sort_by(RoomMode::ordering);
        log::debug!(
            "Enumerated {} modes up to {} Hz (bounds {:?})",
            modes.len(),
            max_frequency,
            bounds
        );
        modes
    }

    /// Axial modes at or below the cutoff, the ones that need bass treatment
    pub fn problematic_modes(&self, geometry: &RoomGeometry, cutoff: f64) -> Result<Vec<RoomMode>> {
        Ok(self
            .modes(geometry, cutoff)?
            .into_iter()
            .filter(|m| m.kind == ModeKind::Axial)
            .collect())
    }
}
