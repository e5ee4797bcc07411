//! Sound pressure level field
//!
//! Free-field point-source estimate sampled over the room footprint:
//!
//! `SPL = sensitivity + 10·log10(P) − 20·log10(max(d, d_floor)) + directivity(θ)`
//!
//! The distance floor removes the singularity at the source position.
//! Each source yields its own field; energy summation into a composite
//! field is a separate, explicit operation.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::directivity::{Directivity, DirectivityPattern};
use crate::catalog::SpeakerSpec;
use crate::config::EngineConfig;
use crate::error::{AcousticError, Result};
use crate::room::RoomGeometry;

/// Upper bound on samples per field
const MAX_GRID_POINTS: usize = 1_000_000;

// ============================================================================
// Level Helpers
// ============================================================================

/// On-axis SPL of a source at a distance, no floor applied
pub fn spl_at_distance(sensitivity_db: f64, power_watts: f64, distance: f64) -> f64 {
    sensitivity_db + 10.0 * power_watts.log10() - 20.0 * distance.log10()
}

/// Electrical power needed to reach `target_spl` on axis at `distance`
pub fn required_power(sensitivity_db: f64, target_spl: f64, distance: f64) -> f64 {
    10f64.powf((target_spl - sensitivity_db + 20.0 * distance.log10()) / 10.0)
}

/// Energy sum of incoherent levels, `10·log10(Σ 10^(L/10))`
///
/// Returns `None` for an empty slice.
pub fn energy_sum(levels: &[f64]) -> Option<f64> {
    if levels.is_empty() {
        return None;
    }
    let energy: f64 = levels.iter().map(|l| 10f64.powf(l / 10.0)).sum();
    Some(10.0 * energy.log10())
}

// ============================================================================
// Sources and Grid
// ============================================================================

/// Position on the floor plane, meters from the room corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A loudspeaker placed in the room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundSource {
    pub label: String,
    pub position: Point,
    /// dB SPL at 1 W / 1 m
    pub sensitivity_db: f64,
    /// Electrical drive power (W)
    pub power_watts: f64,
    #[serde(default)]
    pub directivity: Directivity,
    /// Forward axis in radians, 0 points along +length
    #[serde(default)]
    pub facing: f64,
}

impl SoundSource {
    /// Omnidirectional source facing +length
    pub fn new(label: &str, position: Point, sensitivity_db: f64, power_watts: f64) -> Self {
        Self {
            label: label.to_string(),
            position,
            sensitivity_db,
            power_watts,
            directivity: Directivity::Omnidirectional,
            facing: 0.0,
        }
    }

    /// Source driven by a speaker, radiating with its class's default pattern
    pub fn from_speaker(label: &str, position: Point, speaker: &SpeakerSpec, power_watts: f64) -> Self {
        Self::new(label, position, speaker.sensitivity_db, power_watts)
            .with_directivity(speaker.directivity.default_pattern(), 0.0)
    }

    pub fn with_directivity(mut self, directivity: Directivity, facing: f64) -> Self {
        self.directivity = directivity;
        self.facing = facing;
        self
    }

    /// Check parameters against the room footprint
    pub fn validate(&self, geometry: &RoomGeometry) -> Result<()> {
        if !(self.power_watts > 0.0) || !self.power_watts.is_finite() {
            return Err(AcousticError::InvalidPower {
                value: self.power_watts,
            });
        }
        if !self.sensitivity_db.is_finite() {
            return Err(AcousticError::invalid_parameter(
                format!("{}.sensitivity_db", self.label),
                self.sensitivity_db,
                "a finite dB value",
            ));
        }
        if !self.facing.is_finite() {
            return Err(AcousticError::invalid_parameter(
                format!("{}.facing", self.label),
                self.facing,
                "a finite angle in radians",
            ));
        }
        if !geometry.contains_point(self.position.x, self.position.y) {
            return Err(AcousticError::InvalidPosition {
                x: self.position.x,
                y: self.position.y,
            });
        }
        Ok(())
    }

    /// Absolute angle between the forward axis and the direction to `point`
    pub fn off_axis_angle(&self, point: &Point) -> f64 {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        if dx == 0.0 && dy == 0.0 {
            return 0.0;
        }
        let mut angle = dy.atan2(dx) - self.facing;
        angle = (angle + PI).rem_euclid(2.0 * PI) - PI;
        angle.abs()
    }
}

/// Sampling grid over the footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Spacing between samples (m)
    pub resolution: f64,
}

impl GridSpec {
    pub fn new(resolution: f64) -> Self {
        Self { resolution }
    }

    /// Cell-centre coordinates along length and width
    pub fn axes(&self, geometry: &RoomGeometry) -> Result<(Vec<f64>, Vec<f64>)> {
        if !(self.resolution > 0.0) || !self.resolution.is_finite() {
            return Err(AcousticError::invalid_parameter(
                "grid.resolution",
                self.resolution,
                "> 0 m",
            ));
        }
        let nx = (geometry.length() / self.resolution).ceil().max(1.0) as usize;
        let ny = (geometry.width() / self.resolution).ceil().max(1.0) as usize;
        if nx.saturating_mul(ny) > MAX_GRID_POINTS {
            return Err(AcousticError::invalid_parameter(
                "grid.resolution",
                self.resolution,
                format!("a spacing giving at most {} samples", MAX_GRID_POINTS),
            ));
        }
        Ok((
            cell_centres(geometry.length(), nx),
            cell_centres(geometry.width(), ny),
        ))
    }
}

fn cell_centres(extent: f64, count: usize) -> Vec<f64> {
    let step = extent / count as f64;
    (0..count).map(|i| (i as f64 + 0.5) * step).collect()
}

// ============================================================================
// Field
// ============================================================================

/// SPL samples over the footprint, row-major (`levels[j * xs.len() + i]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplField {
    pub label: String,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub levels: Vec<f64>,
}

impl SplField {
    /// Level at grid indices (i along length, j along width)
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.xs.len() || j >= self.ys.len() {
            return None;
        }
        self.levels.get(j * self.xs.len() + i).copied()
    }

    pub fn max(&self) -> f64 {
        self.levels.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.levels.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Max minus min level across the grid (dB)
    pub fn spread(&self) -> f64 {
        self.max() - self.min()
    }

    /// Energy-sum several fields sampled on the same grid
    pub fn combine(fields: &[SplField]) -> Result<SplField> {
        let first = fields.first().ok_or_else(|| AcousticError::IncompatibleFields {
            reason: "no fields to combine".to_string(),
        })?;
        if let Some(other) = fields.iter().find(|f| f.xs != first.xs || f.ys != first.ys) {
            return Err(AcousticError::IncompatibleFields {
                reason: format!("'{}' and '{}' use different grids", first.label, other.label),
            });
        }

        let mut scratch = Vec::with_capacity(fields.len());
        let levels = (0..first.levels.len())
            .map(|k| {
                scratch.clear();
                scratch.extend(fields.iter().map(|f| f.levels[k]));
                energy_sum(&scratch).unwrap_or(f64::NEG_INFINITY)
            })
            .collect();

        Ok(SplField {
            label: "composite".to_string(),
            xs: first.xs.clone(),
            ys: first.ys.clone(),
            levels,
        })
    }
}

// ============================================================================
// Simulator
// ============================================================================

/// Samples SPL fields for one or more sources
#[derive(Debug, Clone)]
pub struct SplFieldSimulator {
    floor_distance: f64,
}

impl Default for SplFieldSimulator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl SplFieldSimulator {
    pub fn new(floor_distance: f64) -> Self {
        Self { floor_distance }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.floor_distance)
    }

    pub fn floor_distance(&self) -> f64 {
        self.floor_distance
    }

    /// SPL of one source at one point
    pub fn spl_at(&self, source: &SoundSource, point: &Point) -> f64 {
        let distance = source.position.distance_to(point).max(self.floor_distance);
        let angle = source.off_axis_angle(point);
        spl_at_distance(source.sensitivity_db, source.power_watts, distance)
            + source.directivity.gain_db(angle)
    }

    /// One field per source, in source order
    pub fn simulate(
        &self,
        geometry: &RoomGeometry,
        sources: &[SoundSource],
        grid: &GridSpec,
    ) -> Result<Vec<SplField>> {
        let (xs, ys) = grid.axes(geometry)?;
        for source in sources {
            source.validate(geometry)?;
        }

        let fields = sources
            .iter()
            .map(|source| {
                let levels = ys
                    .iter()
                    .flat_map(|&y| xs.iter().map(move |&x| Point::new(x, y)))
                    .map(|p| self.spl_at(source, &p))
                    .collect();
                SplField {
                    label: source.label.clone(),
                    xs: xs.clone(),
                    ys: ys.clone(),
                    levels,
                }
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Simulated {} SPL fields on a {}x{} grid",
            fields.len(),
            xs.len(),
            ys.len()
        );
        Ok(fields)
    }

    /// Energy-summed field of all sources
    pub fn composite(
        &self,
        geometry: &RoomGeometry,
        sources: &[SoundSource],
        grid: &GridSpec,
    ) -> Result<SplField> {
        SplField::combine(&self.simulate(geometry, sources, grid)?)
    }
}
