//! Analysis engine
//!
//! Owns the read-only reference catalogs and the configured components,
//! and turns a `ParameterBundle` into an `AnalysisReport`. All methods take
//! `&self`; one engine can serve concurrent requests without locking.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::analysis::{
    recommend, AmplificationSizer, GridSpec, GroupLevel, Headroom, ModalAnalyzer, ModeCounts,
    PowerSummary, Recommendation, ReverberationEstimator, RoomMode, Rt60Profile, SplField,
    SplFieldSimulator, SuitabilityResult, SuitabilityScorer,
};
use crate::catalog::{SpeakerCatalog, SpeakerSpec};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::materials::MaterialTable;
use crate::room::{Axis, ProportionQuality, RoomGeometry, RoomType, UseType};
use crate::state::{ParameterBundle, SpeakerRef};

// ============================================================================
// Report
// ============================================================================

/// Scalar properties of the room
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometrySummary {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub volume: f64,
    pub surface_area: f64,
    pub floor_area: f64,
    pub aspect_lw: f64,
    pub aspect_lh: f64,
    pub aspect_wh: f64,
    pub proportion_quality: ProportionQuality,
    /// First axial mode per axis (Hz)
    pub axial_fundamentals: Vec<(Axis, f64)>,
}

/// Reverberation results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReverbSummary {
    /// Fixed-coefficient broadband estimate
    pub simple: f64,
    /// Per-band estimate, present when surfaces were assigned
    pub profile: Option<Rt60Profile>,
    /// RT60 used downstream: the profile's broadband value, else `simple`
    pub effective: f64,
    pub schroeder_frequency: f64,
    /// Materials that resolved through the fallback coefficient
    pub unknown_materials: Vec<String>,
}

/// Mode enumeration results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeSummary {
    pub max_frequency: f64,
    pub counts: ModeCounts,
    pub modes: Vec<RoomMode>,
    /// Axial modes below the problematic cutoff
    pub problematic: Vec<RoomMode>,
}

/// SPL results, one field per source plus their energy sum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplSummary {
    pub resolution: f64,
    pub fields: Vec<SplField>,
    pub composite: Option<SplField>,
}

/// Amplification results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmplificationSummary {
    pub recommended_watts: u64,
    pub configuration: String,
    pub installed: PowerSummary,
    pub main_speaker: Option<String>,
    pub headroom: Option<Headroom>,
    pub group_levels: Vec<GroupLevel>,
}

/// Everything the engine derives from one bundle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub name: String,
    pub room_type: RoomType,
    pub use_type: UseType,
    pub geometry: GeometrySummary,
    pub reverb: ReverbSummary,
    pub modes: ModeSummary,
    pub spl: SplSummary,
    pub amplification: AmplificationSummary,
    pub suitability: SuitabilityResult,
    pub recommendations: Vec<Recommendation>,
}

impl AnalysisReport {
    /// SHA-256 of the report's JSON form, hex encoded
    pub fn digest(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Acoustic analysis engine
#[derive(Debug, Clone)]
pub struct AcousticEngine {
    config: EngineConfig,
    materials: MaterialTable,
    speakers: SpeakerCatalog,
    scorer: SuitabilityScorer,
    reverb: ReverberationEstimator,
    modal: ModalAnalyzer,
    spl: SplFieldSimulator,
    sizer: AmplificationSizer,
}

impl Default for AcousticEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl AcousticEngine {
    /// Engine with built-in catalogs and a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            materials: MaterialTable::builtin().with_policy(config.material_policy),
            speakers: SpeakerCatalog::builtin(),
            scorer: SuitabilityScorer::builtin(),
            reverb: ReverberationEstimator::from_config(&config),
            modal: ModalAnalyzer::from_config(&config),
            spl: SplFieldSimulator::from_config(&config),
            sizer: AmplificationSizer,
            config,
        }
    }

    /// Replace the material table; the configured policy still applies
    pub fn with_materials(mut self, materials: MaterialTable) -> Self {
        self.materials = materials.with_policy(self.config.material_policy);
        self
    }

    pub fn with_speakers(mut self, speakers: SpeakerCatalog) -> Self {
        self.speakers = speakers;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn materials(&self) -> &MaterialTable {
        &self.materials
    }

    pub fn speakers(&self) -> &SpeakerCatalog {
        &self.speakers
    }

    pub fn scorer(&self) -> &SuitabilityScorer {
        &self.scorer
    }

    pub fn reverb(&self) -> &ReverberationEstimator {
        &self.reverb
    }

    pub fn modal(&self) -> &ModalAnalyzer {
        &self.modal
    }

    pub fn spl(&self) -> &SplFieldSimulator {
        &self.spl
    }

    pub fn sizer(&self) -> &AmplificationSizer {
        &self.sizer
    }

    /// Resolve a speaker reference against the catalog
    pub fn resolve_speaker(&self, speaker: &SpeakerRef) -> Result<SpeakerSpec> {
        let spec = match speaker {
            SpeakerRef::Catalog { brand, model } => self.speakers.find(brand, model)?.clone(),
            SpeakerRef::Manual { spec } => spec.clone(),
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Run every component over the bundle
    pub fn analyze(&self, bundle: &ParameterBundle) -> Result<AnalysisReport> {
        let room = &bundle.room;
        bundle.layout.validate()?;

        let geometry = self.summarize_geometry(room);
        let reverb = self.reverb_summary(bundle)?;
        let modes = self.mode_summary(bundle)?;
        let spl = self.spl_summary(bundle)?;
        let amplification = self.amplification_summary(bundle, reverb.effective)?;
        let suitability = self
            .scorer
            .score(&bundle.instrument, reverb.effective, room.volume())?;
        let recommendations = recommend(reverb.effective, &modes.problematic, bundle.use_type);

        log::debug!(
            "Analyzed '{}': V={:.1} m³, RT60={:.2} s, {} modes, verdict {:?}",
            bundle.name,
            geometry.volume,
            reverb.effective,
            modes.modes.len(),
            suitability.verdict
        );

        Ok(AnalysisReport {
            name: bundle.name.clone(),
            room_type: bundle.room_type,
            use_type: bundle.use_type,
            geometry,
            reverb,
            modes,
            spl,
            amplification,
            suitability,
            recommendations,
        })
    }

    fn summarize_geometry(&self, room: &RoomGeometry) -> GeometrySummary {
        GeometrySummary {
            length: room.length(),
            width: room.width(),
            height: room.height(),
            volume: room.volume(),
            surface_area: room.surface_area(),
            floor_area: room.floor_area(),
            aspect_lw: room.aspect_lw(),
            aspect_lh: room.aspect(Axis::Length, Axis::Height),
            aspect_wh: room.aspect(Axis::Width, Axis::Height),
            proportion_quality: room.proportion_quality(),
            axial_fundamentals: room.axial_fundamentals(self.config.speed_of_sound).to_vec(),
        }
    }

    fn reverb_summary(&self, bundle: &ParameterBundle) -> Result<ReverbSummary> {
        let room = &bundle.room;
        let simple = self.reverb.broadband_simple(room);

        let (profile, unknown_materials) = if bundle.surfaces.is_empty() {
            (None, Vec::new())
        } else {
            let unknown = self
                .materials
                .unknown_materials(&bundle.surfaces)
                .into_iter()
                .map(str::to_string)
                .collect();
            let profile = self.reverb.band_profile(room, &self.materials, &bundle.surfaces)?;
            (Some(profile), unknown)
        };

        let effective = profile.as_ref().map_or(simple, |p| p.broadband);
        Ok(ReverbSummary {
            simple,
            profile,
            effective,
            schroeder_frequency: self.reverb.schroeder_frequency(room, effective),
            unknown_materials,
        })
    }

    fn mode_summary(&self, bundle: &ParameterBundle) -> Result<ModeSummary> {
        let max_frequency = bundle
            .max_mode_frequency
            .unwrap_or(self.config.mode_max_frequency);
        let modes = self.modal.modes(&bundle.room, max_frequency)?;
        let problematic = self
            .modal
            .problematic_modes(&bundle.room, self.config.problematic_mode_frequency)?;
        Ok(ModeSummary {
            max_frequency,
            counts: ModeCounts::from_modes(&modes),
            modes,
            problematic,
        })
    }

    fn spl_summary(&self, bundle: &ParameterBundle) -> Result<SplSummary> {
        let resolution = bundle.grid_resolution.unwrap_or(self.config.grid_resolution);
        if bundle.sources.is_empty() {
            return Ok(SplSummary {
                resolution,
                fields: Vec::new(),
                composite: None,
            });
        }
        let grid = GridSpec::new(resolution);
        let fields = self.spl.simulate(&bundle.room, &bundle.sources, &grid)?;
        let composite = SplField::combine(&fields)?;
        Ok(SplSummary {
            resolution,
            fields,
            composite: Some(composite),
        })
    }

    fn amplification_summary(
        &self,
        bundle: &ParameterBundle,
        rt60: f64,
    ) -> Result<AmplificationSummary> {
        let installed = self.sizer.total_power(&bundle.channel_groups)?;
        let main_speaker = bundle
            .main_speaker
            .as_ref()
            .map(|s| self.resolve_speaker(s))
            .transpose()?;

        let headroom = match (&main_speaker, bundle.target) {
            (Some(speaker), Some(target)) => Some(self.sizer.headroom_for_target(
                speaker,
                target.spl_db,
                target.distance,
            )?),
            _ => None,
        };

        let group_levels = match bundle.target {
            Some(target) => self.sizer.group_levels(
                &bundle.channel_groups,
                target.distance,
                self.config.floor_distance,
            ),
            None => Vec::new(),
        };

        Ok(AmplificationSummary {
            recommended_watts: self.sizer.recommended_watts(bundle.room.volume(), rt60),
            configuration: bundle.layout.description(),
            installed,
            main_speaker: main_speaker.map(|s| s.display_name()),
            headroom,
            group_levels,
        })
    }
}
