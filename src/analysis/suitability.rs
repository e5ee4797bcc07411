//! Instrument and use-case suitability
//!
//! Compares RT60 and volume against the ideal ranges of a profile:
//! both in range → Excellent, one → Good, none → Limited.

use serde::{Deserialize, Serialize};

use crate::error::{AcousticError, Result};

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdealRange {
    pub min: f64,
    pub max: f64,
}

impl IdealRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Ideal acoustic conditions for an instrument or ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentProfile {
    pub name: String,
    /// English name accepted as an alternative key
    pub alias: String,
    pub rt60: IdealRange,
    pub volume: IdealRange,
}

/// Three-level suitability verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Excellent,
    Good,
    Limited,
}

impl Verdict {
    fn from_matches(rt_ok: bool, vol_ok: bool) -> Self {
        match (rt_ok, vol_ok) {
            (true, true) => Verdict::Excellent,
            (true, false) | (false, true) => Verdict::Good,
            (false, false) => Verdict::Limited,
        }
    }
}

/// Outcome of scoring a room for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityResult {
    pub instrument: String,
    pub ideal_rt60: IdealRange,
    pub ideal_volume: IdealRange,
    pub rt60: f64,
    pub volume: f64,
    pub rt_ok: bool,
    pub vol_ok: bool,
    pub verdict: Verdict,
}

/// (name, alias, rt60 range s, volume range m³)
const BUILTIN_PROFILES: &[(&str, &str, [f64; 2], [f64; 2])] = &[
    ("Voce/Podcast", "Voice/Podcast", [0.3, 0.6], [20.0, 80.0]),
    ("Pianoforte", "Piano", [0.6, 1.2], [50.0, 200.0]),
    ("Batteria", "Drums", [0.4, 0.8], [30.0, 150.0]),
    ("Chitarra acustica", "Acoustic guitar", [0.5, 1.0], [25.0, 100.0]),
    ("Orchestra", "Orchestra", [1.0, 2.0], [200.0, 1000.0]),
    ("Sezione Archi", "String section", [0.8, 1.5], [100.0, 300.0]),
    ("Ottoni", "Brass", [0.6, 1.2], [80.0, 250.0]),
    ("Coro", "Choir", [1.0, 1.8], [150.0, 500.0]),
    ("DJ Set", "DJ Set", [0.3, 0.7], [50.0, 300.0]),
];

/// Static profile table and the scoring rule
#[derive(Debug, Clone)]
pub struct SuitabilityScorer {
    profiles: Vec<InstrumentProfile>,
}

impl Default for SuitabilityScorer {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SuitabilityScorer {
    pub fn builtin() -> Self {
        let profiles = BUILTIN_PROFILES
            .iter()
            .map(|&(name, alias, rt60, volume)| InstrumentProfile {
                name: name.to_string(),
                alias: alias.to_string(),
                rt60: IdealRange::new(rt60[0], rt60[1]),
                volume: IdealRange::new(volume[0], volume[1]),
            })
            .collect();
        Self { profiles }
    }

    pub fn profiles(&self) -> &[InstrumentProfile] {
        &self.profiles
    }

    /// Look up a profile by name or alias, case-insensitive
    pub fn profile(&self, name: &str) -> Result<&InstrumentProfile> {
        let key = name.trim();
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(key) || p.alias.eq_ignore_ascii_case(key))
            .ok_or_else(|| AcousticError::UnknownInstrument {
                name: name.to_string(),
            })
    }

    /// Score a room with the given RT60 (s) and volume (m³)
    pub fn score(&self, instrument: &str, rt60: f64, volume: f64) -> Result<SuitabilityResult> {
        let profile = self.profile(instrument)?;
        let rt_ok = profile.rt60.contains(rt60);
        let vol_ok = profile.volume.contains(volume);
        Ok(SuitabilityResult {
            instrument: profile.name.clone(),
            ideal_rt60: profile.rt60,
            ideal_volume: profile.volume,
            rt60,
            volume,
            rt_ok,
            vol_ok,
            verdict: Verdict::from_matches(rt_ok, vol_ok),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_voice_in_large_room() {
        let scorer = SuitabilityScorer::builtin();
        let result = scorer.score("Voce/Podcast", 0.5, 240.0).unwrap();
        assert!(result.rt_ok);
        assert!(!result.vol_ok);
        assert_eq!(result.verdict, Verdict::Good);
    }

    #[test]
    fn test_voice_with_simple_rt60() {
        let scorer = SuitabilityScorer::builtin();
        let result = scorer.score("voce/podcast", 0.743, 240.0).unwrap();
        assert_eq!(result.verdict, Verdict::Limited);
    }

    #[test_case("Piano", 0.9, 120.0, Verdict::Excellent ; "alias inside both ranges")]
    #[test_case("Orchestra", 2.0, 200.0, Verdict::Excellent ; "range edges inclusive")]
    #[test_case("Batteria", 0.9, 100.0, Verdict::Good ; "volume only")]
    #[test_case("DJ Set", 0.5, 400.0, Verdict::Good ; "rt60 only")]
    #[test_case("Coro", 0.5, 50.0, Verdict::Limited ; "neither")]
    fn test_verdicts(instrument: &str, rt60: f64, volume: f64, expected: Verdict) {
        let scorer = SuitabilityScorer::builtin();
        let result = scorer.score(instrument, rt60, volume).unwrap();
        assert_eq!(result.verdict, expected);
    }

    #[test]
    fn test_alias_reports_canonical_name() {
        let scorer = SuitabilityScorer::builtin();
        assert_eq!(scorer.score("piano", 0.9, 120.0).unwrap().instrument, "Pianoforte");
    }

    #[test]
    fn test_unknown_instrument() {
        let scorer = SuitabilityScorer::builtin();
        let err = scorer.score("Theremin", 0.5, 50.0).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_INSTRUMENT");
    }

    #[test]
    fn test_builtin_table() {
        let scorer = SuitabilityScorer::builtin();
        assert_eq!(scorer.profiles().len(), 9);
        for profile in scorer.profiles() {
            assert!(profile.rt60.min < profile.rt60.max);
            assert!(profile.volume.min < profile.volume.max);
        }
    }
}
