//! Amplification sizing
//!
//! Recommended electrical power from room volume and RT60, installed
//! amplifier power per channel group, and the headroom of a speaker
//! against the power a target level requires.

use serde::{Deserialize, Serialize};

use super::spl::{required_power, spl_at_distance};
use crate::catalog::{SpeakerKind, SpeakerSpec};
use crate::error::{AcousticError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Watts per cubic meter before the reverberation correction
const WATTS_PER_CUBIC_METER: f64 = 2.0;

/// RT60 above which a room is treated as live (s)
const LIVE_ROOM_RT60: f64 = 1.0;

/// Power factor for live rooms
const LIVE_ROOM_FACTOR: f64 = 0.7;

/// Power factor for damped rooms
const DAMPED_ROOM_FACTOR: f64 = 1.3;

/// Headroom ratio above which the speaker is rated excellent
const EXCELLENT_HEADROOM: f64 = 3.0;

/// Headroom ratio above which the speaker is rated good
const GOOD_HEADROOM: f64 = 1.5;

// ============================================================================
// Types
// ============================================================================

/// Main speaker arrangement, 2 or 4 tops with an optional subwoofer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerLayout {
    pub main_speakers: u32,
    pub include_sub: bool,
}

impl Default for SpeakerLayout {
    fn default() -> Self {
        Self {
            main_speakers: 2,
            include_sub: false,
        }
    }
}

impl SpeakerLayout {
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.main_speakers, 2 | 4) {
            return Err(AcousticError::invalid_parameter(
                "main_speakers",
                self.main_speakers,
                "2 or 4",
            ));
        }
        Ok(())
    }

    /// "2 speakers" or "4 speakers + subwoofer"
    pub fn description(&self) -> String {
        let mut text = format!("{} speakers", self.main_speakers);
        if self.include_sub {
            text.push_str(" + subwoofer");
        }
        text
    }
}

/// Amplifier channels driving one kind of speaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelGroup {
    pub role: SpeakerKind,
    pub channel_count: u32,
    /// Nominal power per channel (W)
    pub power_per_channel: f64,
    /// Speaker on these channels, used for the SPL breakdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<SpeakerSpec>,
}

impl ChannelGroup {
    pub fn new(role: SpeakerKind, channel_count: u32, power_per_channel: f64) -> Self {
        Self {
            role,
            channel_count,
            power_per_channel,
            speaker: None,
        }
    }

    pub fn with_speaker(mut self, speaker: SpeakerSpec) -> Self {
        self.speaker = Some(speaker);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.power_per_channel >= 0.0) || !self.power_per_channel.is_finite() {
            return Err(AcousticError::InvalidPower {
                value: self.power_per_channel,
            });
        }
        if let Some(speaker) = &self.speaker {
            speaker.validate()?;
        }
        Ok(())
    }

    /// Channel count × nominal power per channel
    pub fn total_power(&self) -> f64 {
        self.channel_count as f64 * self.power_per_channel
    }
}

/// Installed power per group and overall
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerSummary {
    pub passive: f64,
    pub active: f64,
    pub subwoofer: f64,
    pub total: f64,
}

/// Rating of a speaker's power handling against the required power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadroomVerdict {
    Excellent,
    Good,
    Insufficient,
}

/// Power handling relative to the power needed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Headroom {
    pub power_needed: f64,
    pub ratio: f64,
    pub verdict: HeadroomVerdict,
}

/// SPL one channel group delivers at the reference distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLevel {
    pub role: SpeakerKind,
    pub speaker: String,
    pub spl_db: f64,
}

// ============================================================================
// Sizer
// ============================================================================

/// Stateless amplifier sizing rules
#[derive(Debug, Clone, Copy, Default)]
pub struct AmplificationSizer;

impl AmplificationSizer {
    /// `ceil(ceil(2V) × factor)`, factor 0.7 for RT60 > 1 s else 1.3
    pub fn recommended_watts(&self, volume: f64, rt60: f64) -> u64 {
        let base_power = (volume.max(0.0) * WATTS_PER_CUBIC_METER).ceil();
        let rt_factor = if rt60 > LIVE_ROOM_RT60 {
            LIVE_ROOM_FACTOR
        } else {
            DAMPED_ROOM_FACTOR
        };
        (base_power * rt_factor).ceil() as u64
    }

    /// Sum installed power per role, then overall
    pub fn total_power(&self, groups: &[ChannelGroup]) -> Result<PowerSummary> {
        let mut summary = PowerSummary::default();
        for group in groups {
            group.validate()?;
            let power = group.total_power();
            match group.role {
                SpeakerKind::Passive => summary.passive += power,
                SpeakerKind::Active => summary.active += power,
                SpeakerKind::Subwoofer => summary.subwoofer += power,
            }
        }
        summary.total = summary.passive + summary.active + summary.subwoofer;
        Ok(summary)
    }

    /// `speaker_max_power / power_needed` and its rating
    pub fn headroom(&self, speaker_max_power: f64, power_needed: f64) -> Result<Headroom> {
        for value in [speaker_max_power, power_needed] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(AcousticError::InvalidPower { value });
            }
        }
        let ratio = speaker_max_power / power_needed;
        let verdict = if ratio > EXCELLENT_HEADROOM {
            HeadroomVerdict::Excellent
        } else if ratio > GOOD_HEADROOM {
            HeadroomVerdict::Good
        } else {
            HeadroomVerdict::Insufficient
        };
        Ok(Headroom {
            power_needed,
            ratio,
            verdict,
        })
    }

    /// Headroom of a speaker for reaching `target_spl` at `distance`
    pub fn headroom_for_target(
        &self,
        speaker: &SpeakerSpec,
        target_spl: f64,
        distance: f64,
    ) -> Result<Headroom> {
        if !(distance > 0.0) || !distance.is_finite() {
            return Err(AcousticError::invalid_parameter("target_distance", distance, "> 0 m"));
        }
        if !target_spl.is_finite() {
            return Err(AcousticError::invalid_parameter("target_spl", target_spl, "a finite dB value"));
        }
        let needed = required_power(speaker.sensitivity_db, target_spl, distance);
        self.headroom(speaker.max_power_watts, needed)
    }

    /// Level of each group with a known speaker at `distance`, reported
    /// separately. Channels of a group add as incoherent sources.
    pub fn group_levels(&self, groups: &[ChannelGroup], distance: f64, floor_distance: f64) -> Vec<GroupLevel> {
        let distance = distance.max(floor_distance);
        groups
            .iter()
            .filter(|g| g.channel_count > 0 && g.power_per_channel > 0.0)
            .filter_map(|group| {
                let speaker = group.speaker.as_ref()?;
                let per_channel = spl_at_distance(speaker.sensitivity_db, group.power_per_channel, distance);
                Some(GroupLevel {
                    role: group.role,
                    speaker: speaker.display_name(),
                    spl_db: per_channel + 10.0 * (group.channel_count as f64).log10(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SpeakerCatalog;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_recommended_watts_reference() {
        let sizer = AmplificationSizer;
        // ceil(480 * 1.3) = 624
        assert_eq!(sizer.recommended_watts(240.0, 0.74), 624);
        // ceil(480 * 0.7) = 336
        assert_eq!(sizer.recommended_watts(240.0, 1.2), 336);
    }

    #[test]
    fn test_recommended_watts_monotonic_in_volume() {
        let sizer = AmplificationSizer;
        for rt60 in [0.5, 1.5] {
            let mut previous = 0;
            for step in 0..2000 {
                let volume = step as f64 * 0.37;
                let watts = sizer.recommended_watts(volume, rt60);
                assert!(watts >= previous, "volume {} gave {} < {}", volume, watts, previous);
                previous = watts;
            }
        }
    }

    #[test]
    fn test_total_power_by_group() {
        let sizer = AmplificationSizer;
        let groups = vec![
            ChannelGroup::new(SpeakerKind::Passive, 2, 250.0),
            ChannelGroup::new(SpeakerKind::Passive, 2, 100.0),
            ChannelGroup::new(SpeakerKind::Active, 2, 300.0),
            ChannelGroup::new(SpeakerKind::Subwoofer, 1, 800.0),
        ];
        let summary = sizer.total_power(&groups).unwrap();
        assert_eq!(summary.passive, 700.0);
        assert_eq!(summary.active, 600.0);
        assert_eq!(summary.subwoofer, 800.0);
        assert_eq!(summary.total, 2100.0);
    }

    #[test]
    fn test_total_power_rejects_negative() {
        let sizer = AmplificationSizer;
        let groups = vec![ChannelGroup::new(SpeakerKind::Active, 2, -10.0)];
        assert_eq!(sizer.total_power(&groups).unwrap_err().error_code(), "INVALID_POWER");
    }

    #[test]
    fn test_headroom_thresholds() {
        let sizer = AmplificationSizer;
        assert_eq!(sizer.headroom(1000.0, 200.0).unwrap().verdict, HeadroomVerdict::Excellent);
        assert_eq!(sizer.headroom(600.0, 200.0).unwrap().verdict, HeadroomVerdict::Good);
        assert_eq!(sizer.headroom(300.0, 200.0).unwrap().verdict, HeadroomVerdict::Insufficient);
        assert!(sizer.headroom(300.0, 0.0).is_err());
    }

    #[test]
    fn test_headroom_for_target() {
        let sizer = AmplificationSizer;
        let catalog = SpeakerCatalog::builtin();
        let speaker = catalog.find("Generic", "Passive 12").unwrap();
        // 96 dB sensitivity, 100 dB at 4 m needs 10^((100 - 96 + 12.04) / 10) ≈ 40 W
        let headroom = sizer.headroom_for_target(speaker, 100.0, 4.0).unwrap();
        assert_abs_diff_eq!(headroom.power_needed, 40.2, epsilon = 0.1);
        assert_eq!(headroom.verdict, HeadroomVerdict::Excellent);
    }

    #[test]
    fn test_group_levels_reported_separately() {
        let sizer = AmplificationSizer;
        let catalog = SpeakerCatalog::builtin();
        let groups = vec![
            ChannelGroup::new(SpeakerKind::Passive, 2, 100.0)
                .with_speaker(catalog.find("Generic", "Passive 8").unwrap().clone()),
            ChannelGroup::new(SpeakerKind::Subwoofer, 1, 500.0)
                .with_speaker(catalog.find("Generic", "Sub 15").unwrap().clone()),
            ChannelGroup::new(SpeakerKind::Active, 2, 300.0),
        ];
        let levels = sizer.group_levels(&groups, 4.0, 0.25);
        assert_eq!(levels.len(), 2);
        // 89 + 20 - 12.04 + 3.01
        assert_abs_diff_eq!(levels[0].spl_db, 99.97, epsilon = 0.01);
        assert_eq!(levels[1].role, SpeakerKind::Subwoofer);
    }

    #[test]
    fn test_layout_description() {
        let layout = SpeakerLayout {
            main_speakers: 4,
            include_sub: true,
        };
        assert_eq!(layout.description(), "4 speakers + subwoofer");
        assert_eq!(SpeakerLayout::default().description(), "2 speakers");
        assert!(SpeakerLayout {
            main_speakers: 3,
            include_sub: false
        }
        .validate()
        .is_err());
    }
}
