//! Treatment and setup recommendations
//!
//! Rule-based advice derived from the broadband RT60, the low axial modes
//! and the main use of the room.

use serde::{Deserialize, Serialize};

use super::modes::{ModeKind, RoomMode};
use crate::room::UseType;

/// RT60 above which the room is too reverberant (s)
const REVERBERANT_RT60: f64 = 1.5;

/// RT60 below which the room is too dry (s)
const DRY_RT60: f64 = 0.4;

/// Axial modes below this frequency call for bass treatment (Hz)
const LOW_MODE_LIMIT: f64 = 200.0;

/// What a recommendation addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finding {
    TooReverberant,
    TooDry,
    LowAxialModes,
    RecordingSetup,
    MixingSetup,
}

/// A finding with concrete actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub finding: Finding,
    pub summary: String,
    pub actions: Vec<String>,
}

impl Recommendation {
    fn new(finding: Finding, summary: &str, actions: &[&str]) -> Self {
        Self {
            finding,
            summary: summary.to_string(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Build the recommendation list
pub fn recommend(rt60: f64, modes: &[RoomMode], use_type: UseType) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if rt60 > REVERBERANT_RT60 {
        out.push(Recommendation::new(
            Finding::TooReverberant,
            "RT60 too high: reverberant room",
            &[
                "Absorptive panels on 20-30% of the surfaces",
                "Bass traps in the corners",
                "Heavy curtains or rugs",
            ],
        ));
    } else if rt60 < DRY_RT60 {
        out.push(Recommendation::new(
            Finding::TooDry,
            "RT60 too low: room too dry",
            &["Add diffusive panels", "Keep some reflective surfaces"],
        ));
    }

    if modes
        .iter()
        .any(|m| m.kind == ModeKind::Axial && m.frequency < LOW_MODE_LIMIT)
    {
        out.push(Recommendation::new(
            Finding::LowAxialModes,
            "Problematic axial modes below 200 Hz",
            &[
                "Deep bass traps (more than 20 cm)",
                "Place speakers away from the walls",
            ],
        ));
    }

    match use_type {
        UseType::Recording => out.push(Recommendation::new(
            Finding::RecordingSetup,
            "Recording setup",
            &["Dead zone behind the microphone", "Lateral isolation"],
        )),
        UseType::Mixing => out.push(Recommendation::new(
            Finding::MixingSetup,
            "Mixing setup",
            &[
                "Treat first reflection points",
                "Place monitors in an equilateral triangle",
            ],
        )),
        _ => {}
    }

    out
}
