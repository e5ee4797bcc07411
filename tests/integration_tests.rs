//! Integration Tests
//!
//! End-to-end tests for the analysis pipeline.

use approx::{assert_abs_diff_eq, assert_relative_eq};

use acustica::analysis::{
    ChannelGroup, Directivity, ModeKind, Point, SoundSource, SpeakerLayout, Verdict,
};
use acustica::catalog::SpeakerKind;
use acustica::materials::SurfaceAssignment;
use acustica::state::SpeakerRef;
use acustica::{AcousticEngine, ParameterBundle, RoomGeometry};

fn reference_room() -> RoomGeometry {
    RoomGeometry::new(10.0, 8.0, 3.0).unwrap()
}

fn full_bundle() -> ParameterBundle {
    let room = reference_room();
    let surfaces = SurfaceAssignment::from_coverage(
        &room,
        [
            ("carpet".to_string(), 38.5),
            ("acoustic_panel".to_string(), 20.0),
            ("drywall".to_string(), 41.5),
        ],
    )
    .unwrap();
    let catalog = acustica::catalog::SpeakerCatalog::builtin();
    let sub = catalog.find("Generic", "Sub 18").unwrap().clone();

    ParameterBundle::new("club", room, "DJ Set")
        .with_surfaces(surfaces)
        .with_layout(SpeakerLayout {
            main_speakers: 2,
            include_sub: true,
        })
        .with_main_speaker(SpeakerRef::Catalog {
            brand: "Generic".to_string(),
            model: "Active 12".to_string(),
        })
        .with_channel_group(ChannelGroup::new(SpeakerKind::Active, 2, 500.0))
        .with_channel_group(ChannelGroup::new(SpeakerKind::Subwoofer, 1, 1000.0).with_speaker(sub))
        .with_source(
            SoundSource::new("left", Point::new(1.0, 2.0), 97.0, 500.0)
                .with_directivity(Directivity::horn_lobe(), 0.0),
        )
        .with_source(SoundSource::new("right", Point::new(1.0, 6.0), 97.0, 500.0))
        .with_target(105.0, 5.0)
}

// === Reference Scenarios ===

#[test]
fn test_reference_room_geometry() {
    let room = reference_room();
    assert_abs_diff_eq!(room.volume(), 240.0);
    assert_abs_diff_eq!(room.surface_area(), 208.0);
    assert_abs_diff_eq!(room.aspect_lw(), 1.25);

    let permuted = RoomGeometry::new(3.0, 10.0, 8.0).unwrap();
    assert_abs_diff_eq!(permuted.surface_area(), room.surface_area());
}

#[test]
fn test_reference_room_modes() {
    let engine = AcousticEngine::default();
    let modes = engine.modal().modes(&reference_room(), 200.0).unwrap();

    let first = modes[0];
    assert_eq!(first.indices, [1, 0, 0]);
    assert_relative_eq!(first.frequency, 17.0, epsilon = 1e-9);

    for axis_index in 0..3 {
        assert!(modes
            .iter()
            .any(|m| m.kind == ModeKind::Axial && m.indices[axis_index] > 0));
    }
    assert!(modes.windows(2).all(|w| w[0].frequency <= w[1].frequency));
}

#[test]
fn test_reference_spl() {
    let engine = AcousticEngine::default();
    let source = SoundSource::new("main", Point::new(0.0, 0.0), 90.0, 500.0);
    let level = engine.spl().spl_at(&source, &Point::new(4.0, 0.0));
    assert_abs_diff_eq!(level, 104.95, epsilon = 0.01);
}

#[test]
fn test_voice_profile_in_large_room() {
    let engine = AcousticEngine::default();
    let result = engine.scorer().score("Voce/Podcast", 0.5, 240.0).unwrap();
    assert_eq!(result.verdict, Verdict::Good);
}

// === Full Pipeline ===

#[test]
fn test_full_bundle_analysis() {
    let engine = AcousticEngine::default();
    let report = engine.analyze(&full_bundle()).unwrap();

    let profile = report.reverb.profile.as_ref().unwrap();
    assert_eq!(profile.bands.len(), 6);
    for band in &profile.bands {
        assert!((0.1..=5.0).contains(&band.rt60));
    }
    assert!(report.reverb.unknown_materials.is_empty());

    assert_eq!(report.amplification.configuration, "2 speakers + subwoofer");
    assert_abs_diff_eq!(report.amplification.installed.total, 2000.0);
    assert_abs_diff_eq!(report.amplification.installed.active, 1000.0);
    assert!(report.amplification.headroom.is_some());
    // Only the subwoofer group names a speaker
    assert_eq!(report.amplification.group_levels.len(), 1);
    assert_eq!(report.amplification.group_levels[0].role, SpeakerKind::Subwoofer);

    assert_eq!(report.spl.fields.len(), 2);
    let composite = report.spl.composite.as_ref().unwrap();
    assert!(composite.levels.iter().all(|l| l.is_finite()));
}

#[test]
fn test_degenerate_inputs_stay_finite() {
    let engine = AcousticEngine::default();
    let room = RoomGeometry::new(2.0, 2.0, 2.0).unwrap();
    let surfaces = SurfaceAssignment::from_areas([("concrete".to_string(), 0.0)]).unwrap();
    let bundle = ParameterBundle::new("closet", room, "Voce/Podcast")
        .with_surfaces(surfaces)
        .with_source(SoundSource::new("s", Point::new(0.5, 0.5), 90.0, 1.0))
        .with_grid_resolution(0.5)
        .with_max_mode_frequency(10.0);

    let report = engine.analyze(&bundle).unwrap();
    assert_abs_diff_eq!(report.reverb.effective, 5.0);
    assert!(report.modes.modes.is_empty());
    assert!(report.spl.fields[0].levels.iter().all(|l| l.is_finite()));
}

#[test]
fn test_invalid_inputs_raise() {
    let engine = AcousticEngine::default();

    assert_eq!(
        RoomGeometry::new(10.0, -1.0, 3.0).unwrap_err().error_code(),
        "INVALID_GEOMETRY"
    );

    let bundle = ParameterBundle::new("bad", reference_room(), "Voce/Podcast")
        .with_source(SoundSource::new("s", Point::new(1.0, 1.0), 90.0, -5.0));
    assert_eq!(engine.analyze(&bundle).unwrap_err().error_code(), "INVALID_POWER");

    let bundle = ParameterBundle::new("bad", reference_room(), "Voce/Podcast")
        .with_source(SoundSource::new("s", Point::new(20.0, 1.0), 90.0, 5.0));
    assert_eq!(engine.analyze(&bundle).unwrap_err().error_code(), "INVALID_POSITION");

    let bundle = ParameterBundle::new("bad", reference_room(), "Voce/Podcast").with_main_speaker(
        SpeakerRef::Catalog {
            brand: "Nobody".to_string(),
            model: "Nothing".to_string(),
        },
    );
    assert_eq!(engine.analyze(&bundle).unwrap_err().error_code(), "UNKNOWN_SPEAKER");
}

// === Concurrency ===

#[test]
fn test_parallel_analyses_match_sequential() {
    let engine = AcousticEngine::default();
    let bundles: Vec<ParameterBundle> = (0..4)
        .map(|i| {
            let room = RoomGeometry::new(6.0 + i as f64, 5.0, 3.0).unwrap();
            ParameterBundle::new(&format!("room {}", i), room, "Batteria")
        })
        .collect();

    let sequential: Vec<String> = bundles
        .iter()
        .map(|b| engine.analyze(b).unwrap().digest().unwrap())
        .collect();

    let parallel: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = bundles
            .iter()
            .map(|b| {
                let engine = &engine;
                scope.spawn(move || engine.analyze(b).unwrap().digest().unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}
