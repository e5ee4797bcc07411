//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::info;

use super::{ProfileArgs, RoomArgs};
use crate::analysis::{GridSpec, Point, SoundSource};
use crate::config::EngineConfig;
use crate::engine::{AcousticEngine, AnalysisReport};
use crate::error::{AcousticError, Result};
use crate::materials::{OctaveBand, SurfaceAssignment};
use crate::room::RoomGeometry;
use crate::state::{ParameterBundle, ProjectStore, SpeakerRef};

/// Build the engine from an optional config file.
pub fn load_engine(config: Option<&Path>) -> Result<AcousticEngine> {
    let config = match config {
        Some(path) => {
            info!("Loading engine configuration: {}", path.display());
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };
    AcousticEngine::new(config)
}

/// Parse a `BRAND/MODEL` speaker argument.
pub fn parse_speaker(arg: &str) -> Result<SpeakerRef> {
    match arg.split_once('/') {
        Some((brand, model)) if !brand.trim().is_empty() && !model.trim().is_empty() => {
            Ok(SpeakerRef::Catalog {
                brand: brand.trim().to_string(),
                model: model.trim().to_string(),
            })
        }
        _ => Err(AcousticError::invalid_parameter("speaker", arg, "BRAND/MODEL")),
    }
}

/// Parse `NAME=PERCENT` surface arguments.
pub fn parse_surface(arg: &str) -> Result<(String, f64)> {
    let invalid = || AcousticError::invalid_parameter("surface", arg, "NAME=PERCENT");
    let (name, percent) = arg.split_once('=').ok_or_else(invalid)?;
    let percent: f64 = percent.trim().parse().map_err(|_| invalid())?;
    if name.trim().is_empty() {
        return Err(invalid());
    }
    Ok((name.trim().to_string(), percent))
}

/// Turn command-line room and profile options into a bundle.
pub fn build_bundle(name: &str, room: &RoomArgs, profile: &ProfileArgs) -> Result<ParameterBundle> {
    let geometry = RoomGeometry::new(room.length, room.width, room.height)?;
    let coverage = profile
        .surfaces
        .iter()
        .map(|s| parse_surface(s))
        .collect::<Result<Vec<_>>>()?;
    let surfaces = SurfaceAssignment::from_coverage(&geometry, coverage)?;

    Ok(ParameterBundle::new(name, geometry, &profile.instrument)
        .with_room_type(profile.room_type.into())
        .with_use_type(profile.use_type.into())
        .with_surfaces(surfaces))
}

/// Analyze a bundle and print the report.
pub fn analyze(engine: &AcousticEngine, bundle: &ParameterBundle, json: bool) -> Result<()> {
    info!("Analyzing '{}'", bundle.name);
    let report = engine.analyze(bundle)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
        println!("Digest: {}", report.digest()?);
    }
    Ok(())
}

/// Analyze a saved project.
pub fn analyze_project(engine: &AcousticEngine, store: &Path, name: &str, json: bool) -> Result<()> {
    let store = ProjectStore::open(store)?;
    let bundle = store.load(name)?;
    analyze(engine, &bundle, json)
}

fn print_report(report: &AnalysisReport) {
    let g = &report.geometry;
    println!("Room: {}", report.name);
    println!("{:-<60}", "");
    println!(
        "Dimensions: {:.2} x {:.2} x {:.2} m ({}, {})",
        g.length,
        g.width,
        g.height,
        report.room_type.display_name(),
        report.use_type.display_name()
    );
    println!(
        "Volume: {:.1} m³  Surface: {:.1} m²  Floor: {:.1} m²",
        g.volume, g.surface_area, g.floor_area
    );
    println!(
        "Proportions L/W {:.2}, L/H {:.2}, W/H {:.2} ({:?})",
        g.aspect_lw, g.aspect_lh, g.aspect_wh, g.proportion_quality
    );
    for (axis, frequency) in &g.axial_fundamentals {
        println!("  {} fundamental: {:.1} Hz", axis.name(), frequency);
    }

    let r = &report.reverb;
    println!();
    println!("RT60 (simple): {:.2} s", r.simple);
    if let Some(profile) = &r.profile {
        for band in &profile.bands {
            println!("  {:>5} Hz: {:.2} s", band.band.center_hz(), band.rt60);
        }
        println!("RT60 (materials): {:.2} s", profile.broadband);
    }
    for name in &r.unknown_materials {
        println!("  unknown material '{}' used the fallback coefficient", name);
    }
    println!("Schroeder frequency: {:.0} Hz", r.schroeder_frequency);

    let m = &report.modes;
    println!();
    println!(
        "Modes up to {:.0} Hz: {} ({} axial, {} tangential, {} oblique)",
        m.max_frequency,
        m.counts.total(),
        m.counts.axial,
        m.counts.tangential,
        m.counts.oblique
    );
    for mode in &m.problematic {
        println!(
            "  axial {:?}: {:.1} Hz",
            mode.indices, mode.frequency
        );
    }

    if let Some(composite) = &report.spl.composite {
        println!();
        println!(
            "SPL ({} sources): {:.1} to {:.1} dB, spread {:.1} dB",
            report.spl.fields.len(),
            composite.min(),
            composite.max(),
            composite.spread()
        );
    }

    let a = &report.amplification;
    println!();
    println!("Configuration: {}", a.configuration);
    println!("Recommended amplifier power: {} W", a.recommended_watts);
    if a.installed.total > 0.0 {
        println!(
            "Installed: {:.0} W (passive {:.0}, active {:.0}, sub {:.0})",
            a.installed.total, a.installed.passive, a.installed.active, a.installed.subwoofer
        );
    }
    if let (Some(speaker), Some(headroom)) = (&a.main_speaker, &a.headroom) {
        println!(
            "{}: needs {:.1} W, headroom x{:.1} ({:?})",
            speaker, headroom.power_needed, headroom.ratio, headroom.verdict
        );
    }
    for level in &a.group_levels {
        println!("  {} ({}): {:.1} dB", level.role.name(), level.speaker, level.spl_db);
    }

    let s = &report.suitability;
    println!();
    println!(
        "Suitability for {}: {:?} (RT60 ideal {:.1}-{:.1} s, volume ideal {:.0}-{:.0} m³)",
        s.instrument,
        s.verdict,
        s.ideal_rt60.min,
        s.ideal_rt60.max,
        s.ideal_volume.min,
        s.ideal_volume.max
    );

    if !report.recommendations.is_empty() {
        println!();
        println!("Recommendations:");
        for rec in &report.recommendations {
            println!("  {}", rec.summary);
            for action in &rec.actions {
                println!("    - {}", action);
            }
        }
    }
}

/// List room modes.
pub fn modes(engine: &AcousticEngine, room: &RoomArgs, max_frequency: Option<f64>) -> Result<()> {
    let geometry = RoomGeometry::new(room.length, room.width, room.height)?;
    let cutoff = max_frequency.unwrap_or(engine.config().mode_max_frequency);
    info!("Enumerating modes up to {} Hz", cutoff);

    let modes = engine.modal().modes(&geometry, cutoff)?;
    if modes.is_empty() {
        println!("No modes below {:.0} Hz.", cutoff);
        return Ok(());
    }

    println!("{:>10}  {:>12}  {}", "Hz", "(nx,ny,nz)", "Kind");
    println!("{:-<40}", "");
    for mode in &modes {
        let [nx, ny, nz] = mode.indices;
        println!(
            "{:>10.1}  {:>12}  {:?}",
            mode.frequency,
            format!("({},{},{})", nx, ny, nz),
            mode.kind
        );
    }
    Ok(())
}

/// Print the SPL field of one source.
pub fn spl(
    engine: &AcousticEngine,
    room: &RoomArgs,
    position: Point,
    sensitivity: f64,
    speaker: Option<&str>,
    power: f64,
    resolution: Option<f64>,
) -> Result<()> {
    let geometry = RoomGeometry::new(room.length, room.width, room.height)?;
    let grid = GridSpec::new(resolution.unwrap_or(engine.config().grid_resolution));
    let source = match speaker {
        Some(arg) => {
            let spec = engine.resolve_speaker(&parse_speaker(arg)?)?;
            info!("Source speaker: {} {} ({:?})", spec.brand, spec.model, spec.directivity);
            SoundSource::from_speaker("source", position, &spec, power)
        }
        None => SoundSource::new("source", position, sensitivity, power),
    };

    let fields = engine.spl().simulate(&geometry, &[source], &grid)?;
    for field in &fields {
        print!("{:>8}", "y\\x");
        for x in &field.xs {
            print!("{:>7.2}", x);
        }
        println!();
        for (j, y) in field.ys.iter().enumerate() {
            print!("{:>8.2}", y);
            for i in 0..field.xs.len() {
                print!("{:>7.1}", field.get(i, j).unwrap_or(f64::NAN));
            }
            println!();
        }
        println!(
            "Max {:.1} dB, min {:.1} dB, spread {:.1} dB",
            field.max(),
            field.min(),
            field.spread()
        );
    }
    Ok(())
}

/// Print the material table.
pub fn list_materials(engine: &AcousticEngine) -> Result<()> {
    print!("{:<16}", "Material");
    for band in OctaveBand::ALL {
        print!("{:>7}", band.center_hz());
    }
    println!();
    println!("{:-<58}", "");
    for entry in engine.materials().iter() {
        print!("{:<16}", entry.name);
        for coefficient in entry.coefficients {
            print!("{:>7.2}", coefficient);
        }
        println!();
    }
    Ok(())
}

/// Print the speaker catalog.
pub fn list_speakers(engine: &AcousticEngine) -> Result<()> {
    for spec in engine.speakers().iter() {
        println!(
            "{:<26} {:<10} {:>5.1} dB  {:>6.0} W max  {:>6.0} W rms  {:.0} Ω",
            spec.display_name(),
            spec.kind.name(),
            spec.sensitivity_db,
            spec.max_power_watts,
            spec.nominal_power_watts,
            spec.impedance_ohms
        );
    }
    Ok(())
}

/// Print instrument profiles.
pub fn list_instruments(engine: &AcousticEngine) -> Result<()> {
    for profile in engine.scorer().profiles() {
        println!(
            "{:<20} {:<18} RT60 {:.1}-{:.1} s  volume {:.0}-{:.0} m³",
            profile.name,
            profile.alias,
            profile.rt60.min,
            profile.rt60.max,
            profile.volume.min,
            profile.volume.max
        );
    }
    Ok(())
}

/// Save a project.
pub fn project_save(store: &Path, bundle: &ParameterBundle, force: bool) -> Result<()> {
    let store = ProjectStore::open(store)?;
    let path = store.save(bundle, force)?;
    println!("Project saved: {}", path.display());
    Ok(())
}

/// Print a saved project as JSON.
pub fn project_load(store: &Path, name: &str) -> Result<()> {
    let store = ProjectStore::open(store)?;
    let document = store.load_document(name)?;
    println!("Project: {} ({})", document.bundle.name, document.id);
    println!("Created: {}", document.created_at);
    println!("Saved:   {}", document.saved_at);
    println!("{}", serde_json::to_string_pretty(&document.bundle)?);
    Ok(())
}

/// List saved projects.
pub fn project_list(store: &Path) -> Result<()> {
    let store = ProjectStore::open(store)?;
    let projects = store.list()?;
    if projects.is_empty() {
        println!("No projects in {}.", store.root().display());
        return Ok(());
    }
    for project in projects {
        println!("{:<32} {}", project.name, project.saved_at.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}

/// Delete a saved project.
pub fn project_delete(store: &Path, name: &str) -> Result<()> {
    let store = ProjectStore::open(store)?;
    store.delete(name)?;
    println!("Project deleted: {}", name);
    Ok(())
}
