//! Acustica CLI - Room Acoustics Analysis
//!
//! Command-line interface for the acoustic analysis engine.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::debug;

use acustica::analysis::Point;
use acustica::cli::commands;
use acustica::cli::{Cli, Commands, ProjectCommand};
use acustica::AcousticEngine;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    debug!("Acustica v{}", env!("CARGO_PKG_VERSION"));

    let engine = commands::load_engine(cli.config.as_deref())
        .context("failed to initialize the analysis engine")?;

    match cli.command {
        Some(cmd) => handle_command(&engine, cmd),
        None => {
            println!("Acustica v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(engine: &AcousticEngine, cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Analyze {
            dimensions,
            project,
            store,
            profile,
            json,
        } => match project {
            Some(name) => commands::analyze_project(engine, &store, &name, json)
                .with_context(|| format!("failed to analyze project '{}'", name))?,
            None => {
                let room = match dimensions.as_slice() {
                    &[length, width, height] => acustica::cli::RoomArgs {
                        length,
                        width,
                        height,
                    },
                    _ => anyhow::bail!("expected LENGTH WIDTH HEIGHT"),
                };
                let bundle = commands::build_bundle("room", &room, &profile)?;
                commands::analyze(engine, &bundle, json)?;
            }
        },
        Commands::Modes {
            room,
            max_frequency,
        } => commands::modes(engine, &room, max_frequency)?,
        Commands::Spl {
            room,
            x,
            y,
            sensitivity,
            speaker,
            power,
            resolution,
        } => commands::spl(
            engine,
            &room,
            Point::new(x, y),
            sensitivity,
            speaker.as_deref(),
            power,
            resolution,
        )?,
        Commands::Materials => commands::list_materials(engine)?,
        Commands::Speakers => commands::list_speakers(engine)?,
        Commands::Instruments => commands::list_instruments(engine)?,
        Commands::Project { store, action } => match action {
            ProjectCommand::Save {
                name,
                room,
                profile,
                force,
            } => {
                let bundle = commands::build_bundle(&name, &room, &profile)?;
                commands::project_save(&store, &bundle, force)?;
            }
            ProjectCommand::Load { name } => commands::project_load(&store, &name)?,
            ProjectCommand::List => commands::project_list(&store)?,
            ProjectCommand::Delete { name } => commands::project_delete(&store, &name)?,
        },
    }
    Ok(())
}
