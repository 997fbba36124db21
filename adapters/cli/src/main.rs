#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Rogue experience.

mod config;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use config::GameFile;
use rogue_rendering::{run_session, Scene};
use rogue_rendering_terminal::TerminalPresentation;
use rogue_system_bootstrap::{Bootstrap, DEFAULT_MAP};
use rogue_world::{self as world, query, World};
use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments accepted by the `rogue` binary.
#[derive(Debug, Parser)]
#[command(name = "rogue", about = "Turn-based dungeon crawl in the terminal")]
struct CliArgs {
    /// Map file to play instead of the built-in level.
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,

    /// TOML game file with seed, player and monster overrides.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for monster randomness; overrides the game file.
    #[arg(long)]
    seed: Option<u64>,

    /// Writes logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Entry point for the Rogue command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_file.as_deref())?;

    let game = match &args.config {
        Some(path) => GameFile::load(path)?,
        None => GameFile::default(),
    };
    let map = match &args.map {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read map {}", path.display()))?,
        None => DEFAULT_MAP.to_owned(),
    };
    let roster = game.roster(args.map.is_none());
    let seed = args
        .seed
        .or_else(|| game.seed())
        .unwrap_or_else(rand::random);
    info!(seed, monsters = roster.len(), "starting session");

    let bootstrap = Bootstrap;
    let mut world = bootstrap
        .start_level(&map, &roster, game.world_config(seed))
        .context("failed to start level")?;
    println!("{}", bootstrap.welcome_banner(&world));

    let mut presentation = TerminalPresentation::stdio();
    let mut events = Vec::new();
    let initial = capture_scene(&world);
    let last = run_session(&mut presentation, initial, |command| {
        events.clear();
        let status = world::apply(&mut world, command, &mut events)?;
        for event in &events {
            debug!(?event, "resolved");
        }
        debug!(?status, turn = query::turn(&world), "turn complete");
        Ok(capture_scene(&world))
    })?;

    info!(
        score = last.player.score,
        status = ?last.status,
        "session finished"
    );
    Ok(())
}

fn capture_scene(world: &World) -> Scene {
    let tiles = query::board(world)
        .tile_rows()
        .map(<[_]>::to_vec)
        .collect();
    Scene::new(
        tiles,
        query::player(world),
        query::monster_view(world).into_vec(),
        query::status(world),
    )
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    };
    installed.map_err(|error| anyhow!("failed to install logger: {error}"))
}
