//! Tile inspection CLI commands.
//!
//! Provides `tiles list` and `tiles check` for seeing which `.hgt` files are
//! resident and which ones a viewshed at a given position would need.

use std::path::PathBuf;

use clap::Subcommand;
use fogmachine::coord::Coordinate;
use fogmachine::grid::{max_radius, missing_tiles};
use fogmachine::observer::Observer;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Tiles subcommands.
#[derive(Debug, Subcommand)]
pub enum TilesCommands {
    /// List resident tiles
    List {
        /// Directory holding .hgt tiles [default: from config]
        #[arg(long)]
        tiles: Option<PathBuf>,
    },

    /// Show which tiles a viewshed at a position needs
    Check {
        /// Observer latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Observer longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// View radius in grid cells [default: from config]
        #[arg(long)]
        radius: Option<u32>,

        /// Directory holding .hgt tiles [default: from config]
        #[arg(long)]
        tiles: Option<PathBuf>,
    },
}

/// Run a tiles subcommand.
pub fn run(command: TilesCommands, runner: &CliRunner) -> Result<(), CliError> {
    match command {
        TilesCommands::List { tiles } => run_list(runner, tiles),
        TilesCommands::Check {
            lat,
            lon,
            radius,
            tiles,
        } => run_check(runner, lat, lon, radius, tiles),
    }
}

fn run_list(runner: &CliRunner, tiles: Option<PathBuf>) -> Result<(), CliError> {
    let dir = runner.tiles_dir(tiles.as_deref());
    let cache = runner.tile_cache(&dir);
    let keys = cache.store().resident_tiles()?;

    println!(
        "{} ({} tiles, {})",
        dir.display(),
        keys.len(),
        runner.config().tiles.resolution
    );
    for key in keys {
        println!("  {}", key.filename());
    }

    Ok(())
}

fn run_check(
    runner: &CliRunner,
    lat: f64,
    lon: f64,
    radius: Option<u32>,
    tiles: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = runner.config();
    let resolution = config.tiles.resolution;
    let radius = radius.unwrap_or(config.observer.radius);
    let observer = Observer::new(Coordinate::new(lat, lon)?, config.observer.height, radius);

    let identity = observer.required_tiles(resolution).map_err(|e| {
        CliError::Config(format!(
            "{} (radius must be at most {} cells at {})",
            e,
            max_radius(resolution),
            resolution
        ))
    })?;

    let dir = runner.tiles_dir(tiles.as_deref());
    let cache = runner.tile_cache(&dir);
    let missing = missing_tiles(&identity, cache.store().as_ref());

    println!(
        "Observer {:.5}, {:.5} with radius {} needs {:?} layout:",
        lat,
        lon,
        radius,
        identity.layout()
    );
    for key in identity.keys() {
        let status = if missing.contains(key) {
            "missing"
        } else {
            "present"
        };
        println!("  {}  {}", key.filename(), status);
    }

    if missing.is_empty() {
        println!("All tiles present in {}", dir.display());
    } else {
        println!("{} tile(s) missing from {}", missing.len(), dir.display());
    }

    Ok(())
}
