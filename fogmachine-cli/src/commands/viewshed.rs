//! `fogmachine viewshed` - compute what an observer can see.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use fogmachine::coord::Coordinate;
use fogmachine::node::{
    BatchWorker, InProcessTransport, NodeCoordinator, SimulatedPeer, ViewshedResult,
};
use fogmachine::observer::Observer;
use fogmachine::viewshed::SweepOptions;
use serde_json::json;
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the viewshed command.
#[derive(Debug, Args)]
pub struct ViewshedArgs {
    /// Observer latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Observer longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Eye height above ground in metres [default: from config]
    #[arg(long, allow_hyphen_values = true)]
    pub height: Option<f64>,

    /// View radius in grid cells [default: from config]
    #[arg(long)]
    pub radius: Option<u32>,

    /// Number of simulated peers to spread the sweep over [default: from config]
    #[arg(long)]
    pub peers: Option<usize>,

    /// Directory holding .hgt tiles [default: from config]
    #[arg(long)]
    pub tiles: Option<PathBuf>,

    /// Apply Earth-curvature correction
    #[arg(long)]
    pub curvature: bool,

    /// Write the full result as JSON to this file
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Run the viewshed command.
pub fn run(args: ViewshedArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("viewshed");
    let config = runner.config();

    let position = Coordinate::new(args.lat, args.lon)?;
    let height = args.height.unwrap_or(config.observer.height);
    let observer = Observer::new(
        position,
        height,
        args.radius.unwrap_or(config.observer.radius),
    );
    observer.validate().map_err(CliError::Observer)?;

    let tiles_dir = runner.tiles_dir(args.tiles.as_deref());
    let cache = runner.tile_cache(&tiles_dir);

    let transport = Arc::new(InProcessTransport::new());
    let peers = args.peers.unwrap_or(config.cluster.simulated_peers);
    for i in 1..=peers {
        transport.connect(
            format!("sim-{}", i),
            format!("simulated-{}", i),
            SimulatedPeer::new(BatchWorker::new(Arc::clone(&cache))),
        );
    }

    let mut coordinator_config = config.coordinator_config();
    if args.curvature {
        coordinator_config = coordinator_config
            .with_sweep_options(SweepOptions::default().with_curvature_correction(true));
    }

    info!(
        lat = args.lat,
        lon = args.lon,
        height,
        radius = observer.radius(),
        peers,
        tiles = %tiles_dir.display(),
        "Starting viewshed"
    );

    let coordinator = NodeCoordinator::new(cache, transport, coordinator_config);
    let runtime = runner.runtime()?;
    let result = runtime
        .block_on(coordinator.compute_viewshed(observer))
        .map_err(|error| CliError::Viewshed {
            error,
            tiles_dir: tiles_dir.clone(),
        })?;

    print_summary(&result);

    if let Some(path) = args.output {
        write_report(&path, &result)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn print_summary(result: &ViewshedResult) {
    let observer = result.observer();
    let position = observer.observer().position();
    let window = result.window();
    let counts = result.counts();
    let total = window.area().max(1) as f64;

    println!("Viewshed");
    println!("========");
    println!(
        "  Observer:  {:.5}, {:.5} ({} m above ground)",
        position.latitude(),
        position.longitude(),
        observer.observer().height()
    );
    println!(
        "  Tiles:     {} ({:?})",
        result
            .tiles()
            .keys()
            .iter()
            .map(|k| k.filename())
            .collect::<Vec<_>>()
            .join(", "),
        result.tiles().layout()
    );
    println!(
        "  Window:    {}x{} cells at ({}, {})",
        window.width(),
        window.height(),
        window.x(),
        window.y()
    );
    println!(
        "  Visible:   {} ({:.1}%)",
        counts.visible,
        counts.visible as f64 * 100.0 / total
    );
    println!(
        "  Occluded:  {} ({:.1}%)",
        counts.occluded,
        counts.occluded as f64 * 100.0 / total
    );
    println!("  Unknown:   {}", counts.unknown);
    println!(
        "  Batches:   {} ({} failed)",
        result.batches(),
        result.failures().len()
    );
    println!("  Elapsed:   {:.2?}", result.elapsed());

    for failure in result.failures() {
        println!(
            "  ! batch {} on {}: {} ({} rays untraced)",
            failure.batch_index,
            failure.node,
            failure.error,
            failure.targets.len()
        );
    }
}

fn report(result: &ViewshedResult) -> serde_json::Value {
    let observer = result.observer();
    json!({
        "observer": {
            "latitude": observer.observer().position().latitude(),
            "longitude": observer.observer().position().longitude(),
            "height": observer.observer().height(),
            "radius": observer.observer().radius(),
            "cell": observer.cell(),
        },
        "bounding_box": result.bounding_box(),
        "tiles": result.tiles(),
        "window": result.window(),
        "counts": result.counts(),
        "complete": result.is_complete(),
        "failures": result.failures().iter().map(|f| json!({
            "batch": f.batch_index,
            "node": f.node.unique_id(),
            "error": f.error.to_string(),
            "targets": f.targets.len(),
        })).collect::<Vec<_>>(),
        "elapsed_ms": result.elapsed().as_millis() as u64,
        "grid": result.grid().to_codes(),
    })
}

fn write_report(path: &Path, result: &ViewshedResult) -> Result<(), CliError> {
    let body = serde_json::to_string_pretty(&report(result)).map_err(|e| CliError::FileWrite {
        path: path.to_path_buf(),
        error: e.into(),
    })?;
    std::fs::write(path, body).map_err(|error| CliError::FileWrite {
        path: path.to_path_buf(),
        error,
    })
}
