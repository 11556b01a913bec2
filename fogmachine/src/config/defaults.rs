//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::hgt::Resolution;

/// Default tile resolution.
pub const DEFAULT_RESOLUTION: Resolution = Resolution::SRTM3;

/// Default observer eye height in metres.
pub const DEFAULT_OBSERVER_HEIGHT_M: f64 = 2.0;

/// Default view radius in cells (about 22 km at SRTM3).
pub const DEFAULT_RADIUS_CELLS: u32 = 250;

/// Default seconds to wait for peers.
pub const DEFAULT_PEER_TIMEOUT_SECS: u64 = 30;

/// Default number of simulated peers.
pub const DEFAULT_SIMULATED_PEERS: usize = 0;

/// Default rayon worker count (0 = one per core).
pub const DEFAULT_WORKERS: usize = 0;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "fogmachine.log";

/// Get the number of available CPU cores.
pub fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Default tile directory (~/.fogmachine/tiles).
pub fn default_tiles_dir() -> PathBuf {
    config_directory().join("tiles")
}

/// Default log file (~/.fogmachine/logs/fogmachine.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join("logs").join(DEFAULT_LOG_FILE)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            tiles: TilesSettings {
                directory: default_tiles_dir(),
                resolution: DEFAULT_RESOLUTION,
            },
            observer: ObserverSettings {
                height: DEFAULT_OBSERVER_HEIGHT_M,
                radius: DEFAULT_RADIUS_CELLS,
            },
            viewshed: ViewshedSettings {
                curvature_correction: false,
                workers: DEFAULT_WORKERS,
            },
            cluster: ClusterSettings {
                peer_timeout_secs: DEFAULT_PEER_TIMEOUT_SECS,
                simulated_peers: DEFAULT_SIMULATED_PEERS,
            },
            logging: LoggingSettings {
                file: default_log_file(),
            },
        }
    }
}
