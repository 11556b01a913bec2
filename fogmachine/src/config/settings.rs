//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use crate::hgt::Resolution;
use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Elevation tile settings
    pub tiles: TilesSettings,
    /// Default observer settings
    pub observer: ObserverSettings,
    /// Sweep settings
    pub viewshed: ViewshedSettings,
    /// Peer dispatch settings
    pub cluster: ClusterSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Where elevation tiles live.
#[derive(Debug, Clone, PartialEq)]
pub struct TilesSettings {
    /// Directory holding `*.hgt` files
    pub directory: PathBuf,
    /// Sample density of the tiles in the directory
    pub resolution: Resolution,
}

/// Observer defaults used when the command line leaves them out.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverSettings {
    /// Eye height above ground, in metres
    pub height: f64,
    /// View radius, in grid cells
    pub radius: u32,
}

/// Line-of-sight computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewshedSettings {
    /// Apply Earth-curvature correction to elevation angles
    pub curvature_correction: bool,
    /// Rayon worker threads (0 = one per core)
    pub workers: usize,
}

/// Distribution across peers.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSettings {
    /// Seconds to wait for peer batches
    pub peer_timeout_secs: u64,
    /// In-process peers to simulate
    pub simulated_peers: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
