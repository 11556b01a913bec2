//! Configuration for FogMachine.
//!
//! [`ConfigFile`] mirrors `~/.fogmachine/config.ini`; [`CoordinatorConfig`]
//! is the typed runtime configuration handed to the coordinator.
//!
//! # Example
//!
//! ```
//! use fogmachine::config::ConfigFile;
//!
//! let file = ConfigFile::default();
//! let runtime = file.coordinator_config();
//! assert_eq!(runtime.resolution(), file.tiles.resolution);
//! ```

mod coordinator;
mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use coordinator::CoordinatorConfig;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use defaults::{
    default_log_file, default_tiles_dir, num_cpus, DEFAULT_LOG_FILE, DEFAULT_OBSERVER_HEIGHT_M,
    DEFAULT_PEER_TIMEOUT_SECS, DEFAULT_RADIUS_CELLS, DEFAULT_RESOLUTION, DEFAULT_SIMULATED_PEERS,
    DEFAULT_WORKERS,
};
pub use settings::{
    ClusterSettings, ConfigFile, LoggingSettings, ObserverSettings, TilesSettings,
    ViewshedSettings,
};
