//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and the worker pool
//! so command handlers start from the same state.

use crate::error::CliError;
use fogmachine::config::ConfigFile;
use fogmachine::hgt::{DirectoryTileStore, TileCache};
use fogmachine::logging::{init_logging_full, LoggingGuard};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a runner, loading config from `config_path` (or the default
    /// location) and initializing logging.
    ///
    /// Events are mirrored to stdout only in debug mode so command output
    /// stays readable.
    pub fn new(config_path: Option<&Path>, debug_mode: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging_full(&config.logging.file, debug_mode, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let workers = config.viewshed.workers;
        if workers > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build_global()
            {
                warn!(workers, error = %e, "Could not size sweep thread pool");
            }
        }

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("FogMachine v{}", fogmachine::VERSION);
        info!("FogMachine CLI: {} command", command);
        info!(log = %self.logging_guard.path().display(), "Logging to file");
    }

    /// Tile directory, preferring `override_dir` over the config.
    pub fn tiles_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.tiles.directory.clone())
    }

    /// Tile cache over the tile directory.
    pub fn tile_cache(&self, tiles_dir: &Path) -> Arc<TileCache> {
        let store = DirectoryTileStore::new(tiles_dir, self.config.tiles.resolution);
        Arc::new(TileCache::new(Arc::new(store)))
    }

    /// Multi-threaded runtime for the coordinator.
    pub fn runtime(&self) -> Result<tokio::runtime::Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)
    }
}
