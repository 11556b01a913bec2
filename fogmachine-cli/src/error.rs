//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use fogmachine::config::ConfigFileError;
use fogmachine::coord::CoordError;
use fogmachine::grid::GridError;
use fogmachine::hgt::TileError;
use fogmachine::node::CoordinatorError;
use std::fmt;
use std::path::PathBuf;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Observer position out of range
    Coordinate(CoordError),
    /// Observer parameters rejected
    Observer(GridError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Tile directory could not be read
    Tiles(TileError),
    /// Viewshed computation failed
    Viewshed {
        error: CoordinatorError,
        tiles_dir: PathBuf,
    },
    /// Failed to write output file
    FileWrite { path: PathBuf, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Viewshed {
                error: CoordinatorError::DataUnavailable(missing),
                tiles_dir,
            } => {
                eprintln!();
                eprintln!("Place the following SRTM tiles in {}:", tiles_dir.display());
                for key in missing {
                    eprintln!("  {}", key.filename());
                }
                eprintln!();
                eprintln!("Run 'fogmachine tiles check' to see what a position needs.");
            }
            CliError::Viewshed {
                error: CoordinatorError::Grid(GridError::RadiusTooLarge { max, .. }),
                ..
            } => {
                eprintln!();
                eprintln!("The view radius must fit within one tile of the observer.");
                eprintln!("Try --radius {} or less.", max);
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Run 'fogmachine config path' to locate the configuration file.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Coordinate(e) => write!(f, "Invalid observer position: {}", e),
            CliError::Observer(e) => write!(f, "Invalid observer: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::Tiles(e) => write!(f, "Tile error: {}", e),
            CliError::Viewshed { error, .. } => write!(f, "Viewshed failed: {}", error),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Coordinate(e) => Some(e),
            CliError::Observer(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Tiles(e) => Some(e),
            CliError::Viewshed { error, .. } => Some(error),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coordinate(e)
    }
}

impl From<TileError> for CliError {
    fn from(e: TileError) -> Self {
        CliError::Tiles(e)
    }
}
