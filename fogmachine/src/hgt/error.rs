//! Error types for elevation tile access.

use super::TileKey;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating or decoding elevation tiles.
#[derive(Debug, Error)]
pub enum TileError {
    /// No tile is resident for the key; the download collaborator must
    /// fetch it before a viewshed can be computed.
    #[error("Elevation tile {0} is not available locally")]
    NotFound(TileKey),

    /// Raw data length does not match the key's resolution.
    #[error("Elevation tile {key} has {actual} bytes, expected {expected}")]
    InvalidSize {
        key: TileKey,
        expected: usize,
        actual: usize,
    },

    /// Filename does not follow the `N00E000.hgt` convention.
    #[error("Invalid elevation tile filename: '{0}'")]
    InvalidFilename(String),

    /// Filesystem access failed.
    #[error("Failed to read elevation data at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
