//! Error types for grid construction and lookup.

use crate::coord::CoordError;
use crate::hgt::{Resolution, TileError};
use thiserror::Error;

/// Errors raised while stitching tiles or addressing the stitched grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// A coordinate or bounding box left the valid range.
    #[error("Coordinate error: {0}")]
    Coord(#[from] CoordError),

    /// A tile could not be loaded.
    #[error(transparent)]
    Tile(#[from] TileError),

    /// Grid-local coordinates outside the stitched extent.
    #[error("Cell ({x}, {y}) is outside the {width}x{height} elevation grid")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    /// The view radius spans a full tile or more, which a 2×2 layout
    /// cannot cover.
    #[error("View radius of {radius} cells exceeds the maximum of {max} for this resolution")]
    RadiusTooLarge { radius: u32, max: u32 },

    /// Eye heights must be finite and not below the ground.
    #[error("Observer height must be a non-negative number of metres, got {0}")]
    InvalidHeight(f64),

    /// Tiles of different resolutions cannot be stitched together.
    #[error("Cannot stitch {found} tile into a {expected} grid")]
    MixedResolution {
        expected: Resolution,
        found: Resolution,
    },

    /// Tile keys do not describe a contiguous stitch layout.
    #[error("Invalid grid layout: {0}")]
    InvalidLayout(String),
}

impl GridError {
    /// True when the underlying cause is a tile that is not resident.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, GridError::Tile(TileError::NotFound(_)))
    }
}
