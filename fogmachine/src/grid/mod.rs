//! Elevation grids stitched from SRTM tiles.
//!
//! A viewshed never needs more than four tiles: the view radius is capped
//! below one degree, so the square around the observer touches at most a
//! 2×2 block. [`tiles_for_box`] reduces the box corners to the unique
//! tiles, [`ElevationGrid`] addresses them as one array.

mod elevation;
mod error;
mod layout;

pub use elevation::{Cell, ElevationGrid};
pub use error::GridError;
pub use layout::{dedupe_corner_tiles, tiles_for_box, GridIdentity, StitchLayout};

use crate::hgt::{Resolution, TileKey, TileStore};

/// Keys from `identity` that `store` cannot supply.
pub fn missing_tiles(identity: &GridIdentity, store: &dyn TileStore) -> Vec<TileKey> {
    identity
        .keys()
        .iter()
        .filter(|key| !store.has_tile(key))
        .copied()
        .collect()
}

/// Largest view radius, in cells, supported at `resolution`.
///
/// One cell short of a full tile so the view square spans at most two
/// tiles on each axis.
#[inline]
pub fn max_radius(resolution: Resolution) -> u32 {
    resolution.cells_per_degree().saturating_sub(1)
}
