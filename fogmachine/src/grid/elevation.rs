//! Stitched elevation grid.

use super::{tiles_for_box, GridError, GridIdentity};
use crate::coord::{metres_per_degree_lat, metres_per_degree_lon, BoundingBox, Coordinate};
use crate::hgt::{ElevationTile, Resolution, TileCache};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Grid-local cell address: `x` is the column counted eastward from the
/// western edge, `y` the row counted southward from the northern edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Elevation samples from one to four adjacent tiles addressed as a single
/// 2-D array.
///
/// Neighbouring SRTM tiles repeat their shared edge, so a grid of `cols`
/// tiles is `cols * (side - 1) + 1` samples wide. Lookups on a seam read
/// from the tile further east (or further south).
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    identity: GridIdentity,
    tiles: Vec<Arc<ElevationTile>>,
    width: usize,
    height: usize,
}

impl ElevationGrid {
    /// Build the grid covering `bbox` from the unique tiles its corners
    /// fall in.
    pub fn build(
        bbox: &BoundingBox,
        resolution: Resolution,
        cache: &TileCache,
    ) -> Result<Self, GridError> {
        let identity = tiles_for_box(bbox, resolution)?;
        Self::load(&identity, cache)
    }

    /// Load the tiles named by `identity` through `cache` and stitch them.
    pub fn load(identity: &GridIdentity, cache: &TileCache) -> Result<Self, GridError> {
        let tiles = identity
            .keys()
            .iter()
            .map(|key| cache.tile(key))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_tiles(identity.clone(), tiles)
    }

    /// Stitch already loaded tiles. `tiles` must follow the identity's
    /// row-major key order.
    pub fn from_tiles(
        identity: GridIdentity,
        tiles: Vec<Arc<ElevationTile>>,
    ) -> Result<Self, GridError> {
        if tiles.len() != identity.keys().len() {
            return Err(GridError::InvalidLayout(format!(
                "expected {} tiles, got {}",
                identity.keys().len(),
                tiles.len()
            )));
        }

        let resolution = identity.resolution();
        for (tile, key) in tiles.iter().zip(identity.keys()) {
            if tile.resolution() != resolution {
                return Err(GridError::MixedResolution {
                    expected: resolution,
                    found: tile.resolution(),
                });
            }
            if !tile.key().same_cell(key) {
                return Err(GridError::InvalidLayout(format!(
                    "tile {} supplied in place of {}",
                    tile.key().filename(),
                    key.filename()
                )));
            }
        }

        let cells = resolution.cells_per_degree() as usize;
        let layout = identity.layout();
        let width = layout.cols() * cells + 1;
        let height = layout.rows() * cells + 1;

        debug!(
            layout = ?layout,
            width,
            height,
            north_west = %identity.north_west(),
            "Stitched elevation grid"
        );

        Ok(Self {
            identity,
            tiles,
            width,
            height,
        })
    }

    pub fn identity(&self) -> &GridIdentity {
        &self.identity
    }

    pub fn resolution(&self) -> Resolution {
        self.identity.resolution()
    }

    /// Columns of samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows of samples.
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when (x, y) addresses a sample.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Latitude of row 0.
    pub fn north(&self) -> f64 {
        (self.identity.north_west().lat + 1) as f64
    }

    /// Longitude of column 0.
    pub fn west(&self) -> f64 {
        self.identity.north_west().lon as f64
    }

    /// Elevation in metres at grid-local (x, y).
    ///
    /// Voids come back as [`crate::hgt::NO_DATA`]; coordinates outside the
    /// stitched extent are an error.
    pub fn elevation_at(&self, x: i64, y: i64) -> Result<i16, GridError> {
        let out_of_bounds = || GridError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        };
        if !self.contains(x, y) {
            return Err(out_of_bounds());
        }

        let cells = self.resolution().cells_per_degree() as usize;
        let layout = self.identity.layout();
        let (x, y) = (x as usize, y as usize);

        let tile_col = (x / cells).min(layout.cols() - 1);
        let tile_row = (y / cells).min(layout.rows() - 1);
        let tile = &self.tiles[tile_row * layout.cols() + tile_col];

        tile.elevation(y - tile_row * cells, x - tile_col * cells)
            .ok_or_else(out_of_bounds)
    }

    /// Elevation at a [`Cell`].
    #[inline]
    pub fn elevation_at_cell(&self, cell: Cell) -> Result<i16, GridError> {
        self.elevation_at(cell.x as i64, cell.y as i64)
    }

    /// Nearest sample to a geographic coordinate.
    pub fn cell_for(&self, coordinate: Coordinate) -> Result<Cell, GridError> {
        let cells = self.resolution().cells_per_degree() as f64;
        let x = ((coordinate.longitude() - self.west()) * cells).round() as i64;
        let y = ((self.north() - coordinate.latitude()) * cells).round() as i64;
        if !self.contains(x, y) {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(Cell::new(x as i32, y as i32))
    }

    /// Geographic position of a sample.
    pub fn coordinate_of(&self, cell: Cell) -> (f64, f64) {
        let cells = self.resolution().cells_per_degree() as f64;
        (
            self.north() - cell.y as f64 / cells,
            self.west() + cell.x as f64 / cells,
        )
    }

    /// East-west and north-south sample spacing in metres at `latitude`.
    pub fn cell_size_metres(&self, latitude: f64) -> (f64, f64) {
        let cells = self.resolution().cells_per_degree() as f64;
        (
            metres_per_degree_lon(latitude) / cells,
            metres_per_degree_lat() / cells,
        )
    }
}
