//! Observer placement.
//!
//! An [`Observer`] is a geographic position plus eye height and view
//! radius. Once an [`ElevationGrid`] covering it is built, [`Observer::locate`]
//! pins it to a grid cell.

use crate::coord::{BoundingBox, Coordinate};
use crate::grid::{max_radius, tiles_for_box, Cell, ElevationGrid, GridError, GridIdentity};
use crate::hgt::{Resolution, TileStore};
use crate::viewshed::ViewWindow;
use serde::{Deserialize, Serialize};

/// Observer position, eye height above ground in metres, and view radius in
/// grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    position: Coordinate,
    height: f64,
    radius: u32,
}

impl Observer {
    pub fn new(position: Coordinate, height: f64, radius: u32) -> Self {
        Self {
            position,
            height,
            radius,
        }
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    /// Eye height above the terrain, in metres.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// View radius in cells.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Fails unless the height is finite and non-negative.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.height.is_finite() && self.height >= 0.0 {
            Ok(())
        } else {
            Err(GridError::InvalidHeight(self.height))
        }
    }

    /// Box spanning `radius` cells around the observer on both axes.
    pub fn bounding_box(&self, resolution: Resolution) -> Result<BoundingBox, GridError> {
        self.validate()?;
        let max = max_radius(resolution);
        if self.radius > max {
            return Err(GridError::RadiusTooLarge {
                radius: self.radius,
                max,
            });
        }
        let half_extent = self.radius as f64 / resolution.cells_per_degree() as f64;
        Ok(BoundingBox::around(self.position, half_extent)?)
    }

    /// Unique tiles the view square touches.
    pub fn required_tiles(&self, resolution: Resolution) -> Result<GridIdentity, GridError> {
        tiles_for_box(&self.bounding_box(resolution)?, resolution)
    }

    /// True when the whole view square lies in the observer's own tile.
    pub fn radius_fits_one_tile(&self, resolution: Resolution) -> bool {
        self.required_tiles(resolution)
            .map(|identity| identity.keys().len() == 1)
            .unwrap_or(false)
    }

    /// True when every tile the view square touches is available in `store`.
    pub fn is_viewshed_possible(&self, store: &dyn TileStore, resolution: Resolution) -> bool {
        match self.required_tiles(resolution) {
            Ok(identity) => {
                !identity.keys().is_empty() && identity.keys().iter().all(|k| store.has_tile(k))
            }
            Err(_) => false,
        }
    }

    /// Pin the observer to the nearest cell of `grid`.
    pub fn locate(&self, grid: &ElevationGrid) -> Result<LocatedObserver, GridError> {
        let cell = grid.cell_for(self.position)?;
        Ok(LocatedObserver {
            observer: *self,
            cell,
        })
    }
}

/// An observer pinned to a cell of a specific elevation grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocatedObserver {
    observer: Observer,
    cell: Cell,
}

impl LocatedObserver {
    /// Rebuild from parts, e.g. after receiving them from a peer.
    pub fn from_parts(observer: Observer, cell: Cell) -> Self {
        Self { observer, cell }
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    /// Grid-local cell of the observer.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn x(&self) -> i32 {
        self.cell.x
    }

    pub fn y(&self) -> i32 {
        self.cell.y
    }

    /// The view square around the observer, clamped to `grid`.
    pub fn view_window(&self, grid: &ElevationGrid) -> ViewWindow {
        ViewWindow::around(self.cell, self.observer.radius, grid.width(), grid.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::StitchLayout;
    use crate::hgt::{ElevationTile, MemoryTileStore, TileKey};

    fn at(lat: f64, lon: f64, radius: u32) -> Observer {
        Observer::new(Coordinate::new(lat, lon).unwrap(), 2.0, radius)
    }

    #[test]
    fn test_radius_too_large() {
        let observer = at(38.5, -77.5, 1200);
        assert!(matches!(
            observer.bounding_box(Resolution::SRTM3),
            Err(GridError::RadiusTooLarge {
                radius: 1200,
                max: 1199
            })
        ));
        assert!(at(38.5, -77.5, 1199).bounding_box(Resolution::SRTM3).is_ok());
    }

    #[test]
    fn test_bad_height_fails_before_tiles_are_considered() {
        for height in [f64::NAN, -0.5] {
            let observer = Observer::new(Coordinate::new(38.5, -77.5).unwrap(), height, 10);
            assert!(matches!(
                observer.bounding_box(Resolution::SRTM3),
                Err(GridError::InvalidHeight(_))
            ));
            assert!(!observer.is_viewshed_possible(&MemoryTileStore::new(), Resolution::SRTM3));
        }
        assert!(at(38.5, -77.5, 10).validate().is_ok());
    }

    #[test]
    fn test_required_tiles_layouts() {
        let single = at(38.5, -77.5, 100).required_tiles(Resolution::SRTM3).unwrap();
        assert_eq!(single.layout(), StitchLayout::Single);

        let quad = at(38.99, -77.01, 100).required_tiles(Resolution::SRTM3).unwrap();
        assert_eq!(quad.layout(), StitchLayout::Quad);
    }

    #[test]
    fn test_radius_fits_one_tile() {
        assert!(at(38.5, -77.5, 100).radius_fits_one_tile(Resolution::SRTM3));
        assert!(!at(38.99, -77.5, 100).radius_fits_one_tile(Resolution::SRTM3));
        assert!(!at(38.5, -77.5, 5000).radius_fits_one_tile(Resolution::SRTM3));
    }

    #[test]
    fn test_is_viewshed_possible_requires_every_tile() {
        let res = Resolution::SRTM3;
        let store = MemoryTileStore::new();
        let observer = at(38.5, -77.01, 100);
        assert!(!observer.is_viewshed_possible(&store, res));

        store.insert(ElevationTile::filled(TileKey::new(38, -78, res), 0));
        assert!(!observer.is_viewshed_possible(&store, res));

        store.insert(ElevationTile::filled(TileKey::new(38, -77, res), 0));
        assert!(observer.is_viewshed_possible(&store, res));
    }

    #[test]
    fn test_locate_and_window() {
        let res = Resolution::from_samples(11).unwrap();
        let key = TileKey::new(0, 0, res);
        let store = MemoryTileStore::with_tiles([ElevationTile::filled(key, 0)]);
        let cache = crate::hgt::TileCache::new(std::sync::Arc::new(store));

        let observer = at(0.5, 0.5, 3);
        let identity = observer.required_tiles(res).unwrap();
        let grid = ElevationGrid::load(&identity, &cache).unwrap();
        let located = observer.locate(&grid).unwrap();
        assert_eq!(located.cell(), Cell::new(5, 5));

        let window = located.view_window(&grid);
        assert_eq!((window.x(), window.y()), (2, 2));
        assert_eq!((window.width(), window.height()), (7, 7));
    }
}
