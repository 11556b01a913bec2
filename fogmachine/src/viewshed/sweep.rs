//! Radial line-of-sight sweep.

use super::bresenham::trace_line;
use super::{CellState, ViewWindow, VisibilityGrid};
use crate::coord::MEAN_EARTH_RADIUS_M;
use crate::grid::{Cell, ElevationGrid, GridError};
use crate::hgt::NO_DATA;
use crate::observer::LocatedObserver;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Tunables for a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepOptions {
    /// Lower distant samples by `d² / 2R` to account for Earth's curvature.
    pub curvature_correction: bool,
}

impl SweepOptions {
    pub fn with_curvature_correction(mut self, enabled: bool) -> Self {
        self.curvature_correction = enabled;
        self
    }
}

/// Traces rays from one observer across one elevation grid.
///
/// Each ray walks outward from the observer keeping the steepest elevation
/// angle seen so far. A cell is visible when its own angle is at least that
/// maximum. Results are written into a [`VisibilityGrid`] covering the
/// [`ViewWindow`]; the observer's cell is never written.
pub struct VisibilitySweep<'a> {
    grid: &'a ElevationGrid,
    window: ViewWindow,
    origin: Cell,
    eye: f64,
    cell_width: f64,
    cell_height: f64,
    options: SweepOptions,
}

impl<'a> VisibilitySweep<'a> {
    pub fn new(
        grid: &'a ElevationGrid,
        observer: &LocatedObserver,
        window: ViewWindow,
        options: SweepOptions,
    ) -> Result<Self, GridError> {
        observer.observer().validate()?;
        check_window(grid, &window)?;

        let origin = observer.cell();
        let ground = match grid.elevation_at_cell(origin)? {
            NO_DATA => {
                warn!(
                    x = origin.x,
                    y = origin.y,
                    "Observer stands on a void sample, assuming ground level 0 m"
                );
                0.0
            }
            elevation => elevation as f64,
        };

        let (latitude, _) = grid.coordinate_of(origin);
        let (cell_width, cell_height) = grid.cell_size_metres(latitude);

        Ok(Self {
            grid,
            window,
            origin,
            eye: ground + observer.observer().height(),
            cell_width,
            cell_height,
            options,
        })
    }

    /// Elevation of the observer's eye above sea level, in metres.
    pub fn eye_elevation(&self) -> f64 {
        self.eye
    }

    pub fn window(&self) -> &ViewWindow {
        &self.window
    }

    /// Trace a ray to every target on the calling thread.
    pub fn run(&self, targets: &[Cell]) -> Result<VisibilityGrid, GridError> {
        let mut out = VisibilityGrid::for_window(&self.window);
        let mut line = Vec::new();
        for &target in targets {
            self.trace_ray(target, &mut line, &mut out)?;
        }
        Ok(out)
    }

    /// Split the targets across the rayon pool and merge the results.
    ///
    /// Gives the same grid as [`VisibilitySweep::run`]: per-cell precedence
    /// makes the combination order irrelevant.
    pub fn run_parallel(&self, targets: &[Cell]) -> Result<VisibilityGrid, GridError> {
        let threads = rayon::current_num_threads();
        if threads < 2 || targets.len() < 2 * threads {
            return self.run(targets);
        }

        let chunk = targets.len().div_ceil(threads);
        debug!(targets = targets.len(), threads, chunk, "Parallel sweep");

        targets
            .par_chunks(chunk)
            .map(|chunk| self.run(chunk))
            .try_reduce(
                || VisibilityGrid::for_window(&self.window),
                |mut acc, part| {
                    acc.overlay(&part);
                    Ok(acc)
                },
            )
    }

    fn trace_ray(
        &self,
        target: Cell,
        line: &mut Vec<Cell>,
        out: &mut VisibilityGrid,
    ) -> Result<(), GridError> {
        if !self.window.contains(target) {
            return Err(GridError::OutOfBounds {
                x: target.x as i64,
                y: target.y as i64,
                width: self.grid.width(),
                height: self.grid.height(),
            });
        }

        trace_line(self.origin, target, line);

        let mut horizon = f64::NEG_INFINITY;
        for &cell in line.iter() {
            let elevation = self.grid.elevation_at_cell(cell)?;
            if elevation == NO_DATA {
                continue;
            }

            let angle = self.elevation_angle(cell, elevation);
            let state = if angle >= horizon {
                CellState::Visible
            } else {
                CellState::Occluded
            };
            horizon = horizon.max(angle);

            if let Some(index) = self.window.index_of(cell) {
                out.mark(index, state);
            }
        }
        Ok(())
    }

    fn elevation_angle(&self, cell: Cell, elevation: i16) -> f64 {
        let dx = (cell.x - self.origin.x) as f64 * self.cell_width;
        let dy = (cell.y - self.origin.y) as f64 * self.cell_height;
        let distance = dx.hypot(dy);

        let mut rise = elevation as f64 - self.eye;
        if self.options.curvature_correction {
            rise -= distance * distance / (2.0 * MEAN_EARTH_RADIUS_M);
        }
        rise.atan2(distance)
    }
}

/// The window must lie inside the grid.
fn check_window(grid: &ElevationGrid, window: &ViewWindow) -> Result<(), GridError> {
    let out_of_bounds = || GridError::OutOfBounds {
        x: window.x() as i64,
        y: window.y() as i64,
        width: grid.width(),
        height: grid.height(),
    };
    if window.x() < 0 || window.y() < 0 {
        return Err(out_of_bounds());
    }
    let right = (window.x() as usize).checked_add(window.width());
    let bottom = (window.y() as usize).checked_add(window.height());
    match (right, bottom) {
        (Some(right), Some(bottom)) if right <= grid.width() && bottom <= grid.height() => Ok(()),
        _ => Err(out_of_bounds()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinate;
    use crate::grid::{GridIdentity, StitchLayout};
    use crate::hgt::{ElevationTile, Resolution, TileKey};
    use crate::observer::Observer;
    use std::sync::Arc;

    const SIDE: usize = 21;

    fn grid_from(samples: Vec<i16>) -> ElevationGrid {
        let res = Resolution::from_samples(SIDE as u32).unwrap();
        let key = TileKey::new(0, 0, res);
        let tile = ElevationTile::from_samples(key, samples).unwrap();
        let identity = GridIdentity::new(StitchLayout::Single, vec![key]).unwrap();
        ElevationGrid::from_tiles(identity, vec![Arc::new(tile)]).unwrap()
    }

    fn flat_grid() -> ElevationGrid {
        grid_from(vec![100; SIDE * SIDE])
    }

    fn centred(grid: &ElevationGrid, radius: u32) -> LocatedObserver {
        let observer = Observer::new(Coordinate::new(0.5, 0.5).unwrap(), 2.0, radius);
        observer.locate(grid).unwrap()
    }

    #[test]
    fn test_flat_surface_all_visible_except_observer() {
        let grid = flat_grid();
        let located = centred(&grid, 6);
        let window = located.view_window(&grid);
        let sweep = VisibilitySweep::new(&grid, &located, window, SweepOptions::default()).unwrap();

        let result = sweep.run(&window.perimeter()).unwrap();
        let counts = result.counts();
        assert_eq!(counts.unknown, 1);
        assert_eq!(counts.occluded, 0);
        assert_eq!(counts.visible, window.area() - 1);

        let centre = window.index_of(located.cell()).unwrap();
        assert_eq!(result.cells()[centre], CellState::Unknown);
    }

    #[test]
    fn test_wall_occludes_cells_behind_it() {
        // Observer at (10, 10); a tall wall on column 13.
        let mut samples = vec![0i16; SIDE * SIDE];
        for row in 0..SIDE {
            samples[row * SIDE + 13] = 500;
        }
        let grid = grid_from(samples);
        let located = centred(&grid, 6);
        assert_eq!(located.cell(), Cell::new(10, 10));
        let window = located.view_window(&grid);
        let sweep = VisibilitySweep::new(&grid, &located, window, SweepOptions::default()).unwrap();

        let result = sweep.run(&window.perimeter()).unwrap();
        let at = |x: i32, y: i32| result.cells()[window.index_of(Cell::new(x, y)).unwrap()];

        assert_eq!(at(12, 10), CellState::Visible);
        assert_eq!(at(13, 10), CellState::Visible);
        assert_eq!(at(14, 10), CellState::Occluded);
        assert_eq!(at(16, 10), CellState::Occluded);
        // Nothing blocks the view to the west.
        assert_eq!(at(4, 10), CellState::Visible);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let samples = (0..SIDE * SIDE)
            .map(|i| ((i * 7919) % 97) as i16 * 3)
            .collect();
        let grid = grid_from(samples);
        let located = centred(&grid, 9);
        let window = located.view_window(&grid);
        let sweep = VisibilitySweep::new(&grid, &located, window, SweepOptions::default()).unwrap();

        let perimeter = window.perimeter();
        assert_eq!(
            sweep.run(&perimeter).unwrap(),
            sweep.run_parallel(&perimeter).unwrap()
        );
    }

    #[test]
    fn test_void_samples_stay_unknown() {
        let mut samples = vec![0i16; SIDE * SIDE];
        samples[10 * SIDE + 12] = NO_DATA;
        let grid = grid_from(samples);
        let located = centred(&grid, 4);
        let window = located.view_window(&grid);
        let sweep = VisibilitySweep::new(&grid, &located, window, SweepOptions::default()).unwrap();

        let result = sweep.run(&[Cell::new(14, 10)]).unwrap();
        let at = |x: i32| result.cells()[window.index_of(Cell::new(x, 10)).unwrap()];
        assert_eq!(at(11), CellState::Visible);
        assert_eq!(at(12), CellState::Unknown);
        assert_eq!(at(13), CellState::Visible);
    }

    #[test]
    fn test_void_observer_uses_sea_level() {
        let mut samples = vec![0i16; SIDE * SIDE];
        samples[10 * SIDE + 10] = NO_DATA;
        let grid = grid_from(samples);
        let located = centred(&grid, 4);
        let window = located.view_window(&grid);
        let sweep = VisibilitySweep::new(&grid, &located, window, SweepOptions::default()).unwrap();
        assert_eq!(sweep.eye_elevation(), 2.0);
    }

    #[test]
    fn test_unassigned_rays_leave_cells_unknown() {
        let grid = flat_grid();
        let located = centred(&grid, 5);
        let window = located.view_window(&grid);
        let sweep = VisibilitySweep::new(&grid, &located, window, SweepOptions::default()).unwrap();

        let result = sweep.run(&[Cell::new(15, 10)]).unwrap();
        assert_eq!(result.counts().visible, 5);
        assert_eq!(result.counts().unknown, window.area() - 5);
    }

    #[test]
    fn test_target_outside_window_is_rejected() {
        let grid = flat_grid();
        let located = centred(&grid, 2);
        let window = located.view_window(&grid);
        let sweep = VisibilitySweep::new(&grid, &located, window, SweepOptions::default()).unwrap();
        assert!(matches!(
            sweep.run(&[Cell::new(20, 20)]),
            Err(GridError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_window_beyond_grid_is_rejected() {
        let grid = flat_grid();
        let located = centred(&grid, 2);
        for window in [
            ViewWindow::new(0, 0, usize::MAX, 2),
            ViewWindow::new(-1, 0, 3, 3),
            ViewWindow::new(19, 19, 3, 3),
        ] {
            assert!(matches!(
                VisibilitySweep::new(&grid, &located, window, SweepOptions::default()),
                Err(GridError::OutOfBounds { .. })
            ));
        }
    }

    #[test]
    fn test_invalid_eye_height_is_rejected() {
        let grid = flat_grid();
        let cell = centred(&grid, 2).cell();
        let window = ViewWindow::new(8, 8, 5, 5);
        for height in [f64::NAN, -1.0, f64::INFINITY] {
            let observer = Observer::new(Coordinate::new(0.5, 0.5).unwrap(), height, 2);
            let located = LocatedObserver::from_parts(observer, cell);
            assert!(matches!(
                VisibilitySweep::new(&grid, &located, window, SweepOptions::default()),
                Err(GridError::InvalidHeight(_))
            ));
        }
    }

    #[test]
    fn test_curvature_lowers_distant_cells() {
        let grid = flat_grid();
        let located = centred(&grid, 6);
        let window = located.view_window(&grid);
        let flat = VisibilitySweep::new(&grid, &located, window, SweepOptions::default()).unwrap();
        let curved = VisibilitySweep::new(
            &grid,
            &located,
            window,
            SweepOptions::default().with_curvature_correction(true),
        )
        .unwrap();

        let far = Cell::new(16, 10);
        assert!(curved.elevation_angle(far, 100) < flat.elevation_angle(far, 100));
    }
}
