//! The square of cells around an observer.

use crate::grid::Cell;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle of grid cells, origin at its north-west corner.
///
/// Built as the `(2r + 1)²` square around an observer and clamped to the
/// elevation grid, so it is smaller near the grid edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewWindow {
    x: i32,
    y: i32,
    width: usize,
    height: usize,
}

impl ViewWindow {
    pub fn new(x: i32, y: i32, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of `radius` cells around `center`, clamped to a
    /// `grid_width` × `grid_height` grid.
    pub fn around(center: Cell, radius: u32, grid_width: usize, grid_height: usize) -> Self {
        let r = radius as i64;
        let clamp = |v: i64, len: usize| v.clamp(0, len.saturating_sub(1) as i64);

        let x0 = clamp(center.x as i64 - r, grid_width);
        let y0 = clamp(center.y as i64 - r, grid_height);
        let x1 = clamp(center.x as i64 + r, grid_width);
        let y1 = clamp(center.y as i64 + r, grid_height);

        Self {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0 + 1) as usize,
            height: (y1 - y0 + 1) as usize,
        }
    }

    /// Grid column of the window's western edge.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Grid row of the window's northern edge.
    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// True when the grid cell lies inside the window.
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.index_of(cell).is_some()
    }

    /// Row-major index of a grid cell within the window.
    #[inline]
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        let col = cell.x as i64 - self.x as i64;
        let row = cell.y as i64 - self.y as i64;
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    /// Boundary cells, clockwise from the north-west corner, each once.
    pub fn perimeter(&self) -> Vec<Cell> {
        if self.width == 0 || self.height == 0 {
            return Vec::new();
        }

        let x0 = self.x;
        let y0 = self.y;
        let x1 = self.x + self.width as i32 - 1;
        let y1 = self.y + self.height as i32 - 1;

        let mut cells = Vec::with_capacity(2 * (self.width + self.height));

        // North edge, west to east.
        cells.extend((x0..=x1).map(|x| Cell::new(x, y0)));
        // East edge, north to south.
        cells.extend((y0 + 1..=y1).map(|y| Cell::new(x1, y)));
        if y1 > y0 {
            // South edge, east to west.
            cells.extend((x0..x1).rev().map(|x| Cell::new(x, y1)));
        }
        if x1 > x0 {
            // West edge, south to north.
            cells.extend((y0 + 1..y1).rev().map(|y| Cell::new(x0, y)));
        }

        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_around_unclamped() {
        let w = ViewWindow::around(Cell::new(10, 10), 3, 100, 100);
        assert_eq!(w, ViewWindow::new(7, 7, 7, 7));
    }

    #[test]
    fn test_around_clamped_at_edges() {
        let w = ViewWindow::around(Cell::new(1, 98), 3, 100, 100);
        assert_eq!(w, ViewWindow::new(0, 95, 5, 5));
    }

    #[test]
    fn test_index_of() {
        let w = ViewWindow::new(5, 5, 3, 2);
        assert_eq!(w.index_of(Cell::new(5, 5)), Some(0));
        assert_eq!(w.index_of(Cell::new(7, 6)), Some(5));
        assert_eq!(w.index_of(Cell::new(8, 6)), None);
        assert_eq!(w.index_of(Cell::new(4, 5)), None);
    }

    #[test]
    fn test_perimeter_order() {
        let w = ViewWindow::new(0, 0, 3, 3);
        let expected = vec![
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(2, 0),
            Cell::new(2, 1),
            Cell::new(2, 2),
            Cell::new(1, 2),
            Cell::new(0, 2),
            Cell::new(0, 1),
        ];
        assert_eq!(w.perimeter(), expected);
    }

    #[test]
    fn test_perimeter_counts_each_cell_once() {
        for (width, height) in [(1, 1), (1, 4), (4, 1), (2, 2), (7, 7), (5, 9)] {
            let w = ViewWindow::new(3, 3, width, height);
            let perimeter = w.perimeter();
            let unique: HashSet<_> = perimeter.iter().copied().collect();
            assert_eq!(unique.len(), perimeter.len(), "{width}x{height}");

            let expected = if width == 1 || height == 1 {
                width * height
            } else {
                2 * (width + height) - 4
            };
            assert_eq!(perimeter.len(), expected, "{width}x{height}");
            assert!(perimeter.iter().all(|c| w.contains(*c)));
        }
    }
}
