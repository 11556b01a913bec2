//! Visibility grid.

use super::ViewWindow;
use serde::{Deserialize, Serialize};

/// Visibility of one cell.
///
/// Variants are declared in precedence order so that `max` combines two
/// observations: visible beats occluded, occluded beats unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum CellState {
    /// Not reached by any ray.
    #[default]
    Unknown,
    /// Reached, but hidden behind terrain.
    Occluded,
    /// Reached and in line of sight.
    Visible,
}

impl CellState {
    /// Numeric code: 1 visible, -1 occluded, 0 unknown.
    pub fn code(self) -> i8 {
        match self {
            CellState::Unknown => 0,
            CellState::Occluded => -1,
            CellState::Visible => 1,
        }
    }

    /// Inverse of [`CellState::code`].
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => Some(CellState::Unknown),
            -1 => Some(CellState::Occluded),
            1 => Some(CellState::Visible),
            _ => None,
        }
    }
}

/// Per-state cell totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCounts {
    pub visible: usize,
    pub occluded: usize,
    pub unknown: usize,
}

/// Row-major grid of [`CellState`] covering a [`ViewWindow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityGrid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl VisibilityGrid {
    /// All-unknown grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellState::Unknown; width * height],
        }
    }

    /// All-unknown grid sized to `window`.
    pub fn for_window(window: &ViewWindow) -> Self {
        Self::new(window.width(), window.height())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// State at (col, row).
    pub fn get(&self, col: usize, row: usize) -> Option<CellState> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    /// Raise the state at a row-major index. A cell never moves down the
    /// precedence order.
    #[inline]
    pub fn mark(&mut self, index: usize, state: CellState) {
        if let Some(cell) = self.cells.get_mut(index) {
            if state > *cell {
                *cell = state;
            }
        }
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Rows of numeric codes.
    pub fn to_codes(&self) -> Vec<Vec<i8>> {
        if self.width == 0 {
            return vec![Vec::new(); self.height];
        }
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|s| s.code()).collect())
            .collect()
    }

    pub fn counts(&self) -> CellCounts {
        self.cells
            .iter()
            .fold(CellCounts::default(), |mut counts, state| {
                match state {
                    CellState::Visible => counts.visible += 1,
                    CellState::Occluded => counts.occluded += 1,
                    CellState::Unknown => counts.unknown += 1,
                }
                counts
            })
    }

    /// Cell-wise max with a grid of the same shape. Callers check the shape.
    pub(crate) fn overlay(&mut self, other: &VisibilityGrid) {
        for (mine, theirs) in self.cells.iter_mut().zip(&other.cells) {
            if *theirs > *mine {
                *mine = *theirs;
            }
        }
    }
}
