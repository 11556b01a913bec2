//! Wire messages between coordinator and peers.

use crate::grid::{Cell, GridIdentity};
use crate::observer::LocatedObserver;
use crate::viewshed::{CellState, SweepOptions, ViewWindow, VisibilityGrid};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode message: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Cell index {index} is outside a grid of {cells} cells")]
    CellOutOfRange { index: u32, cells: usize },

    #[error("Grid of {width}x{height} cells is too large")]
    GridTooLarge { width: usize, height: usize },
}

/// Everything a peer needs to sweep its share of the perimeter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBatch {
    /// Position in the partition; 0 is the coordinator's own batch.
    pub batch_index: usize,
    pub observer: LocatedObserver,
    /// Tiles and layout of the elevation grid the observer was located in.
    pub grid: GridIdentity,
    pub window: ViewWindow,
    pub options: SweepOptions,
    /// Ray endpoints on the window perimeter.
    pub targets: Vec<Cell>,
}

impl TaskBatch {
    pub fn to_bytes(&self) -> Result<Bytes, MessageError> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(MessageError::Encode)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, MessageError> {
        serde_json::from_slice(data).map_err(MessageError::Decode)
    }
}

/// A peer's visibility grid in sparse form.
///
/// Only visible and occluded cells are listed, by row-major index; every
/// other cell is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialResult {
    pub batch_index: usize,
    pub width: usize,
    pub height: usize,
    pub visible: Vec<u32>,
    pub occluded: Vec<u32>,
}

impl PartialResult {
    pub fn from_grid(batch_index: usize, grid: &VisibilityGrid) -> Self {
        let mut visible = Vec::new();
        let mut occluded = Vec::new();
        for (index, state) in grid.cells().iter().enumerate() {
            match state {
                CellState::Visible => visible.push(index as u32),
                CellState::Occluded => occluded.push(index as u32),
                CellState::Unknown => {}
            }
        }
        Self {
            batch_index,
            width: grid.width(),
            height: grid.height(),
            visible,
            occluded,
        }
    }

    /// Expand back into a dense grid.
    pub fn to_grid(&self) -> Result<VisibilityGrid, MessageError> {
        let cells = self
            .width
            .checked_mul(self.height)
            .ok_or(MessageError::GridTooLarge {
                width: self.width,
                height: self.height,
            })?;
        let mut grid = VisibilityGrid::new(self.width, self.height);
        for (indices, state) in [
            (&self.occluded, CellState::Occluded),
            (&self.visible, CellState::Visible),
        ] {
            for &index in indices {
                if index as usize >= cells {
                    return Err(MessageError::CellOutOfRange { index, cells });
                }
                grid.mark(index as usize, state);
            }
        }
        Ok(grid)
    }

    pub fn to_bytes(&self) -> Result<Bytes, MessageError> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(MessageError::Encode)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, MessageError> {
        serde_json::from_slice(data).map_err(MessageError::Decode)
    }
}
