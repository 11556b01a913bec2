//! Combining partial visibility grids.
//!
//! Merging is cell-wise: visible anywhere wins, then occluded anywhere, else
//! unknown. The operation is associative and commutative with the all-unknown
//! grid as identity, so partial results can arrive in any order.

use crate::viewshed::VisibilityGrid;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// Nothing to merge.
    #[error("No partial results to merge")]
    Empty,

    /// A partial does not cover the same window.
    #[error(
        "Partial result is {}x{}, expected {}x{}",
        .found.0, .found.1, .expected.0, .expected.1
    )]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// Accumulates partial grids of one window.
#[derive(Debug, Clone)]
pub struct ResultMerger {
    merged: VisibilityGrid,
    absorbed: usize,
}

impl ResultMerger {
    /// Start from an all-unknown grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            merged: VisibilityGrid::new(width, height),
            absorbed: 0,
        }
    }

    /// Fold one partial into the accumulated grid.
    pub fn absorb(&mut self, partial: &VisibilityGrid) -> Result<(), MergeError> {
        if partial.dimensions() != self.merged.dimensions() {
            return Err(MergeError::DimensionMismatch {
                expected: self.merged.dimensions(),
                found: partial.dimensions(),
            });
        }
        self.merged.overlay(partial);
        self.absorbed += 1;
        Ok(())
    }

    /// Number of partials absorbed so far.
    pub fn absorbed(&self) -> usize {
        self.absorbed
    }

    pub fn finish(self) -> VisibilityGrid {
        self.merged
    }
}

/// Merge partials that all share the first partial's dimensions.
pub fn merge(partials: &[VisibilityGrid]) -> Result<VisibilityGrid, MergeError> {
    let first = partials.first().ok_or(MergeError::Empty)?;
    let mut merger = ResultMerger::new(first.width(), first.height());
    for partial in partials {
        merger.absorb(partial)?;
    }
    Ok(merger.finish())
}
