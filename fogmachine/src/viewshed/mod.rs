//! Line-of-sight computation.
//!
//! [`VisibilitySweep`] casts Bresenham rays from a [`LocatedObserver`] to
//! target cells on the border of its [`ViewWindow`] and records every cell it
//! passes as visible or occluded in a [`VisibilityGrid`].
//!
//! [`LocatedObserver`]: crate::observer::LocatedObserver

mod bresenham;
mod sweep;
mod visibility;
mod window;

pub use bresenham::{find_line, trace_line};
pub use sweep::{SweepOptions, VisibilitySweep};
pub use visibility::{CellCounts, CellState, VisibilityGrid};
pub use window::ViewWindow;
