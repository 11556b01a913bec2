//! Observer bounding box.

use super::{CoordError, Coordinate};
use serde::{Deserialize, Serialize};

/// Which corner of a [`BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl Corner {
    /// Corners in the canonical UL, UR, LL, LR order.
    pub const ORDERED: [Corner; 4] = [
        Corner::UpperLeft,
        Corner::UpperRight,
        Corner::LowerLeft,
        Corner::LowerRight,
    ];
}

/// Axis-aligned box around an observer, stored as its four corners.
///
/// "Upper" is always north and "left" always west, whatever the hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub upper_left: Coordinate,
    pub upper_right: Coordinate,
    pub lower_left: Coordinate,
    pub lower_right: Coordinate,
}

impl BoundingBox {
    /// Builds the box extending `half_extent_deg` degrees from `center` on
    /// both axes.
    ///
    /// Fails if any corner leaves the valid coordinate range; boxes crossing
    /// a pole or the antimeridian are not supported.
    pub fn around(center: Coordinate, half_extent_deg: f64) -> Result<Self, CoordError> {
        let r = half_extent_deg.abs();
        Ok(Self {
            upper_left: center.offset(r, -r)?,
            upper_right: center.offset(r, r)?,
            lower_left: center.offset(-r, -r)?,
            lower_right: center.offset(-r, r)?,
        })
    }

    /// Returns one corner.
    pub fn corner(&self, corner: Corner) -> Coordinate {
        match corner {
            Corner::UpperLeft => self.upper_left,
            Corner::UpperRight => self.upper_right,
            Corner::LowerLeft => self.lower_left,
            Corner::LowerRight => self.lower_right,
        }
    }

    /// Corners in UL, UR, LL, LR order.
    pub fn ordered_corners(&self) -> [Coordinate; 4] {
        Corner::ORDERED.map(|c| self.corner(c))
    }

    /// Northern edge latitude.
    pub fn north(&self) -> f64 {
        self.upper_left.latitude()
    }

    /// Southern edge latitude.
    pub fn south(&self) -> f64 {
        self.lower_left.latitude()
    }

    /// Western edge longitude.
    pub fn west(&self) -> f64 {
        self.upper_left.longitude()
    }

    /// Eastern edge longitude.
    pub fn east(&self) -> f64 {
        self.upper_right.longitude()
    }

    /// Midpoint of the box.
    pub fn centroid(&self) -> (f64, f64) {
        (
            (self.north() + self.south()) / 2.0,
            (self.west() + self.east()) / 2.0,
        )
    }
}
