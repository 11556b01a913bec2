//! Geographic coordinates and bounding boxes.
//!
//! Elevation tiles use a plain equirectangular degree layout, so the only
//! geodesy needed here is range validation and the metric size of a degree
//! at a given latitude.

mod bbox;
mod types;

pub use bbox::{BoundingBox, Corner};
pub use types::{CoordError, Coordinate, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

use std::f64::consts::PI;

/// Mean radius of Earth in metres (IUGG).
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Degrees to radians conversion factor.
const DEG_TO_RAD: f64 = PI / 180.0;

/// Length of one degree of latitude in metres.
#[inline]
pub fn metres_per_degree_lat() -> f64 {
    MEAN_EARTH_RADIUS_M * DEG_TO_RAD
}

/// Length of one degree of longitude in metres at the given latitude.
///
/// Never returns less than one metre so callers can divide by it safely
/// near the poles.
#[inline]
pub fn metres_per_degree_lon(lat: f64) -> f64 {
    (metres_per_degree_lat() * (lat * DEG_TO_RAD).cos()).max(1.0)
}
