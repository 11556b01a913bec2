//! Tile addressing.
//!
//! A [`TileKey`] names a 1°×1° elevation cell by the floor of its latitude and
//! longitude, the convention SRTM uses for `.hgt` filenames.

use super::TileError;
use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sample density of an elevation tile, stored as samples per side.
///
/// HGT tiles repeat their edge row and column in the neighbouring tile, so a
/// tile with `n` samples per side spans `n - 1` cells per degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32")]
pub struct Resolution(u32);

impl Resolution {
    /// 1 arc-second SRTM (3601 × 3601).
    pub const SRTM1: Resolution = Resolution(3601);
    /// 3 arc-second SRTM (1201 × 1201).
    pub const SRTM3: Resolution = Resolution(1201);

    /// Creates a resolution with the given samples per side.
    ///
    /// Returns `None` for fewer than two samples, which cannot span a degree.
    pub fn from_samples(samples: u32) -> Option<Self> {
        (samples >= 2).then_some(Self(samples))
    }

    /// Infers the resolution of a raw HGT buffer from its length.
    pub fn from_byte_len(len: usize) -> Option<Self> {
        if len % 2 != 0 {
            return None;
        }
        let count = len / 2;
        let side = (count as f64).sqrt().round() as usize;
        if side * side != count {
            return None;
        }
        u32::try_from(side).ok().and_then(Self::from_samples)
    }

    /// Samples per tile side.
    #[inline]
    pub fn samples(&self) -> u32 {
        self.0
    }

    /// Grid cells per degree (`samples - 1`).
    #[inline]
    pub fn cells_per_degree(&self) -> u32 {
        self.0 - 1
    }

    /// Angular spacing between samples.
    pub fn arc_seconds(&self) -> f64 {
        3600.0 / self.cells_per_degree() as f64
    }

    /// Size in bytes of a raw HGT file at this resolution.
    pub fn byte_len(&self) -> usize {
        let side = self.0 as usize;
        side * side * 2
    }
}

impl TryFrom<u32> for Resolution {
    type Error = String;

    fn try_from(samples: u32) -> Result<Self, Self::Error> {
        Self::from_samples(samples)
            .ok_or_else(|| format!("resolution needs at least 2 samples per side, got {}", samples))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Resolution::SRTM1 => write!(f, "srtm1"),
            Resolution::SRTM3 => write!(f, "srtm3"),
            Resolution(n) => write!(f, "{}x{}", n, n),
        }
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "srtm1" | "1" => Ok(Resolution::SRTM1),
            "srtm3" | "3" => Ok(Resolution::SRTM3),
            other => Err(format!(
                "unknown resolution '{}' (expected 'srtm1' or 'srtm3')",
                other
            )),
        }
    }
}

/// Identity of one elevation tile.
///
/// # Examples
///
/// ```
/// use fogmachine::hgt::{Resolution, TileKey};
///
/// let key = TileKey::new(38, -77, Resolution::SRTM3);
/// assert_eq!(key.filename(), "N38W077.hgt");
///
/// let parsed = TileKey::parse_filename("S34E151.hgt", Resolution::SRTM3).unwrap();
/// assert_eq!((parsed.lat, parsed.lon), (-34, 151));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileKey {
    /// Floor of the latitude (south edge of the tile).
    pub lat: i32,
    /// Floor of the longitude (west edge of the tile).
    pub lon: i32,
    /// Sample density.
    pub resolution: Resolution,
}

impl TileKey {
    /// Create a key from integer south-west corner coordinates.
    pub fn new(lat: i32, lon: i32, resolution: Resolution) -> Self {
        Self {
            lat,
            lon,
            resolution,
        }
    }

    /// Key of the tile containing `coordinate`.
    pub fn from_coordinate(coordinate: Coordinate, resolution: Resolution) -> Self {
        let (lat, lon) = coordinate.floor();
        Self::new(lat, lon, resolution)
    }

    /// Parse an SRTM filename such as `N38W077.hgt` or `s34e151`.
    pub fn parse_filename(name: &str, resolution: Resolution) -> Result<Self, TileError> {
        let invalid = || TileError::InvalidFilename(name.to_string());

        let stem = name.trim();
        let stem = stem
            .strip_suffix(".hgt")
            .or_else(|| stem.strip_suffix(".HGT"))
            .unwrap_or(stem)
            .to_ascii_uppercase();
        if stem.len() != 7 || !stem.is_ascii() {
            return Err(invalid());
        }

        let lat_sign = match &stem[0..1] {
            "N" => 1,
            "S" => -1,
            _ => return Err(invalid()),
        };
        let lon_sign = match &stem[3..4] {
            "E" => 1,
            "W" => -1,
            _ => return Err(invalid()),
        };
        let lat: i32 = stem[1..3].parse().map_err(|_| invalid())?;
        let lon: i32 = stem[4..7].parse().map_err(|_| invalid())?;
        if lat > 90 || lon > 180 {
            return Err(invalid());
        }

        Ok(Self::new(lat_sign * lat, lon_sign * lon, resolution))
    }

    /// SRTM filename for this tile.
    pub fn filename(&self) -> String {
        let ns = if self.lat >= 0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0 { 'E' } else { 'W' };
        format!(
            "{}{:02}{}{:03}.hgt",
            ns,
            self.lat.unsigned_abs(),
            ew,
            self.lon.unsigned_abs()
        )
    }

    /// True when both keys address the same degree cell.
    #[inline]
    pub fn same_cell(&self, other: &TileKey) -> bool {
        self.lat == other.lat && self.lon == other.lon
    }

    /// South-west corner as (lat, lon) degrees.
    pub fn south_west(&self) -> (f64, f64) {
        (self.lat as f64, self.lon as f64)
    }

    /// Centre of the tile as (lat, lon) degrees.
    pub fn centroid(&self) -> (f64, f64) {
        (self.lat as f64 + 0.5, self.lon as f64 + 0.5)
    }

    /// True when `coordinate` lies strictly inside this tile's degree cell.
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        let (south, west) = self.south_west();
        coordinate.latitude() > south
            && coordinate.latitude() < south + 1.0
            && coordinate.longitude() > west
            && coordinate.longitude() < west + 1.0
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.filename(), self.resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_positive() {
        let key = TileKey::new(43, 6, Resolution::SRTM3);
        assert_eq!(key.filename(), "N43E006.hgt");
    }

    #[test]
    fn test_filename_negative() {
        let key = TileKey::new(-46, -12, Resolution::SRTM1);
        assert_eq!(key.filename(), "S46W012.hgt");
    }

    #[test]
    fn test_filename_zero() {
        let key = TileKey::new(0, 0, Resolution::SRTM3);
        assert_eq!(key.filename(), "N00E000.hgt");
    }

    #[test]
    fn test_from_coordinate_floors_toward_south_west() {
        let c = Coordinate::new(-33.9, -118.4).unwrap();
        let key = TileKey::from_coordinate(c, Resolution::SRTM3);
        assert_eq!((key.lat, key.lon), (-34, -119));
        assert_eq!(key.filename(), "S34W119.hgt");
    }

    #[test]
    fn test_parse_filename_roundtrip() {
        for (lat, lon) in [(38, -77), (-34, 151), (0, -1), (89, 179)] {
            let key = TileKey::new(lat, lon, Resolution::SRTM3);
            let parsed = TileKey::parse_filename(&key.filename(), Resolution::SRTM3).unwrap();
            assert_eq!(parsed, key);
        }
    }

    #[test]
    fn test_parse_filename_case_and_extension() {
        let a = TileKey::parse_filename("n38w077", Resolution::SRTM3).unwrap();
        let b = TileKey::parse_filename("N38W077.HGT", Resolution::SRTM3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_filename_rejects_garbage() {
        for name in ["", "N38W77.hgt", "X38W077.hgt", "N38Q077.hgt", "N9AW077", "N95E000"] {
            assert!(
                matches!(
                    TileKey::parse_filename(name, Resolution::SRTM3),
                    Err(TileError::InvalidFilename(_))
                ),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_contains_is_strict() {
        let key = TileKey::new(38, -77, Resolution::SRTM3);
        assert!(key.contains(Coordinate::new(38.5, -76.5).unwrap()));
        assert!(!key.contains(Coordinate::new(38.0, -76.5).unwrap()));
        assert!(!key.contains(Coordinate::new(39.5, -76.5).unwrap()));
    }

    #[test]
    fn test_same_cell_ignores_resolution() {
        let a = TileKey::new(1, 2, Resolution::SRTM1);
        let b = TileKey::new(1, 2, Resolution::SRTM3);
        assert!(a.same_cell(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_resolution_constants() {
        assert_eq!(Resolution::SRTM3.cells_per_degree(), 1200);
        assert_eq!(Resolution::SRTM1.cells_per_degree(), 3600);
        assert_eq!(Resolution::SRTM3.byte_len(), 1201 * 1201 * 2);
        assert!((Resolution::SRTM3.arc_seconds() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_resolution_from_byte_len() {
        assert_eq!(
            Resolution::from_byte_len(1201 * 1201 * 2),
            Some(Resolution::SRTM3)
        );
        assert_eq!(Resolution::from_byte_len(11 * 11 * 2).unwrap().samples(), 11);
        assert_eq!(Resolution::from_byte_len(3), None);
        assert_eq!(Resolution::from_byte_len(10 * 11 * 2), None);
        assert_eq!(Resolution::from_byte_len(2), None);
    }

    #[test]
    fn test_resolution_decoding_is_validated() {
        let decoded: Resolution = serde_json::from_str("1201").unwrap();
        assert_eq!(decoded, Resolution::SRTM3);
        assert!(serde_json::from_str::<Resolution>("0").is_err());
        assert!(serde_json::from_str::<Resolution>("1").is_err());
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("srtm1".parse::<Resolution>(), Ok(Resolution::SRTM1));
        assert_eq!(" SRTM3 ".parse::<Resolution>(), Ok(Resolution::SRTM3));
        assert!("srtm2".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_hash_consistency() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(TileKey::new(43, 6, Resolution::SRTM3));
        set.insert(TileKey::new(43, 6, Resolution::SRTM3));
        set.insert(TileKey::new(44, 7, Resolution::SRTM3));
        assert_eq!(set.len(), 2);
    }
}
