//! Corner-tile deduplication and stitch layouts.

use super::GridError;
use crate::coord::BoundingBox;
use crate::hgt::{Resolution, TileKey};
use serde::{Deserialize, Serialize};

/// Arrangement of the tiles that make up an elevation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StitchLayout {
    /// One tile.
    Single,
    /// Two tiles, one above the other (2×1: two rows, one column).
    NorthSouth,
    /// Two tiles side by side (1×2: one row, two columns).
    WestEast,
    /// Four tiles in a 2×2 block.
    Quad,
}

impl StitchLayout {
    /// Number of tile rows.
    pub fn rows(&self) -> usize {
        match self {
            StitchLayout::Single | StitchLayout::WestEast => 1,
            StitchLayout::NorthSouth | StitchLayout::Quad => 2,
        }
    }

    /// Number of tile columns.
    pub fn cols(&self) -> usize {
        match self {
            StitchLayout::Single | StitchLayout::NorthSouth => 1,
            StitchLayout::WestEast | StitchLayout::Quad => 2,
        }
    }

    /// Number of tiles.
    pub fn tile_count(&self) -> usize {
        self.rows() * self.cols()
    }
}

/// The tiles of an elevation grid and how they are stitched.
///
/// Keys are stored row-major starting with the north-west tile. This is
/// everything a peer needs to rebuild the same grid from its own tile store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGridIdentity")]
pub struct GridIdentity {
    layout: StitchLayout,
    keys: Vec<TileKey>,
}

/// Unchecked wire form of [`GridIdentity`].
#[derive(Deserialize)]
struct RawGridIdentity {
    layout: StitchLayout,
    keys: Vec<TileKey>,
}

impl TryFrom<RawGridIdentity> for GridIdentity {
    type Error = GridError;

    fn try_from(raw: RawGridIdentity) -> Result<Self, Self::Error> {
        GridIdentity::new(raw.layout, raw.keys)
    }
}

impl GridIdentity {
    /// Validate and build an identity from a layout and row-major keys.
    pub fn new(layout: StitchLayout, keys: Vec<TileKey>) -> Result<Self, GridError> {
        if keys.len() != layout.tile_count() {
            return Err(GridError::InvalidLayout(format!(
                "{:?} layout needs {} tiles, got {}",
                layout,
                layout.tile_count(),
                keys.len()
            )));
        }

        let origin = keys[0];
        for (i, key) in keys.iter().enumerate() {
            if key.resolution != origin.resolution {
                return Err(GridError::MixedResolution {
                    expected: origin.resolution,
                    found: key.resolution,
                });
            }
            let row = (i / layout.cols()) as i32;
            let col = (i % layout.cols()) as i32;
            if key.lat != origin.lat - row || key.lon != origin.lon + col {
                return Err(GridError::InvalidLayout(format!(
                    "tile {} is not adjacent to {}",
                    key.filename(),
                    origin.filename()
                )));
            }
        }

        Ok(Self { layout, keys })
    }

    /// Stitch layout.
    pub fn layout(&self) -> StitchLayout {
        self.layout
    }

    /// Tile keys, row-major from the north-west tile.
    pub fn keys(&self) -> &[TileKey] {
        &self.keys
    }

    /// Resolution shared by every tile.
    pub fn resolution(&self) -> Resolution {
        self.keys[0].resolution
    }

    /// The north-west tile.
    pub fn north_west(&self) -> TileKey {
        self.keys[0]
    }
}

/// Reduce the four corner tiles of a box to the unique tiles covering it.
///
/// Corners are given in UL, UR, LL, LR order. The checks run in a fixed
/// order because "all equal" also satisfies both the row and the column
/// test:
///
/// 1. all four equal → [`StitchLayout::Single`]
/// 2. UL = UR and LL = LR → [`StitchLayout::NorthSouth`]
/// 3. UL = LL and UR = LR → [`StitchLayout::WestEast`]
/// 4. otherwise → [`StitchLayout::Quad`]
pub fn dedupe_corner_tiles(corners: [TileKey; 4]) -> Result<GridIdentity, GridError> {
    let [ul, ur, ll, lr] = corners;

    if ul.same_cell(&ur) && ul.same_cell(&ll) && ul.same_cell(&lr) {
        GridIdentity::new(StitchLayout::Single, vec![ul])
    } else if ul.same_cell(&ur) && ll.same_cell(&lr) {
        GridIdentity::new(StitchLayout::NorthSouth, vec![ul, ll])
    } else if ul.same_cell(&ll) && ur.same_cell(&lr) {
        GridIdentity::new(StitchLayout::WestEast, vec![ul, ur])
    } else {
        GridIdentity::new(StitchLayout::Quad, vec![ul, ur, ll, lr])
    }
}

/// Unique tiles needed to cover a bounding box.
pub fn tiles_for_box(bbox: &BoundingBox, resolution: Resolution) -> Result<GridIdentity, GridError> {
    let corners = bbox
        .ordered_corners()
        .map(|c| TileKey::from_coordinate(c, resolution));
    dedupe_corner_tiles(corners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinate;

    fn key(lat: i32, lon: i32) -> TileKey {
        TileKey::new(lat, lon, Resolution::SRTM3)
    }

    fn bbox(lat: f64, lon: f64, half: f64) -> BoundingBox {
        BoundingBox::around(Coordinate::new(lat, lon).unwrap(), half).unwrap()
    }

    #[test]
    fn test_single_tile_when_box_inside_one_degree() {
        let identity = tiles_for_box(&bbox(38.5, -77.5, 0.1), Resolution::SRTM3).unwrap();
        assert_eq!(identity.layout(), StitchLayout::Single);
        assert_eq!(identity.keys(), &[key(38, -78)]);
    }

    #[test]
    fn test_north_south_when_box_crosses_a_parallel() {
        let identity = tiles_for_box(&bbox(39.02, -77.5, 0.1), Resolution::SRTM3).unwrap();
        assert_eq!(identity.layout(), StitchLayout::NorthSouth);
        assert_eq!(identity.keys(), &[key(39, -78), key(38, -78)]);
    }

    #[test]
    fn test_west_east_when_box_crosses_a_meridian() {
        let identity = tiles_for_box(&bbox(38.5, -77.02, 0.1), Resolution::SRTM3).unwrap();
        assert_eq!(identity.layout(), StitchLayout::WestEast);
        assert_eq!(identity.keys(), &[key(38, -78), key(38, -77)]);
    }

    #[test]
    fn test_quad_when_box_straddles_both_boundaries() {
        let identity = tiles_for_box(&bbox(39.0, -77.0, 0.1), Resolution::SRTM3).unwrap();
        assert_eq!(identity.layout(), StitchLayout::Quad);
        assert_eq!(
            identity.keys(),
            &[key(39, -78), key(39, -77), key(38, -78), key(38, -77)]
        );
    }

    #[test]
    fn test_all_equal_checked_before_row_and_column_equality() {
        // Four identical corners also satisfy UL=UR/LL=LR and UL=LL/UR=LR.
        let k = key(10, 10);
        let identity = dedupe_corner_tiles([k, k, k, k]).unwrap();
        assert_eq!(identity.layout(), StitchLayout::Single);
        assert_eq!(identity.keys().len(), 1);
    }

    #[test]
    fn test_southern_western_hemisphere_quad() {
        let identity = tiles_for_box(&bbox(-34.0, -58.0, 0.05), Resolution::SRTM3).unwrap();
        assert_eq!(identity.layout(), StitchLayout::Quad);
        assert_eq!(identity.north_west(), key(-34, -59));
        assert_eq!(identity.keys()[3], key(-35, -58));
    }

    #[test]
    fn test_identity_rejects_wrong_count() {
        let result = GridIdentity::new(StitchLayout::Quad, vec![key(0, 0)]);
        assert!(matches!(result, Err(GridError::InvalidLayout(_))));
    }

    #[test]
    fn test_identity_rejects_non_adjacent_tiles() {
        let result = GridIdentity::new(StitchLayout::WestEast, vec![key(0, 0), key(0, 2)]);
        assert!(matches!(result, Err(GridError::InvalidLayout(_))));
    }

    #[test]
    fn test_identity_rejects_mixed_resolution() {
        let result = GridIdentity::new(
            StitchLayout::NorthSouth,
            vec![key(1, 0), TileKey::new(0, 0, Resolution::SRTM1)],
        );
        assert!(matches!(result, Err(GridError::MixedResolution { .. })));
    }

    #[test]
    fn test_layout_dimensions() {
        assert_eq!(StitchLayout::Single.tile_count(), 1);
        assert_eq!(
            (StitchLayout::NorthSouth.rows(), StitchLayout::NorthSouth.cols()),
            (2, 1)
        );
        assert_eq!(
            (StitchLayout::WestEast.rows(), StitchLayout::WestEast.cols()),
            (1, 2)
        );
        assert_eq!(StitchLayout::Quad.tile_count(), 4);
    }
}
