//! Elevation tile samples.

use super::{Resolution, TileError, TileKey};
use bytes::{Buf, BufMut, BytesMut};

/// Sample value marking a void in SRTM data.
pub const NO_DATA: i16 = -32768;

/// One degree-cell of elevation samples in metres.
///
/// Samples are stored row-major with row 0 on the northern edge and column 0
/// on the western edge, exactly as they appear in an `.hgt` file. Tiles are
/// immutable once constructed and are shared behind `Arc` by the tile cache.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationTile {
    key: TileKey,
    samples: Vec<i16>,
}

impl ElevationTile {
    /// Decode a raw big-endian HGT buffer.
    pub fn from_hgt_bytes(key: TileKey, data: &[u8]) -> Result<Self, TileError> {
        let expected = key.resolution.byte_len();
        if data.len() != expected {
            return Err(TileError::InvalidSize {
                key,
                expected,
                actual: data.len(),
            });
        }

        let mut buf = data;
        let mut samples = Vec::with_capacity(data.len() / 2);
        while buf.has_remaining() {
            samples.push(buf.get_i16());
        }

        Ok(Self { key, samples })
    }

    /// Build a tile from already decoded samples.
    pub fn from_samples(key: TileKey, samples: Vec<i16>) -> Result<Self, TileError> {
        let side = key.resolution.samples() as usize;
        if samples.len() != side * side {
            return Err(TileError::InvalidSize {
                key,
                expected: side * side * 2,
                actual: samples.len() * 2,
            });
        }
        Ok(Self { key, samples })
    }

    /// Build a tile where every sample has the same elevation.
    pub fn filled(key: TileKey, elevation: i16) -> Self {
        let side = key.resolution.samples() as usize;
        Self {
            key,
            samples: vec![elevation; side * side],
        }
    }

    /// Encode back to the raw big-endian HGT layout.
    pub fn to_hgt_bytes(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(self.samples.len() * 2);
        for &sample in &self.samples {
            buf.put_i16(sample);
        }
        buf.to_vec()
    }

    /// Tile identity.
    #[inline]
    pub fn key(&self) -> TileKey {
        self.key
    }

    /// Sample density.
    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.key.resolution
    }

    /// Samples per side.
    #[inline]
    pub fn side(&self) -> usize {
        self.key.resolution.samples() as usize
    }

    /// Sample at (row, col), or `None` outside the tile.
    ///
    /// Voids are returned as [`NO_DATA`].
    #[inline]
    pub fn elevation(&self, row: usize, col: usize) -> Option<i16> {
        let side = self.side();
        if row >= side || col >= side {
            return None;
        }
        Some(self.samples[row * side + col])
    }

    /// Lowest and highest valid sample, ignoring voids.
    pub fn elevation_range(&self) -> Option<(i16, i16)> {
        self.samples
            .iter()
            .copied()
            .filter(|&s| s != NO_DATA)
            .fold(None, |acc, s| match acc {
                None => Some((s, s)),
                Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_key() -> TileKey {
        TileKey::new(38, -77, Resolution::from_samples(3).unwrap())
    }

    #[test]
    fn test_decode_big_endian() {
        let bytes: Vec<u8> = vec![
            0x00, 0x01, 0x00, 0x02, 0x00, 0x03, //
            0x01, 0x00, 0xFF, 0xFF, 0x80, 0x00, //
            0x00, 0x00, 0x00, 0x00, 0x7F, 0xFF,
        ];
        let tile = ElevationTile::from_hgt_bytes(small_key(), &bytes).unwrap();

        assert_eq!(tile.elevation(0, 0), Some(1));
        assert_eq!(tile.elevation(0, 2), Some(3));
        assert_eq!(tile.elevation(1, 0), Some(256));
        assert_eq!(tile.elevation(1, 1), Some(-1));
        assert_eq!(tile.elevation(1, 2), Some(NO_DATA));
        assert_eq!(tile.elevation(2, 2), Some(i16::MAX));
        assert_eq!(tile.elevation(3, 0), None);
    }

    #[test]
    fn test_decode_rejects_wrong_size() {
        let result = ElevationTile::from_hgt_bytes(small_key(), &[0u8; 10]);
        assert!(matches!(
            result,
            Err(TileError::InvalidSize {
                expected: 18,
                actual: 10,
                ..
            })
        ));
    }

    #[test]
    fn test_encode_decode_preserves_samples() {
        let tile =
            ElevationTile::from_samples(small_key(), vec![0, 10, -5, 300, NO_DATA, 7, 8, 9, 1])
                .unwrap();
        let decoded = ElevationTile::from_hgt_bytes(tile.key(), &tile.to_hgt_bytes()).unwrap();
        assert_eq!(decoded, tile);
    }

    #[test]
    fn test_from_samples_rejects_wrong_count() {
        assert!(ElevationTile::from_samples(small_key(), vec![0; 8]).is_err());
    }

    #[test]
    fn test_filled_tile() {
        let tile = ElevationTile::filled(small_key(), 120);
        assert_eq!(tile.side(), 3);
        assert_eq!(tile.elevation(2, 1), Some(120));
        assert_eq!(tile.elevation_range(), Some((120, 120)));
    }

    #[test]
    fn test_elevation_range_ignores_voids() {
        let tile = ElevationTile::from_samples(
            small_key(),
            vec![NO_DATA, 10, -5, 300, NO_DATA, 7, 8, 9, 1],
        )
        .unwrap();
        assert_eq!(tile.elevation_range(), Some((-5, 300)));

        let void = ElevationTile::filled(small_key(), NO_DATA);
        assert_eq!(void.elevation_range(), None);
    }
}
