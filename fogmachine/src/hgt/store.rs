//! Tile storage abstraction.
//!
//! The core never downloads or deletes elevation data; it only reads what a
//! storage collaborator reports as resident. [`DirectoryTileStore`] serves
//! `.hgt` files from disk, [`MemoryTileStore`] serves in-memory fixtures.

use super::{ElevationTile, Resolution, TileError, TileKey};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// Read access to resident elevation tiles.
///
/// Implementations must be `Send + Sync` so a single store can back every
/// concurrent viewshed computation on a node.
pub trait TileStore: Send + Sync {
    /// True when the tile can be loaded without external help.
    fn has_tile(&self, key: &TileKey) -> bool;

    /// Load and decode a tile.
    ///
    /// Returns [`TileError::NotFound`] when the tile is not resident.
    fn load_tile(&self, key: &TileKey) -> Result<ElevationTile, TileError>;

    /// Keys of every resident tile, sorted south-west first.
    fn resident_tiles(&self) -> Result<Vec<TileKey>, TileError>;
}

impl<T: TileStore + ?Sized> TileStore for Arc<T> {
    fn has_tile(&self, key: &TileKey) -> bool {
        (**self).has_tile(key)
    }

    fn load_tile(&self, key: &TileKey) -> Result<ElevationTile, TileError> {
        (**self).load_tile(key)
    }

    fn resident_tiles(&self) -> Result<Vec<TileKey>, TileError> {
        (**self).resident_tiles()
    }
}

fn sort_keys(keys: &mut [TileKey]) {
    keys.sort_by_key(|k| (k.lat, k.lon));
}

/// Serves `.hgt` files from a single directory.
#[derive(Debug, Clone)]
pub struct DirectoryTileStore {
    root: PathBuf,
    resolution: Resolution,
}

impl DirectoryTileStore {
    /// Create a store over `root` holding tiles of one resolution.
    pub fn new(root: impl Into<PathBuf>, resolution: Resolution) -> Self {
        Self {
            root: root.into(),
            resolution,
        }
    }

    /// Directory this store reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolution of the tiles in this directory.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Path where the tile for `key` is expected.
    pub fn path_for(&self, key: &TileKey) -> PathBuf {
        self.root.join(key.filename())
    }
}

impl TileStore for DirectoryTileStore {
    fn has_tile(&self, key: &TileKey) -> bool {
        key.resolution == self.resolution && self.path_for(key).is_file()
    }

    fn load_tile(&self, key: &TileKey) -> Result<ElevationTile, TileError> {
        if key.resolution != self.resolution {
            return Err(TileError::NotFound(*key));
        }

        let path = self.path_for(key);
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TileError::NotFound(*key));
            }
            Err(source) => return Err(TileError::Io { path, source }),
        };

        trace!(path = %path.display(), bytes = data.len(), "Decoding elevation tile");
        ElevationTile::from_hgt_bytes(*key, &data)
    }

    fn resident_tiles(&self) -> Result<Vec<TileKey>, TileError> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| TileError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut keys = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_hgt = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("hgt"));
            if !is_hgt || !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            match TileKey::parse_filename(name, self.resolution) {
                Ok(key) => keys.push(key),
                Err(_) => debug!(file = name, "Skipping unrecognised .hgt filename"),
            }
        }

        sort_keys(&mut keys);
        Ok(keys)
    }
}

/// In-memory tile store, mostly for fixtures and tests.
#[derive(Debug, Default)]
pub struct MemoryTileStore {
    tiles: RwLock<HashMap<TileKey, ElevationTile>>,
}

impl MemoryTileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `tiles`.
    pub fn with_tiles(tiles: impl IntoIterator<Item = ElevationTile>) -> Self {
        let store = Self::new();
        for tile in tiles {
            store.insert(tile);
        }
        store
    }

    /// Add or replace a tile.
    pub fn insert(&self, tile: ElevationTile) {
        self.tiles.write().insert(tile.key(), tile);
    }

    /// Remove a tile, returning whether it was present.
    pub fn remove(&self, key: &TileKey) -> bool {
        self.tiles.write().remove(key).is_some()
    }
}

impl TileStore for MemoryTileStore {
    fn has_tile(&self, key: &TileKey) -> bool {
        self.tiles.read().contains_key(key)
    }

    fn load_tile(&self, key: &TileKey) -> Result<ElevationTile, TileError> {
        self.tiles
            .read()
            .get(key)
            .cloned()
            .ok_or(TileError::NotFound(*key))
    }

    fn resident_tiles(&self) -> Result<Vec<TileKey>, TileError> {
        let mut keys: Vec<TileKey> = self.tiles.read().keys().copied().collect();
        sort_keys(&mut keys);
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tiny() -> Resolution {
        Resolution::from_samples(5).unwrap()
    }

    fn write_tile(dir: &Path, tile: &ElevationTile) {
        std::fs::write(dir.join(tile.key().filename()), tile.to_hgt_bytes()).unwrap();
    }

    #[test]
    fn test_directory_store_loads_resident_tile() {
        let temp = TempDir::new().unwrap();
        let key = TileKey::new(38, -77, tiny());
        write_tile(temp.path(), &ElevationTile::filled(key, 42));

        let store = DirectoryTileStore::new(temp.path(), tiny());
        assert!(store.has_tile(&key));
        let tile = store.load_tile(&key).unwrap();
        assert_eq!(tile.elevation(4, 4), Some(42));
    }

    #[test]
    fn test_directory_store_missing_tile_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = DirectoryTileStore::new(temp.path(), tiny());
        let key = TileKey::new(1, 1, tiny());

        assert!(!store.has_tile(&key));
        assert!(matches!(store.load_tile(&key), Err(TileError::NotFound(k)) if k == key));
    }

    #[test]
    fn test_directory_store_rejects_other_resolution() {
        let temp = TempDir::new().unwrap();
        let key = TileKey::new(38, -77, tiny());
        write_tile(temp.path(), &ElevationTile::filled(key, 1));

        let store = DirectoryTileStore::new(temp.path(), Resolution::SRTM3);
        let srtm3_key = TileKey::new(38, -77, Resolution::SRTM3);
        assert!(!store.has_tile(&key));
        assert!(matches!(
            store.load_tile(&srtm3_key),
            Err(TileError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_directory_store_lists_tiles_sorted() {
        let temp = TempDir::new().unwrap();
        for (lat, lon) in [(39, -77), (38, -76), (38, -77)] {
            write_tile(
                temp.path(),
                &ElevationTile::filled(TileKey::new(lat, lon, tiny()), 0),
            );
        }
        std::fs::write(temp.path().join("notes.txt"), "hello").unwrap();
        std::fs::write(temp.path().join("bogus.hgt"), "nope").unwrap();

        let store = DirectoryTileStore::new(temp.path(), tiny());
        let keys = store.resident_tiles().unwrap();
        let cells: Vec<(i32, i32)> = keys.iter().map(|k| (k.lat, k.lon)).collect();
        assert_eq!(cells, vec![(38, -77), (38, -76), (39, -77)]);
    }

    #[test]
    fn test_directory_store_missing_directory_is_io_error() {
        let store = DirectoryTileStore::new("/nonexistent/fogmachine/tiles", tiny());
        assert!(matches!(store.resident_tiles(), Err(TileError::Io { .. })));
    }

    #[test]
    fn test_memory_store_insert_and_remove() {
        let store = MemoryTileStore::new();
        let key = TileKey::new(0, 0, tiny());
        assert!(!store.has_tile(&key));

        store.insert(ElevationTile::filled(key, 5));
        assert!(store.has_tile(&key));
        assert_eq!(store.load_tile(&key).unwrap().elevation(0, 0), Some(5));

        assert!(store.remove(&key));
        assert!(matches!(store.load_tile(&key), Err(TileError::NotFound(_))));
    }

    #[test]
    fn test_arc_store_delegates() {
        let key = TileKey::new(0, 0, tiny());
        let store: Arc<dyn TileStore> =
            Arc::new(MemoryTileStore::with_tiles([ElevationTile::filled(key, 3)]));
        assert!(store.has_tile(&key));
        assert_eq!(store.resident_tiles().unwrap(), vec![key]);
    }
}
