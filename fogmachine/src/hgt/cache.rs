//! Process-lifetime tile cache.

use super::{ElevationTile, Resolution, TileError, TileKey, TileStore};
use crate::coord::Coordinate;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Caches decoded tiles from a [`TileStore`] for the life of the process.
///
/// Tiles are immutable, so the cache hands out `Arc<ElevationTile>` clones
/// that every concurrent computation can read without locking. Two callers
/// racing on the same cold key may both decode it; the first insert wins.
pub struct TileCache {
    store: Arc<dyn TileStore>,
    tiles: DashMap<TileKey, Arc<ElevationTile>>,
}

impl TileCache {
    /// Wrap a tile store.
    pub fn new(store: Arc<dyn TileStore>) -> Self {
        Self {
            store,
            tiles: DashMap::new(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn TileStore> {
        &self.store
    }

    /// True when the tile is cached or resident in the store.
    pub fn has_tile(&self, key: &TileKey) -> bool {
        self.tiles.contains_key(key) || self.store.has_tile(key)
    }

    /// Get a tile, loading it on first reference.
    pub fn tile(&self, key: &TileKey) -> Result<Arc<ElevationTile>, TileError> {
        if let Some(tile) = self.tiles.get(key) {
            return Ok(Arc::clone(tile.value()));
        }

        let tile = Arc::new(self.store.load_tile(key)?);
        debug!(tile = %key, "Loaded elevation tile");
        Ok(Arc::clone(self.tiles.entry(*key).or_insert(tile).value()))
    }

    /// Get the tile containing `coordinate`.
    pub fn tile_for(
        &self,
        coordinate: Coordinate,
        resolution: Resolution,
    ) -> Result<Arc<ElevationTile>, TileError> {
        self.tile(&TileKey::from_coordinate(coordinate, resolution))
    }

    /// Number of cached tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True when nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
