//! SRTM elevation tiles.
//!
//! Tiles are addressed by [`TileKey`], decoded into immutable
//! [`ElevationTile`]s, read from a [`TileStore`] and cached per process by
//! [`TileCache`].
//!
//! # Example
//!
//! ```
//! use fogmachine::hgt::{ElevationTile, MemoryTileStore, Resolution, TileCache, TileKey};
//! use std::sync::Arc;
//!
//! let key = TileKey::new(38, -77, Resolution::from_samples(11).unwrap());
//! let store = MemoryTileStore::with_tiles([ElevationTile::filled(key, 100)]);
//! let cache = TileCache::new(Arc::new(store));
//!
//! let tile = cache.tile(&key).unwrap();
//! assert_eq!(tile.elevation(5, 5), Some(100));
//! ```

mod cache;
mod error;
mod key;
mod store;
mod tile;

pub use cache::TileCache;
pub use error::TileError;
pub use key::{Resolution, TileKey};
pub use store::{DirectoryTileStore, MemoryTileStore, TileStore};
pub use tile::{ElevationTile, NO_DATA};
