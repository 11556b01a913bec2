//! FogMachine - distributed viewshed analysis over SRTM elevation tiles.
//!
//! A viewshed is the set of terrain cells visible from an observer. This
//! crate loads SRTM `.hgt` tiles, stitches the ones around an observer into
//! one elevation grid, casts line-of-sight rays from the observer to the
//! border of its view radius, and optionally spreads those rays over peer
//! nodes before merging their partial results.
//!
//! # Example
//!
//! ```
//! use fogmachine::config::CoordinatorConfig;
//! use fogmachine::coord::Coordinate;
//! use fogmachine::hgt::{ElevationTile, MemoryTileStore, Resolution, TileCache, TileKey};
//! use fogmachine::node::{LocalOnly, NodeCoordinator};
//! use fogmachine::observer::Observer;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let resolution = Resolution::from_samples(101).unwrap();
//! let tile = ElevationTile::filled(TileKey::new(46, 7, resolution), 1500);
//! let cache = Arc::new(TileCache::new(Arc::new(MemoryTileStore::with_tiles([tile]))));
//!
//! let coordinator = NodeCoordinator::new(
//!     cache,
//!     Arc::new(LocalOnly),
//!     CoordinatorConfig::new().with_resolution(resolution),
//! );
//! let observer = Observer::new(Coordinate::new(46.5, 7.5).unwrap(), 2.0, 20);
//! let result = coordinator.compute_viewshed(observer).await.unwrap();
//! assert_eq!(result.counts().visible, 41 * 41 - 1);
//! # }
//! ```

pub mod config;
pub mod coord;
pub mod grid;
pub mod hgt;
pub mod logging;
pub mod merge;
pub mod node;
pub mod observer;
pub mod partition;
pub mod viewshed;

/// Version of the FogMachine library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
