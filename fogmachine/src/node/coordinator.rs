//! Distributed viewshed orchestration.

use super::{FMNode, PartialResult, PeerError, PeerTransport, TaskBatch};
use crate::config::CoordinatorConfig;
use crate::coord::BoundingBox;
use crate::grid::{Cell, ElevationGrid, GridError, GridIdentity};
use crate::hgt::{TileCache, TileError, TileKey};
use crate::merge::{MergeError, ResultMerger};
use crate::observer::{LocatedObserver, Observer};
use crate::partition::partition;
use crate::viewshed::{CellCounts, CellState, ViewWindow, VisibilityGrid, VisibilitySweep};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

/// Failures that abort a viewshed computation.
///
/// Peer problems are not in here: they degrade the result instead (see
/// [`ViewshedResult::failures`]).
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// Required tiles are not resident. Never retried.
    #[error("Elevation data unavailable: {}", missing_list(.0))]
    DataUnavailable(Vec<TileKey>),

    #[error(transparent)]
    Grid(GridError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    /// The local sweep task panicked or was cancelled.
    #[error("Local sweep task failed: {0}")]
    LocalTask(String),
}

fn missing_list(keys: &[TileKey]) -> String {
    keys.iter()
        .map(TileKey::filename)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<GridError> for CoordinatorError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::Tile(TileError::NotFound(key)) => CoordinatorError::DataUnavailable(vec![key]),
            other => CoordinatorError::Grid(other),
        }
    }
}

/// A peer batch that contributed nothing to the result.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub batch_index: usize,
    pub node: FMNode,
    /// The rays that were never traced.
    pub targets: Vec<Cell>,
    pub error: PeerError,
}

/// Outcome of one viewshed computation.
#[derive(Debug, Clone)]
pub struct ViewshedResult {
    grid: VisibilityGrid,
    window: ViewWindow,
    observer: LocatedObserver,
    bounding_box: BoundingBox,
    tiles: GridIdentity,
    batches: usize,
    failures: Vec<BatchFailure>,
    elapsed: Duration,
}

impl ViewshedResult {
    /// Merged visibility over the view window.
    pub fn grid(&self) -> &VisibilityGrid {
        &self.grid
    }

    /// Placement of the grid within the stitched elevation grid.
    pub fn window(&self) -> &ViewWindow {
        &self.window
    }

    pub fn observer(&self) -> &LocatedObserver {
        &self.observer
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Tiles the elevation grid was stitched from.
    pub fn tiles(&self) -> &GridIdentity {
        &self.tiles
    }

    /// Number of batches the perimeter was split into, including the local one.
    pub fn batches(&self) -> usize {
        self.batches
    }

    /// Peer batches that timed out or failed, by batch index.
    pub fn failures(&self) -> &[BatchFailure] {
        &self.failures
    }

    /// True when every batch contributed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn counts(&self) -> CellCounts {
        self.grid.counts()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// State of a cell addressed in elevation-grid coordinates.
    pub fn state_at(&self, cell: Cell) -> Option<CellState> {
        let index = self.window.index_of(cell)?;
        self.grid.cells().get(index).copied()
    }
}

/// Runs viewsheds locally and across the peers of a [`PeerTransport`].
///
/// The perimeter of the view window is split into `1 + peers` batches. The
/// first runs on this node's blocking pool while the rest go to peers under
/// one shared deadline. Whatever comes back in time is merged; the rest is
/// reported in [`ViewshedResult::failures`] and its cells stay unknown.
pub struct NodeCoordinator<T: PeerTransport> {
    cache: Arc<TileCache>,
    transport: Arc<T>,
    config: CoordinatorConfig,
}

impl<T: PeerTransport> NodeCoordinator<T> {
    pub fn new(cache: Arc<TileCache>, transport: Arc<T>, config: CoordinatorConfig) -> Self {
        Self {
            cache,
            transport,
            config,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn cache(&self) -> &Arc<TileCache> {
        &self.cache
    }

    /// Unique tiles the observer's view square needs.
    pub fn required_tiles(&self, observer: &Observer) -> Result<GridIdentity, CoordinatorError> {
        Ok(observer.required_tiles(self.config.resolution())?)
    }

    /// True when every required tile is available locally.
    pub fn is_viewshed_possible(&self, observer: &Observer) -> bool {
        match observer.required_tiles(self.config.resolution()) {
            Ok(identity) => {
                !identity.keys().is_empty() && identity.keys().iter().all(|k| self.cache.has_tile(k))
            }
            Err(_) => false,
        }
    }

    /// Compute the viewshed for `observer`.
    #[instrument(skip(self, observer), fields(
        position = %observer.position(),
        radius = observer.radius(),
    ))]
    pub async fn compute_viewshed(
        &self,
        observer: Observer,
    ) -> Result<ViewshedResult, CoordinatorError> {
        let started = Instant::now();
        let resolution = self.config.resolution();

        let bounding_box = observer.bounding_box(resolution)?;
        let tiles = crate::grid::tiles_for_box(&bounding_box, resolution)?;

        let missing: Vec<TileKey> = tiles
            .keys()
            .iter()
            .filter(|key| !self.cache.has_tile(key))
            .copied()
            .collect();
        if !missing.is_empty() {
            warn!(missing = %missing_list(&missing), "Required elevation tiles are not resident");
            return Err(CoordinatorError::DataUnavailable(missing));
        }

        let grid = Arc::new(ElevationGrid::load(&tiles, &self.cache)?);
        let located = observer.locate(&grid)?;
        let window = located.view_window(&grid);
        let perimeter = window.perimeter();

        let roster = self.transport.current_roster();
        let batch_count = roster.len() + 1;
        let mut batches = partition(&perimeter, batch_count).into_iter();
        let local_targets = batches.next().unwrap_or_default();

        info!(
            layout = ?tiles.layout(),
            window_width = window.width(),
            window_height = window.height(),
            rays = perimeter.len(),
            peers = roster.len(),
            "Dispatching viewshed"
        );

        // Peers first, so they work while the local batch runs.
        let timeout = self.config.peer_timeout();
        let deadline = tokio::time::Instant::now() + timeout;
        let options = self.config.sweep_options();
        let mut dispatched = JoinSet::new();
        let mut outstanding: HashMap<usize, (FMNode, Vec<Cell>)> = HashMap::new();

        for (offset, (node, targets)) in roster.into_iter().zip(batches).enumerate() {
            let batch_index = offset + 1;
            if targets.is_empty() {
                continue;
            }

            let batch = TaskBatch {
                batch_index,
                observer: located,
                grid: tiles.clone(),
                window,
                options,
                targets: targets.clone(),
            };
            outstanding.insert(batch_index, (node.clone(), targets));

            let transport = Arc::clone(&self.transport);
            dispatched.spawn(async move {
                let outcome =
                    match tokio::time::timeout_at(deadline, transport.send(&node, batch)).await {
                        Ok(outcome) => outcome,
                        Err(_) => Err(PeerError::Timeout(timeout)),
                    };
                (batch_index, outcome)
            });
        }

        let local = {
            let grid = Arc::clone(&grid);
            tokio::task::spawn_blocking(move || {
                VisibilitySweep::new(&grid, &located, window, options)?.run_parallel(&local_targets)
            })
        };

        let mut merger = ResultMerger::new(window.width(), window.height());
        let local_grid = local
            .await
            .map_err(|e| CoordinatorError::LocalTask(e.to_string()))??;
        merger.absorb(&local_grid)?;
        debug!(batch = 0, "Local batch complete");

        let mut failures = Vec::new();
        while let Some(joined) = dispatched.join_next().await {
            let (batch_index, outcome) = match joined {
                Ok(joined) => joined,
                Err(join_err) => {
                    warn!(error = %join_err, "Peer dispatch task panicked");
                    continue;
                }
            };
            let Some((node, targets)) = outstanding.remove(&batch_index) else {
                continue;
            };

            match outcome.and_then(|partial| expand_partial(&partial, &window)) {
                Ok(partial) => {
                    merger.absorb(&partial)?;
                    debug!(batch = batch_index, peer = %node, "Peer batch merged");
                }
                Err(error) => {
                    warn!(batch = batch_index, peer = %node, error = %error, "Peer batch failed");
                    failures.push(BatchFailure {
                        batch_index,
                        node,
                        targets,
                        error,
                    });
                }
            }
        }

        // Dispatch tasks that panicked never reported back.
        for (batch_index, (node, targets)) in outstanding {
            failures.push(BatchFailure {
                batch_index,
                node,
                targets,
                error: PeerError::Unreachable("dispatch task aborted".to_string()),
            });
        }
        failures.sort_by_key(|f| f.batch_index);

        let result = ViewshedResult {
            grid: merger.finish(),
            window,
            observer: located,
            bounding_box,
            tiles,
            batches: batch_count,
            failures,
            elapsed: started.elapsed(),
        };

        let counts = result.counts();
        info!(
            visible = counts.visible,
            occluded = counts.occluded,
            unknown = counts.unknown,
            failed_batches = result.failures.len(),
            elapsed_ms = result.elapsed.as_millis() as u64,
            "Viewshed complete"
        );
        Ok(result)
    }
}

/// Decode a peer's answer and check it covers the view window.
fn expand_partial(
    partial: &PartialResult,
    window: &ViewWindow,
) -> Result<VisibilityGrid, PeerError> {
    if (partial.width, partial.height) != (window.width(), window.height()) {
        return Err(PeerError::MalformedResponse(format!(
            "grid is {}x{}, expected {}x{}",
            partial.width,
            partial.height,
            window.width(),
            window.height()
        )));
    }
    partial
        .to_grid()
        .map_err(|e| PeerError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinate;
    use crate::hgt::{ElevationTile, MemoryTileStore, Resolution};
    use crate::node::LocalOnly;

    fn res() -> Resolution {
        Resolution::from_samples(21).unwrap()
    }

    fn cache_with(tiles: impl IntoIterator<Item = ElevationTile>) -> Arc<TileCache> {
        Arc::new(TileCache::new(Arc::new(MemoryTileStore::with_tiles(tiles))))
    }

    fn coordinator(cache: Arc<TileCache>) -> NodeCoordinator<LocalOnly> {
        NodeCoordinator::new(
            cache,
            Arc::new(LocalOnly),
            CoordinatorConfig::new().with_resolution(res()),
        )
    }

    #[tokio::test]
    async fn test_local_only_flat_tile() {
        let cache = cache_with([ElevationTile::filled(TileKey::new(0, 0, res()), 10)]);
        let coordinator = coordinator(cache);
        let observer = Observer::new(Coordinate::new(0.5, 0.5).unwrap(), 2.0, 5);

        assert!(coordinator.is_viewshed_possible(&observer));
        let result = coordinator.compute_viewshed(observer).await.unwrap();

        assert!(result.is_complete());
        assert_eq!(result.batches(), 1);
        assert_eq!(result.counts().visible, 120);
        assert_eq!(result.counts().unknown, 1);
        assert_eq!(
            result.state_at(result.observer().cell()),
            Some(CellState::Unknown)
        );
    }

    #[tokio::test]
    async fn test_missing_tiles_are_reported_together() {
        let coordinator = coordinator(cache_with([]));
        let observer = Observer::new(Coordinate::new(1.0, 1.0).unwrap(), 2.0, 5);

        assert!(!coordinator.is_viewshed_possible(&observer));
        match coordinator.compute_viewshed(observer).await {
            Err(CoordinatorError::DataUnavailable(keys)) => assert_eq!(keys.len(), 4),
            other => panic!("expected DataUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_radius_too_large_is_a_grid_error() {
        let coordinator = coordinator(cache_with([]));
        let observer = Observer::new(Coordinate::new(0.5, 0.5).unwrap(), 2.0, 20);
        assert!(matches!(
            coordinator.compute_viewshed(observer).await,
            Err(CoordinatorError::Grid(GridError::RadiusTooLarge { .. }))
        ));
    }

    /// Answers every batch with a grid far larger than any window.
    struct OversizedAnswers;

    impl PeerTransport for OversizedAnswers {
        fn current_roster(&self) -> Vec<FMNode> {
            vec![FMNode::new("big", "oversized")]
        }

        async fn send(&self, _node: &FMNode, batch: TaskBatch) -> Result<PartialResult, PeerError> {
            Ok(PartialResult {
                batch_index: batch.batch_index,
                width: usize::MAX,
                height: 2,
                visible: vec![0],
                occluded: vec![],
            })
        }
    }

    #[tokio::test]
    async fn test_oversized_peer_answer_degrades_result() {
        let cache = cache_with([ElevationTile::filled(TileKey::new(0, 0, res()), 10)]);
        let coordinator = NodeCoordinator::new(
            cache,
            Arc::new(OversizedAnswers),
            CoordinatorConfig::new().with_resolution(res()),
        );
        let observer = Observer::new(Coordinate::new(0.5, 0.5).unwrap(), 2.0, 5);

        let result = coordinator.compute_viewshed(observer).await.unwrap();

        assert!(!result.is_complete());
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()[0].batch_index, 1);
        assert!(matches!(
            result.failures()[0].error,
            PeerError::MalformedResponse(_)
        ));
        assert!(result.counts().visible > 0);
        assert!(result.counts().unknown > 1);
    }

    #[test]
    fn test_expand_partial_rejects_wrong_dimensions() {
        let partial = PartialResult {
            batch_index: 1,
            width: 3,
            height: 3,
            visible: vec![0],
            occluded: vec![],
        };
        let window = ViewWindow::new(0, 0, 4, 4);
        assert!(matches!(
            expand_partial(&partial, &window),
            Err(PeerError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_not_found_maps_to_data_unavailable() {
        let key = TileKey::new(3, 4, res());
        let err = CoordinatorError::from(GridError::Tile(TileError::NotFound(key)));
        assert!(matches!(err, CoordinatorError::DataUnavailable(ref keys) if keys == &[key]));
        assert_eq!(err.to_string(), "Elevation data unavailable: N03E004.hgt");
    }
}
