//! Peer-side batch execution.

use super::{MessageError, PartialResult, TaskBatch};
use crate::grid::{ElevationGrid, GridError};
use crate::hgt::TileCache;
use crate::viewshed::VisibilitySweep;
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Message(#[from] MessageError),
}

/// Runs task batches against a node's own tile store.
///
/// Blocking: call it from `spawn_blocking` or a dedicated thread.
#[derive(Clone)]
pub struct BatchWorker {
    cache: Arc<TileCache>,
}

impl BatchWorker {
    pub fn new(cache: Arc<TileCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<TileCache> {
        &self.cache
    }

    /// Rebuild the coordinator's grid and sweep the batch's targets.
    pub fn execute(&self, batch: &TaskBatch) -> Result<PartialResult, WorkerError> {
        let grid = ElevationGrid::load(&batch.grid, &self.cache)?;
        let sweep = VisibilitySweep::new(&grid, &batch.observer, batch.window, batch.options)?;
        let result = sweep.run_parallel(&batch.targets)?;

        debug!(
            batch = batch.batch_index,
            targets = batch.targets.len(),
            "Executed task batch"
        );
        Ok(PartialResult::from_grid(batch.batch_index, &result))
    }

    /// Decode a request, execute it and encode the response.
    pub fn handle_bytes(&self, request: &[u8]) -> Result<Bytes, WorkerError> {
        let batch = TaskBatch::from_bytes(request)?;
        Ok(self.execute(&batch)?.to_bytes()?)
    }
}
