//! Abstract peer messaging.

use super::{FMNode, PartialResult, TaskBatch};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Reasons a peer batch produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerError {
    /// No answer before the dispatch deadline.
    #[error("Peer did not respond within {0:?}")]
    Timeout(Duration),

    /// The peer could not be contacted.
    #[error("Peer unreachable: {0}")]
    Unreachable(String),

    /// The peer answered with an error of its own.
    #[error("Peer failed to compute batch: {0}")]
    Remote(String),

    /// The answer could not be used.
    #[error("Malformed peer response: {0}")]
    MalformedResponse(String),
}

/// Delivers task batches to peers and returns their partial results.
///
/// Implementations own connection management and keep the roster current;
/// the coordinator only reads snapshots and sends.
pub trait PeerTransport: Send + Sync + 'static {
    /// Peers reachable right now.
    fn current_roster(&self) -> Vec<FMNode>;

    /// Send one batch and wait for its result.
    ///
    /// The caller applies the deadline; implementations need not time out.
    fn send(
        &self,
        node: &FMNode,
        batch: TaskBatch,
    ) -> impl Future<Output = Result<PartialResult, PeerError>> + Send;
}

/// Transport with no peers. Every viewshed runs locally.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOnly;

impl PeerTransport for LocalOnly {
    fn current_roster(&self) -> Vec<FMNode> {
        Vec::new()
    }

    async fn send(&self, node: &FMNode, _batch: TaskBatch) -> Result<PartialResult, PeerError> {
        Err(PeerError::Unreachable(format!("{node} is not connected")))
    }
}
