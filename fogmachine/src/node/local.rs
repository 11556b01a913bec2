//! In-process peers.
//!
//! [`InProcessTransport`] stands in for a real network: each simulated peer
//! owns a [`BatchWorker`], and every batch makes a full encode/decode trip
//! through the wire format before running on the blocking pool.

use super::{
    BatchWorker, FMNode, PartialResult, PeerError, PeerHandle, PeerRoster, PeerTransport,
    TaskBatch,
};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// How a simulated peer reacts to batches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerBehaviour {
    /// Compute and answer.
    Respond,
    /// Accept the batch and never answer.
    Unresponsive,
    /// Answer with an error.
    Fail(String),
}

/// A peer living inside this process.
#[derive(Clone)]
pub struct SimulatedPeer {
    worker: Arc<BatchWorker>,
    latency: Duration,
    behaviour: PeerBehaviour,
}

impl SimulatedPeer {
    pub fn new(worker: BatchWorker) -> Self {
        Self {
            worker: Arc::new(worker),
            latency: Duration::ZERO,
            behaviour: PeerBehaviour::Respond,
        }
    }

    /// Delay before the peer starts working.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_behaviour(mut self, behaviour: PeerBehaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    async fn call(&self, batch: TaskBatch) -> Result<PartialResult, PeerError> {
        match &self.behaviour {
            PeerBehaviour::Respond => {}
            PeerBehaviour::Unresponsive => return std::future::pending().await,
            PeerBehaviour::Fail(reason) => return Err(PeerError::Remote(reason.clone())),
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let request = batch
            .to_bytes()
            .map_err(|e| PeerError::Unreachable(e.to_string()))?;
        let worker = Arc::clone(&self.worker);
        let response = tokio::task::spawn_blocking(move || worker.handle_bytes(&request))
            .await
            .map_err(|e| PeerError::Unreachable(format!("peer task failed: {e}")))?
            .map_err(|e| PeerError::Remote(e.to_string()))?;

        PartialResult::from_bytes(&response).map_err(|e| PeerError::MalformedResponse(e.to_string()))
    }
}

/// Marker stored in the handle of nodes created by [`InProcessTransport`].
#[derive(Debug, Clone, Copy)]
struct InProcessHandle;

/// Transport whose peers are [`SimulatedPeer`]s in the current process.
#[derive(Default)]
pub struct InProcessTransport {
    roster: PeerRoster,
    peers: DashMap<String, SimulatedPeer>,
}

impl InProcessTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer and add it to the roster.
    pub fn connect(
        &self,
        unique_id: impl Into<String>,
        name: impl Into<String>,
        peer: SimulatedPeer,
    ) -> FMNode {
        let node = FMNode::new(unique_id, name).with_handle(PeerHandle::new(InProcessHandle));
        self.peers.insert(node.unique_id().to_string(), peer);
        self.roster.join(node.clone());
        node
    }

    /// Drop a peer from the roster.
    pub fn disconnect(&self, unique_id: &str) -> Option<FMNode> {
        self.peers.remove(unique_id);
        self.roster.leave(unique_id)
    }

    pub fn roster(&self) -> &PeerRoster {
        &self.roster
    }
}

impl PeerTransport for InProcessTransport {
    fn current_roster(&self) -> Vec<FMNode> {
        self.roster.snapshot()
    }

    async fn send(&self, node: &FMNode, batch: TaskBatch) -> Result<PartialResult, PeerError> {
        let peer = self
            .peers
            .get(node.unique_id())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| PeerError::Unreachable(format!("{node} is not connected")))?;

        debug!(
            peer = %node,
            batch = batch.batch_index,
            targets = batch.targets.len(),
            "Sending batch to in-process peer"
        );
        peer.call(batch).await
    }
}
