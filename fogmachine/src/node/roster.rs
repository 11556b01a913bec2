//! Known peers.

use super::FMNode;
use parking_lot::RwLock;
use tracing::info;

/// Peers currently connected, maintained by the transport layer.
///
/// Repeated joins under one `unique_id` collapse into a single entry whose
/// handle is refreshed. Readers get an owned snapshot so a dispatch never
/// sees the roster change underneath it.
#[derive(Debug, Default)]
pub struct PeerRoster {
    nodes: RwLock<Vec<FMNode>>,
}

impl PeerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a peer, or refresh it if already present. Returns true when the
    /// peer is new.
    pub fn join(&self, node: FMNode) -> bool {
        let mut nodes = self.nodes.write();
        if let Some(existing) = nodes.iter_mut().find(|n| **n == node) {
            *existing = node;
            return false;
        }
        info!(peer = %node, peers = nodes.len() + 1, "Peer joined");
        nodes.push(node);
        true
    }

    /// Remove a peer by id.
    pub fn leave(&self, unique_id: &str) -> Option<FMNode> {
        let mut nodes = self.nodes.write();
        let position = nodes.iter().position(|n| n.unique_id() == unique_id)?;
        let node = nodes.remove(position);
        info!(peer = %node, peers = nodes.len(), "Peer left");
        Some(node)
    }

    pub fn contains(&self, unique_id: &str) -> bool {
        self.nodes.read().iter().any(|n| n.unique_id() == unique_id)
    }

    /// Peers in join order.
    pub fn snapshot(&self) -> Vec<FMNode> {
        self.nodes.read().clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }
}
