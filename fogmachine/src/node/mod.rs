//! Distributing a viewshed across nodes.
//!
//! [`NodeCoordinator`] owns the computation. It talks to peers only through
//! [`PeerTransport`], sending [`TaskBatch`]es and receiving
//! [`PartialResult`]s. On the peer side a [`BatchWorker`] rebuilds the grid
//! from its own tiles and sweeps the batch. [`InProcessTransport`] wires
//! coordinator and workers together inside one process.

mod coordinator;
mod fm_node;
mod local;
mod message;
mod roster;
mod transport;
mod worker;

pub use coordinator::{BatchFailure, CoordinatorError, NodeCoordinator, ViewshedResult};
pub use fm_node::{FMNode, PeerHandle};
pub use local::{InProcessTransport, PeerBehaviour, SimulatedPeer};
pub use message::{MessageError, PartialResult, TaskBatch};
pub use roster::PeerRoster;
pub use transport::{LocalOnly, PeerError, PeerTransport};
pub use worker::{BatchWorker, WorkerError};
