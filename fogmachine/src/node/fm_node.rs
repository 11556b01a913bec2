//! Peer identity.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Transport-specific connection state attached to a node.
///
/// The coordinator never looks inside; only the transport that created the
/// handle downcasts it.
#[derive(Clone)]
pub struct PeerHandle(Arc<dyn Any + Send + Sync>);

impl PeerHandle {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for PeerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PeerHandle(..)")
    }
}

/// A node taking part in a distributed viewshed.
///
/// Two nodes are equal when their `unique_id`s match, whatever their display
/// name or handle.
#[derive(Clone, Debug)]
pub struct FMNode {
    unique_id: String,
    name: String,
    handle: Option<PeerHandle>,
}

impl FMNode {
    pub fn new(unique_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            unique_id: unique_id.into(),
            name: name.into(),
            handle: None,
        }
    }

    /// Attach a transport handle.
    pub fn with_handle(mut self, handle: PeerHandle) -> Self {
        self.handle = Some(handle);
        self
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> Option<&PeerHandle> {
        self.handle.as_ref()
    }
}

impl PartialEq for FMNode {
    fn eq(&self, other: &Self) -> bool {
        self.unique_id == other.unique_id
    }
}

impl Eq for FMNode {}

impl Hash for FMNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unique_id.hash(state);
    }
}

impl fmt::Display for FMNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.unique_id)
    }
}
