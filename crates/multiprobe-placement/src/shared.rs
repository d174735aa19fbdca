//! A [`MultiProbeHash`] shared across threads.

use std::sync::{Arc, RwLock};

use crate::error::PlacementError;
use crate::hash::MultiProbeHash;
use crate::node::NodeId;
use crate::probe::ProbeSet;

/// Thread-safe handle to a [`MultiProbeHash`].
///
/// Lookups take a shared read lock and may run concurrently; membership and
/// probe changes take the write lock. Lookups are pure in-memory work, so a
/// single lock around the whole selector is enough. Clones share the same
/// selector.
#[derive(Debug, Clone, Default)]
pub struct SharedHash {
    inner: Arc<RwLock<MultiProbeHash>>,
}

impl SharedHash {
    /// Share an existing selector.
    pub fn new(hash: MultiProbeHash) -> Self {
        Self {
            inner: Arc::new(RwLock::new(hash)),
        }
    }

    /// Pick the node responsible for `key`. See [`MultiProbeHash::get_node`].
    pub fn get_node(&self, key: impl AsRef<[u8]>) -> Option<NodeId> {
        self.inner
            .read()
            .expect("hash lock poisoned")
            .get_node(key)
            .cloned()
    }

    /// Replace the probe set.
    pub fn set_hash_functions(&self, probes: ProbeSet) {
        self.inner
            .write()
            .expect("hash lock poisoned")
            .set_hash_functions(probes);
    }

    /// Add a node with the default weight.
    pub fn add_node(&self, id: impl Into<NodeId>) -> Result<Option<f64>, PlacementError> {
        self.inner.write().expect("hash lock poisoned").add_node(id)
    }

    /// Add or re-weight a node.
    pub fn add_node_with_weight(
        &self,
        id: impl Into<NodeId>,
        weight: f64,
    ) -> Result<Option<f64>, PlacementError> {
        self.inner
            .write()
            .expect("hash lock poisoned")
            .add_node_with_weight(id, weight)
    }

    /// Add several nodes under one write lock.
    pub fn add_nodes<I, K>(&self, nodes: I) -> Result<(), PlacementError>
    where
        I: IntoIterator<Item = (K, Option<f64>)>,
        K: Into<NodeId>,
    {
        self.inner
            .write()
            .expect("hash lock poisoned")
            .add_nodes(nodes)
    }

    /// Remove a node, returning its weight.
    pub fn remove_node(&self, id: &str) -> Option<f64> {
        self.inner
            .write()
            .expect("hash lock poisoned")
            .remove_node(id)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.read().expect("hash lock poisoned").node_count()
    }

    /// Sum of all node weights.
    pub fn total_weight(&self) -> f64 {
        self.inner
            .read()
            .expect("hash lock poisoned")
            .total_weight()
    }

    /// Copy of the current selector state, e.g. to diff against later with
    /// [`MultiProbeHash::reassignments`].
    pub fn snapshot(&self) -> MultiProbeHash {
        self.inner.read().expect("hash lock poisoned").clone()
    }
}

impl From<MultiProbeHash> for SharedHash {
    fn from(hash: MultiProbeHash) -> Self {
        Self::new(hash)
    }
}
