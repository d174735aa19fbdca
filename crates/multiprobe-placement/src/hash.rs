//! The multi-probe selector.

use tracing::debug;

use crate::error::PlacementError;
use crate::node::NodeId;
use crate::probe::ProbeSet;
use crate::registry::{DEFAULT_WEIGHT, NodeRegistry};

/// A key whose winning node differs between two selector states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    /// Position of the key in the slice passed to
    /// [`MultiProbeHash::reassignments`].
    pub key_index: usize,
    /// The node that won before the change.
    pub from: Option<NodeId>,
    /// The node that wins after the change.
    pub to: Option<NodeId>,
}

/// Multi-probe consistent hash: a node registry plus the probes that score it.
///
/// For a key `k`, every node `n` is scored by every probe `p` as
/// `p(k ++ n) / weight(n)`; the smallest score wins. Nodes are visited in ID
/// order and probes in configured order, and only a strictly smaller score
/// replaces the current best, so the first pair to reach a minimum wins ties.
///
/// The key and node ID are concatenated without a delimiter, so distinct
/// pairs such as `("ab", "c")` and `("a", "bc")` probe the same bytes.
///
/// There is no internal locking; see [`SharedHash`](crate::SharedHash) for
/// concurrent use.
#[derive(Debug, Clone, Default)]
pub struct MultiProbeHash {
    registry: NodeRegistry,
    probes: ProbeSet,
}

impl MultiProbeHash {
    /// Create a selector with no nodes and no probes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selector with the given probes and no nodes.
    pub fn with_probes(probes: ProbeSet) -> Self {
        Self {
            registry: NodeRegistry::new(),
            probes,
        }
    }

    /// Replace the whole probe set.
    ///
    /// Every key is effectively re-scored: assignments made under the old
    /// probes say nothing about assignments under the new ones.
    pub fn set_hash_functions(&mut self, probes: ProbeSet) {
        debug!(probes = %probes.label(), count = probes.len(), "replaced probe set");
        self.probes = probes;
    }

    /// The configured probes.
    pub fn probes(&self) -> &ProbeSet {
        &self.probes
    }

    /// Whether any probe is configured. Without probes every lookup
    /// returns `None`.
    pub fn has_probes(&self) -> bool {
        !self.probes.is_empty()
    }

    /// Add a node with [`DEFAULT_WEIGHT`].
    pub fn add_node(&mut self, id: impl Into<NodeId>) -> Result<Option<f64>, PlacementError> {
        self.add_node_with_weight(id, DEFAULT_WEIGHT)
    }

    /// Add a node, or replace the weight of an existing one.
    ///
    /// Returns the previous weight if the node was already present. Weights
    /// must be positive and finite.
    pub fn add_node_with_weight(
        &mut self,
        id: impl Into<NodeId>,
        weight: f64,
    ) -> Result<Option<f64>, PlacementError> {
        let id = id.into();
        let previous = self.registry.insert(id.clone(), weight)?;
        debug!(node = %id, weight, replaced = previous.is_some(), "added node");
        Ok(previous)
    }

    /// Add several nodes in iteration order; `None` weights default to
    /// [`DEFAULT_WEIGHT`]. Nothing is added if any weight is invalid.
    pub fn add_nodes<I, K>(&mut self, nodes: I) -> Result<(), PlacementError>
    where
        I: IntoIterator<Item = (K, Option<f64>)>,
        K: Into<NodeId>,
    {
        self.registry.insert_many(nodes)?;
        debug!(
            nodes = self.registry.len(),
            total_weight = self.registry.total_weight(),
            "added nodes"
        );
        Ok(())
    }

    /// Remove a node, returning its weight. Removing an absent node is a
    /// no-op.
    pub fn remove_node(&mut self, id: &str) -> Option<f64> {
        let removed = self.registry.remove(id);
        if removed.is_some() {
            debug!(node = id, "removed node");
        }
        removed
    }

    /// Pick the node responsible for `key`.
    ///
    /// Returns `None` when there are no nodes or no probes.
    pub fn get_node(&self, key: impl AsRef<[u8]>) -> Option<&NodeId> {
        if self.registry.is_empty() {
            return None;
        }

        let key = key.as_ref();
        let mut input = Vec::with_capacity(key.len() + 32);
        input.extend_from_slice(key);

        let mut best_score = f64::INFINITY;
        let mut best_node = None;

        for (node, weight) in self.registry.iter() {
            input.truncate(key.len());
            input.extend_from_slice(node.as_bytes());

            for probe in self.probes.iter() {
                // Tiny weights overflow to +inf; the first pair still counts.
                let weighted = probe.score(&input) as f64 / weight;
                if best_node.is_none() || weighted < best_score {
                    best_score = weighted;
                    best_node = Some(node);
                }
            }
        }

        best_node
    }

    /// The node registry.
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Sum of all node weights.
    pub fn total_weight(&self) -> f64 {
        self.registry.total_weight()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.registry.len()
    }

    /// Weight of a node, if present.
    pub fn node_weight(&self, id: &str) -> Option<f64> {
        self.registry.weight(id)
    }

    /// All node IDs, in the order the selector visits them.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.registry.node_ids()
    }

    /// Compare two selector states over `keys`.
    ///
    /// Returns one [`Reassignment`] for every key whose winning node differs
    /// between `old` and `new`, in key order.
    pub fn reassignments<K: AsRef<[u8]>>(
        old: &MultiProbeHash,
        new: &MultiProbeHash,
        keys: &[K],
    ) -> Vec<Reassignment> {
        keys.iter()
            .enumerate()
            .filter_map(|(key_index, key)| {
                let from = old.get_node(key);
                let to = new.get_node(key);
                (from != to).then(|| Reassignment {
                    key_index,
                    from: from.cloned(),
                    to: to.cloned(),
                })
            })
            .collect()
    }
}
