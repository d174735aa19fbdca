//! Node registry: node weights and their running total.

use std::collections::BTreeMap;

use crate::error::PlacementError;
use crate::node::NodeId;

/// Weight given to nodes added without an explicit weight.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Mapping from node ID to weight, plus the sum of all weights.
///
/// Nodes are kept ordered by ID so iteration (and therefore tie-breaking in
/// the selector) is the same for any two registries with equal contents.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: BTreeMap<NodeId, f64>,
    total_weight: f64,
}

impl NodeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node or replace the weight of an existing one.
    ///
    /// Returns the previous weight when the node already existed. The old
    /// weight is taken out of the total before the new one is added.
    pub fn insert(&mut self, id: NodeId, weight: f64) -> Result<Option<f64>, PlacementError> {
        validate_weight(&id, weight)?;

        let previous = self.nodes.insert(id, weight);
        if let Some(old) = previous {
            self.total_weight -= old;
        }
        self.total_weight += weight;

        Ok(previous)
    }

    /// Insert several nodes in iteration order. `None` weights become
    /// [`DEFAULT_WEIGHT`].
    ///
    /// Every weight is validated first; on error nothing is inserted.
    pub fn insert_many<I, K>(&mut self, nodes: I) -> Result<(), PlacementError>
    where
        I: IntoIterator<Item = (K, Option<f64>)>,
        K: Into<NodeId>,
    {
        let nodes: Vec<(NodeId, f64)> = nodes
            .into_iter()
            .map(|(id, weight)| (id.into(), weight.unwrap_or(DEFAULT_WEIGHT)))
            .collect();

        for (id, weight) in &nodes {
            validate_weight(id, *weight)?;
        }
        for (id, weight) in nodes {
            self.insert(id, weight)?;
        }

        Ok(())
    }

    /// Remove a node, returning its weight. Absent nodes are ignored.
    pub fn remove(&mut self, id: &str) -> Option<f64> {
        let weight = self.nodes.remove(id)?;
        self.total_weight -= weight;
        if self.nodes.is_empty() {
            // Drop accumulated rounding error.
            self.total_weight = 0.0;
        }
        Some(weight)
    }

    /// Remove every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.total_weight = 0.0;
    }

    /// Weight of a node, if present.
    pub fn weight(&self, id: &str) -> Option<f64> {
        self.nodes.get(id).copied()
    }

    /// Whether a node is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the registry has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of all registered weights.
    ///
    /// Bookkeeping only: the selector weighs each node individually and
    /// never consults the total.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Fraction of keys a node should receive ideally (`weight / total`).
    pub fn ideal_share(&self, id: &str) -> Option<f64> {
        let weight = self.weight(id)?;
        Some(weight / self.total_weight)
    }

    /// All node IDs in iteration order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().cloned().collect()
    }

    /// Iterate over `(id, weight)` pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, f64)> {
        self.nodes.iter().map(|(id, weight)| (id, *weight))
    }
}

fn validate_weight(id: &NodeId, weight: f64) -> Result<(), PlacementError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(PlacementError::InvalidWeight {
            node: id.clone(),
            weight,
        })
    }
}
