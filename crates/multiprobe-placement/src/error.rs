//! Error types for the placement crate.

use crate::node::NodeId;

/// Errors produced while configuring a selector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementError {
    /// A node weight was zero, negative, infinite or NaN.
    #[error("invalid weight {weight} for node {node}: must be a positive finite number")]
    InvalidWeight {
        /// The node the weight was supplied for.
        node: NodeId,
        /// The rejected weight.
        weight: f64,
    },
}
