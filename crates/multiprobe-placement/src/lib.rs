//! Multi-probe consistent hashing for weighted key placement.
//!
//! This crate maps arbitrary keys to one of a set of weighted, named nodes.
//! Instead of placing virtual replicas of every node on a hash ring, each
//! node is scored by several independent hash functions ("probes") per key,
//! and the node holding the globally smallest weighted score wins:
//!
//! ```text
//! score(key, node) = min over probes p of  p(key ++ node_id) / weight(node)
//! ```
//!
//! A node's score never depends on which other nodes exist, so removing a
//! node only moves the keys it owned and adding a node only moves the keys
//! it now wins. More probes tighten the achieved distribution around the
//! weight-implied ideal at the cost of more hashing per lookup.
//!
//! The crate provides:
//! - [`Probe`] / [`ProbeSet`]: the scoring capability and its ordered set.
//! - [`NodeRegistry`]: node weights plus the running total weight.
//! - [`MultiProbeHash`]: the selector tying both together.
//! - [`SharedHash`]: the selector behind a single reader-writer lock.

mod error;
mod hash;
mod node;
mod probe;
mod registry;
mod shared;

pub use error::PlacementError;
pub use hash::{MultiProbeHash, Reassignment};
pub use node::NodeId;
pub use probe::{FnProbe, Probe, ProbeSet};
pub use registry::{DEFAULT_WEIGHT, NodeRegistry};
pub use shared::SharedHash;
