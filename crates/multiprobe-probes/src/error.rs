//! Error types for probe configuration.

/// Errors produced when resolving probes by name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// No algorithm with this name is supported.
    #[error("unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),

    /// No bundle with this name exists.
    #[error("unknown probe bundle: {0} (expected \"standard\" or \"accurate\")")]
    UnknownBundle(String),
}
