//! Error types for the measurement harness.

use std::path::PathBuf;

use multiprobe_placement::PlacementError;

/// Errors produced while generating keys, running measurements or writing
/// reports.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A scenario could not be turned into a selector.
    #[error("placement error: {0}")]
    Placement(#[from] PlacementError),

    /// A key file could not be read.
    #[error("failed to read key file {path}: {source}")]
    KeyFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A key file is not a JSON array of strings.
    #[error("key file {path} is not a JSON array of strings: {source}")]
    KeyFileFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Random generation did not reach the requested number of unique items.
    #[error("could only generate {got} of {wanted} unique {kind}")]
    NotUnique {
        kind: &'static str,
        wanted: usize,
        got: usize,
    },

    /// A run was started with nothing to hash.
    #[error("no keys to hash")]
    NoKeys,

    /// Every `results{N}.csv` slot is already taken.
    #[error("no free results file in {dir} (tried results1.csv to results{max}.csv)")]
    NoFreeResultFile { dir: PathBuf, max: u32 },
}
