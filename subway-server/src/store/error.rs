//! Snapshot error types.

use std::path::PathBuf;

/// Errors that can occur when reading or writing the snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Reading, writing or creating directories failed
    #[error("snapshot I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid snapshot JSON
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file parsed but describes an invalid network
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),
}
