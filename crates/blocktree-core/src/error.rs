//! Error types for blocktree-core.
//!
//! Only snapshot loading is fallible. The graph passes are total over any
//! finite input and never produce a `CoreError`.

use thiserror::Error;

/// Result type alias for blocktree-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while reading a work item snapshot.
#[derive(Debug, Error)]
pub enum CoreError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Snapshot format name not recognised.
    #[error("unsupported snapshot format: {0}")]
    UnsupportedFormat(String),

    /// Snapshot parsed but does not contain a list of items.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
