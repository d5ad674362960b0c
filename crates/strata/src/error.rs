//! Error types for strata operations.
//!
//! Interactive paths (pointer handling) never fail: invariant violations are
//! logged and the drag is reset. [`StrataError`] covers the fallible edges of
//! the engine: loading configuration, ingesting model snapshots and writing
//! output.

use std::io;

use thiserror::Error;

/// The main error type for strata operations.
#[derive(Debug, Error)]
pub enum StrataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid model snapshot: {0}")]
    Snapshot(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl StrataError {
    /// Create a new `Snapshot` error for the node with id `node_id`.
    pub fn invalid_node(node_id: &str, reason: impl std::fmt::Display) -> Self {
        Self::Snapshot(format!("node `{node_id}`: {reason}"))
    }
}
