//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `WsnError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::NodeId;

/// The top-level error type for `wsn-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum WsnError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failure timeline for {node} is invalid: {reason}")]
    Timeline { node: NodeId, reason: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `wsn-*` crates.
pub type WsnResult<T> = Result<T, WsnError>;
