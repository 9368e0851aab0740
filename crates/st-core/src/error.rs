//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::NodeId;

/// The top-level error type for `st-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("node {node} out of range for a field of {count} stars")]
    NodeOutOfRange { node: NodeId, count: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `st-core`.
pub type CoreResult<T> = Result<T, CoreError>;
