//! Error types for store operations.

use thiserror::Error;

/// Errors reported by the strict (`try_*`) store operations.
///
/// The regular operations never fail: an unknown id is a silent no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No integration with the given id.
    #[error("integration not found: {0}")]
    IntegrationNotFound(String),

    /// No task with the given id.
    #[error("task not found: {0}")]
    TaskNotFound(String),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
