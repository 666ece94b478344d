//! Error types for parsing model values from user input.

use thiserror::Error;

/// Errors produced when parsing model enums from strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Unknown task status.
    #[error("invalid task status: {0} (expected pending, in-progress or completed)")]
    InvalidStatus(String),

    /// Unknown task priority.
    #[error("invalid task priority: {0} (expected high, medium or low)")]
    InvalidPriority(String),

    /// Unknown integration kind.
    #[error("invalid integration kind: {0}")]
    InvalidKind(String),

    /// Unknown task list view.
    #[error("invalid task view: {0} (expected all, high, pending or completed)")]
    InvalidView(String),
}

/// Result type alias for model parsing.
pub type Result<T> = std::result::Result<T, ModelError>;
