//! Core data models for Flowdeck.
//!
//! This crate provides the record types shared by every Flowdeck crate:
//! integrations, tasks, partial task updates, and the sample dataset the
//! store is seeded with.

pub mod builders;
pub mod error;
pub mod ids;
pub mod integration;
pub mod seed;
pub mod task;

// Re-export main types
pub use builders::TaskBuilder;
pub use error::{ModelError, Result};
pub use ids::{IntegrationId, TaskId};
pub use integration::{Integration, IntegrationKind};
pub use seed::{seed_integrations, seed_tasks, SUGGESTION_CANDIDATES};
pub use task::{Task, TaskPriority, TaskStatus, TaskUpdate};
