//! In-memory productivity state for Flowdeck.
//!
//! This crate provides the `ProductivityStore`, the single owner of the
//! integrations and tasks collections:
//! - Snapshot reads that never observe a half-applied mutation
//! - Mutations that return the resulting snapshot
//! - Pub/sub change notifications using `mpsc` channels
//!
//! # Example
//!
//! ```
//! use flowdeck_models::{TaskStatus, TaskUpdate};
//! use flowdeck_store::{ProductivityStore, StoreChange};
//!
//! let store = ProductivityStore::new();
//! let changes = store.subscribe();
//!
//! store.update_task("4", &TaskUpdate::status(TaskStatus::Completed));
//!
//! match changes.recv().unwrap() {
//!     StoreChange::Tasks(tasks) => assert_eq!(tasks[3].status, TaskStatus::Completed),
//!     StoreChange::Integrations(_) => unreachable!(),
//! }
//! ```

pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{IntegrationSnapshot, ProductivityStore, StoreChange, StoreSnapshot, TaskSnapshot};
