//! Async runtime for Flowdeck.
//!
//! This crate owns the lifetime of the shared store and everything that
//! happens on a timer:
//! - `DashboardRuntime` - creates the store, hands it out while running,
//!   tears the timers down on shutdown
//! - `SyncRefresher` - advances connected integrations' last sync on an
//!   interval
//! - simulated delays for the loading screen, connecting an integration,
//!   and generating insights
//!
//! # Example
//!
//! ```no_run
//! use flowdeck_runtime::{DashboardRuntime, RuntimeConfig, RuntimeEvent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut runtime = DashboardRuntime::new(RuntimeConfig::default());
//!     let mut events = runtime.subscribe();
//!
//!     runtime.start().await?;
//!
//!     runtime.connect("notion").await?;
//!     while let Ok(event) = events.recv().await {
//!         if let RuntimeEvent::ConnectFinished { integration } = event {
//!             println!("connected {}", integration);
//!             break;
//!         }
//!     }
//!
//!     runtime.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod refresher;
pub mod runtime;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use event::RuntimeEvent;
pub use refresher::SyncRefresher;
pub use runtime::DashboardRuntime;
