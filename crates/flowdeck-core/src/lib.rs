//! View logic for Flowdeck.
//!
//! The store hands out whole snapshots and leaves all filtering, counting
//! and sorting to its consumers. This crate holds those consumer-side
//! derivations so every front end computes them the same way:
//! - `dashboard` - headline stats, sync activity, upcoming deadlines
//! - `filter` - task list presets and search
//! - `insights` - fixed insight cards and suggestion coverage
//! - `catalog` - connected/available split and upcoming integrations
//! - `config` - state directory resolution

pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod filter;
pub mod insights;

pub use catalog::{connect_prompt, IntegrationPartition, UpcomingIntegration, UPCOMING_INTEGRATIONS};
pub use dashboard::{
    recent_activity, upcoming_deadlines, Dashboard, DashboardStats, Deadline, DueIn, SyncActivity,
};
pub use filter::{TaskFilter, TaskView};
pub use insights::{Automation, Insight, SuggestionCoverage, TaskAnalysis, AUTOMATIONS, INSIGHTS};
