//! Sample dataset every store starts from.
//!
//! Timestamps are relative to `now` so the dashboard always looks recent.

use chrono::{DateTime, Duration, Utc};

use crate::integration::{Integration, IntegrationKind};
use crate::task::{Task, TaskPriority, TaskStatus};

/// Suggestions handed out by position when generating advice.
///
/// Order matters: task `i` receives `SUGGESTION_CANDIDATES[i % 4]`.
pub const SUGGESTION_CANDIDATES: [&str; 4] = [
    "Consider batching similar GitHub reviews to improve focus.",
    "Schedule dedicated time blocks for deep work on high-priority tasks.",
    "Set up automated reminders for upcoming deadlines.",
    "Group related Slack discussions into focused time periods.",
];

/// Returns the seeded integrations.
pub fn seed_integrations(now: DateTime<Utc>) -> Vec<Integration> {
    vec![
        Integration::new("github", "GitHub", IntegrationKind::SourceControl, "🐙")
            .connected_at(now - Duration::minutes(5))
            .with_tasks_count(8),
        Integration::new("slack", "Slack", IntegrationKind::Messaging, "💬")
            .connected_at(now - Duration::minutes(2))
            .with_tasks_count(12),
        Integration::new("notion", "Notion", IntegrationKind::Notes, "📝"),
        Integration::new("calendar", "Google Calendar", IntegrationKind::Calendar, "📅")
            .connected_at(now - Duration::minutes(15))
            .with_tasks_count(5),
    ]
}

/// Returns the seeded tasks, in display order.
pub fn seed_tasks(now: DateTime<Utc>) -> Vec<Task> {
    vec![
        Task::builder(
            "1",
            "Review PR #234: Authentication System",
            TaskPriority::High,
            "GitHub",
        )
        .description("Code review needed for new authentication implementation")
        .due(now + Duration::days(2))
        .suggestion(
            "This PR involves security-critical changes. Consider scheduling a team review meeting.",
        )
        .build(),
        Task::builder("2", "Team Standup Follow-up", TaskPriority::Medium, "Slack")
            .description("Address blockers discussed in morning standup")
            .due(now + Duration::days(1))
            .status(TaskStatus::InProgress)
            .build(),
        Task::builder("3", "Q1 Planning Meeting", TaskPriority::High, "Google Calendar")
            .description("Quarterly planning and goal setting session")
            .due(now + Duration::days(3))
            .suggestion("Prepare agenda items and previous quarter metrics before this meeting.")
            .build(),
        Task::builder("4", "Bug Fix: Mobile Navigation", TaskPriority::Medium, "GitHub")
            .description("Fix responsive navigation issues on mobile devices")
            .build(),
        Task::builder("5", "Client Demo Preparation", TaskPriority::High, "Slack")
            .description("Prepare demo materials for client presentation")
            .due(now + Duration::days(5))
            .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_integrations_respect_sync_invariant() {
        for integration in seed_integrations(Utc::now()) {
            if !integration.connected {
                assert!(integration.last_sync.is_none(), "{}", integration.id);
            }
        }
    }

    #[test]
    fn test_seed_notion_starts_disconnected() {
        let integrations = seed_integrations(Utc::now());
        let notion = integrations.iter().find(|i| i.id == "notion").unwrap();
        assert!(!notion.connected);
        assert_eq!(notion.tasks_count, 0);
    }

    #[test]
    fn test_seed_tasks_order_and_unique_ids() {
        let tasks = seed_tasks(Utc::now());
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);

        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_seed_suggestions_only_on_first_and_third() {
        let tasks = seed_tasks(Utc::now());
        let with: Vec<&str> = tasks
            .iter()
            .filter(|t| t.has_suggestion())
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(with, vec!["1", "3"]);
    }

    #[test]
    fn test_seed_due_dates_relative_to_now() {
        let now = Utc::now();
        let tasks = seed_tasks(now);
        assert_eq!(tasks[0].due_date, Some(now + Duration::days(2)));
        assert!(tasks[3].due_date.is_none());
    }
}
