//! Dashboard derivations.
//!
//! Everything here is a pure function of a snapshot and a reference time,
//! so the dashboard can be rendered (and tested) without a running store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use flowdeck_models::{Integration, Task, TaskPriority, TaskStatus};

/// How many deadlines the dashboard lists.
pub const UPCOMING_LIMIT: usize = 4;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Headline counters at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub connected_services: usize,
    pub total_services: usize,
    /// High priority and not yet completed.
    pub high_priority_open: usize,
    pub completed: usize,
    pub overdue: usize,
}

impl DashboardStats {
    pub fn compute(integrations: &[Integration], tasks: &[Task], now: DateTime<Utc>) -> Self {
        Self {
            connected_services: integrations.iter().filter(|i| i.connected).count(),
            total_services: integrations.len(),
            high_priority_open: tasks
                .iter()
                .filter(|t| t.priority == TaskPriority::High && !t.status.is_done())
                .count(),
            completed: tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count(),
            overdue: tasks.iter().filter(|t| t.is_overdue(now)).count(),
        }
    }
}

/// One row of the "recent activity" panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncActivity {
    pub name: String,
    pub icon: String,
    pub tasks_count: u32,
    pub last_sync: Option<DateTime<Utc>>,
}

impl SyncActivity {
    /// Last sync as local wall-clock time, or "Never".
    pub fn last_sync_label(&self) -> String {
        match self.last_sync {
            Some(at) => at.with_timezone(&chrono::Local).format("%H:%M:%S").to_string(),
            None => "Never".to_string(),
        }
    }
}

/// Connected integrations in collection order.
pub fn recent_activity(integrations: &[Integration]) -> Vec<SyncActivity> {
    integrations
        .iter()
        .filter(|i| i.connected)
        .map(|i| SyncActivity {
            name: i.name.clone(),
            icon: i.icon.clone(),
            tasks_count: i.tasks_count,
            last_sync: i.last_sync,
        })
        .collect()
}

/// How soon a deadline falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "days")]
pub enum DueIn {
    Overdue,
    /// Whole days remaining, rounded up.
    Days(i64),
}

impl DueIn {
    pub fn between(due: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if due < now {
            return DueIn::Overdue;
        }
        let millis = (due - now).num_milliseconds();
        // ceil for non-negative values
        DueIn::Days((millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY)
    }

    pub fn label(&self) -> String {
        match self {
            DueIn::Overdue => "Overdue".to_string(),
            DueIn::Days(days) => format!("{}d", days),
        }
    }
}

/// One row of the "upcoming deadlines" panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deadline {
    pub title: String,
    pub source: String,
    pub priority: TaskPriority,
    pub due_date: DateTime<Utc>,
    pub due_in: DueIn,
}

/// Open tasks with a due date, soonest first, capped at [`UPCOMING_LIMIT`].
pub fn upcoming_deadlines(tasks: &[Task], now: DateTime<Utc>) -> Vec<Deadline> {
    let mut dated: Vec<(&Task, DateTime<Utc>)> = tasks
        .iter()
        .filter(|t| !t.status.is_done())
        .filter_map(|t| t.due_date.map(|due| (t, due)))
        .collect();

    // stable, so equal due dates keep collection order
    dated.sort_by_key(|(_, due)| *due);

    dated
        .into_iter()
        .take(UPCOMING_LIMIT)
        .map(|(task, due)| Deadline {
            title: task.title.clone(),
            source: task.source.clone(),
            priority: task.priority,
            due_date: due,
            due_in: DueIn::between(due, now),
        })
        .collect()
}

/// The whole dashboard view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub activity: Vec<SyncActivity>,
    pub deadlines: Vec<Deadline>,
}

impl Dashboard {
    pub fn build(integrations: &[Integration], tasks: &[Task], now: DateTime<Utc>) -> Self {
        Self {
            stats: DashboardStats::compute(integrations, tasks, now),
            activity: recent_activity(integrations),
            deadlines: upcoming_deadlines(tasks, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use flowdeck_models::{seed_integrations, seed_tasks};

    #[test]
    fn test_stats_on_seed() {
        let now = Utc::now();
        let stats = DashboardStats::compute(&seed_integrations(now), &seed_tasks(now), now);

        assert_eq!(stats.connected_services, 3);
        assert_eq!(stats.total_services, 4);
        assert_eq!(stats.high_priority_open, 3);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.overdue, 0);
    }

    #[test]
    fn test_stats_after_completion_and_time_passing() {
        let seeded_at = Utc::now();
        let mut tasks = seed_tasks(seeded_at);
        tasks[0].status = TaskStatus::Completed;

        let later = seeded_at + Duration::days(4);
        let stats = DashboardStats::compute(&[], &tasks, later);

        assert_eq!(stats.completed, 1);
        assert_eq!(stats.high_priority_open, 2);
        // tasks 2 (1d) and 3 (3d) are past due; task 1 is done
        assert_eq!(stats.overdue, 2);
    }

    #[test]
    fn test_recent_activity_only_connected() {
        let activity = recent_activity(&seed_integrations(Utc::now()));
        let names: Vec<&str> = activity.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["GitHub", "Slack", "Google Calendar"]);
    }

    #[test]
    fn test_never_label() {
        let row = SyncActivity {
            name: "Notion".to_string(),
            icon: "📝".to_string(),
            tasks_count: 0,
            last_sync: None,
        };
        assert_eq!(row.last_sync_label(), "Never");
    }

    #[test]
    fn test_due_in_rounds_up() {
        let now = Utc::now();
        assert_eq!(DueIn::between(now + Duration::hours(1), now), DueIn::Days(1));
        assert_eq!(DueIn::between(now + Duration::days(2), now), DueIn::Days(2));
        assert_eq!(
            DueIn::between(now + Duration::days(2) + Duration::seconds(1), now),
            DueIn::Days(3)
        );
        assert_eq!(DueIn::between(now, now), DueIn::Days(0));
        assert_eq!(DueIn::between(now - Duration::seconds(1), now), DueIn::Overdue);
        assert_eq!(DueIn::Overdue.label(), "Overdue");
        assert_eq!(DueIn::Days(3).label(), "3d");
    }

    #[test]
    fn test_upcoming_deadlines_sorted_and_capped() {
        let now = Utc::now();
        let deadlines = upcoming_deadlines(&seed_tasks(now), now);

        let titles: Vec<&str> = deadlines.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Team Standup Follow-up",
                "Review PR #234: Authentication System",
                "Q1 Planning Meeting",
                "Client Demo Preparation",
            ]
        );
        assert_eq!(deadlines[0].due_in, DueIn::Days(1));
    }

    #[test]
    fn test_upcoming_deadlines_skip_completed() {
        let now = Utc::now();
        let mut tasks = seed_tasks(now);
        tasks[1].status = TaskStatus::Completed;

        let deadlines = upcoming_deadlines(&tasks, now);

        assert_eq!(deadlines.len(), 3);
        assert!(deadlines.iter().all(|d| d.title != "Team Standup Follow-up"));
    }

    #[test]
    fn test_dashboard_serializes() {
        let now = Utc::now();
        let dashboard = Dashboard::build(&seed_integrations(now), &seed_tasks(now), now);
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["stats"]["connectedServices"], 3);
        assert_eq!(json["deadlines"].as_array().unwrap().len(), 4);
    }
}
