//! Task filtering for the task list view.

use std::fmt;
use std::str::FromStr;

use flowdeck_models::{ModelError, Task, TaskPriority, TaskStatus};

/// Preset filters offered by the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskView {
    #[default]
    All,
    /// High priority, any status.
    HighPriority,
    Pending,
    Completed,
}

impl TaskView {
    pub const ALL: [TaskView; 4] = [
        TaskView::All,
        TaskView::HighPriority,
        TaskView::Pending,
        TaskView::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskView::All => "all",
            TaskView::HighPriority => "high",
            TaskView::Pending => "pending",
            TaskView::Completed => "completed",
        }
    }

    /// Human label shown in the filter selector.
    pub fn label(&self) -> &'static str {
        match self {
            TaskView::All => "All Tasks",
            TaskView::HighPriority => "High Priority",
            TaskView::Pending => "Pending",
            TaskView::Completed => "Completed",
        }
    }

    fn admits(&self, task: &Task) -> bool {
        match self {
            TaskView::All => true,
            TaskView::HighPriority => task.priority == TaskPriority::High,
            TaskView::Pending => task.status == TaskStatus::Pending,
            TaskView::Completed => task.status == TaskStatus::Completed,
        }
    }
}

impl fmt::Display for TaskView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskView {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TaskView::All),
            "high" | "high-priority" => Ok(TaskView::HighPriority),
            "pending" => Ok(TaskView::Pending),
            "completed" | "done" => Ok(TaskView::Completed),
            other => Err(ModelError::InvalidView(other.to_string())),
        }
    }
}

/// Filter criteria for the task list.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Preset view.
    pub view: TaskView,
    /// Case-insensitive text matched against title and description.
    pub search: Option<String>,
}

impl TaskFilter {
    /// Creates a new filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the preset view.
    pub fn with_view(mut self, view: TaskView) -> Self {
        self.view = view;
        self
    }

    /// Sets the search text, matched as a plain substring. Whitespace is
    /// significant; only empty text matches everything.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.is_empty() {
            None
        } else {
            Some(search.to_lowercase())
        };
        self
    }

    /// Returns true if the task matches this filter.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(ref needle) = self.search {
            let in_title = task.title.to_lowercase().contains(needle.as_str());
            let in_description = task.description.to_lowercase().contains(needle.as_str());
            if !in_title && !in_description {
                return false;
            }
        }

        self.view.admits(task)
    }

    /// Returns the matching tasks in collection order.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use flowdeck_models::seed_tasks;

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let tasks = seed_tasks(Utc::now());
        assert_eq!(TaskFilter::new().apply(&tasks).len(), tasks.len());
    }

    #[test]
    fn test_high_priority_view() {
        let tasks = seed_tasks(Utc::now());
        let filter = TaskFilter::new().with_view(TaskView::HighPriority);
        assert_eq!(ids(&filter.apply(&tasks)), vec!["1", "3", "5"]);
    }

    #[test]
    fn test_pending_view_excludes_in_progress() {
        let tasks = seed_tasks(Utc::now());
        let filter = TaskFilter::new().with_view(TaskView::Pending);
        assert_eq!(ids(&filter.apply(&tasks)), vec!["1", "3", "4", "5"]);
    }

    #[test]
    fn test_completed_view_empty_on_seed() {
        let tasks = seed_tasks(Utc::now());
        let filter = TaskFilter::new().with_view(TaskView::Completed);
        assert!(filter.apply(&tasks).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let tasks = seed_tasks(Utc::now());

        let by_title = TaskFilter::new().with_search("PLANNING");
        assert_eq!(ids(&by_title.apply(&tasks)), vec!["3"]);

        let by_description = TaskFilter::new().with_search("responsive");
        assert_eq!(ids(&by_description.apply(&tasks)), vec!["4"]);
    }

    #[test]
    fn test_search_combined_with_view() {
        let tasks = seed_tasks(Utc::now());
        let filter = TaskFilter::new()
            .with_view(TaskView::HighPriority)
            .with_search("prepar");
        assert_eq!(ids(&filter.apply(&tasks)), vec!["5"]);
    }

    #[test]
    fn test_empty_search_matches_all() {
        let tasks = seed_tasks(Utc::now());
        let filter = TaskFilter::new().with_search("");
        assert!(filter.search.is_none());
        assert_eq!(filter.apply(&tasks).len(), tasks.len());
    }

    #[test]
    fn test_whitespace_search_is_literal() {
        let tasks = seed_tasks(Utc::now());

        // no seeded title or description has a double space
        let filter = TaskFilter::new().with_search("  ");
        assert!(filter.apply(&tasks).is_empty());

        let filter = TaskFilter::new().with_search(" ");
        assert_eq!(filter.apply(&tasks).len(), tasks.len());
    }

    #[test]
    fn test_view_from_str() {
        for view in TaskView::ALL {
            assert_eq!(view.as_str().parse::<TaskView>(), Ok(view));
        }
        assert!(matches!(
            "urgent".parse::<TaskView>(),
            Err(ModelError::InvalidView(_))
        ));
    }
}
