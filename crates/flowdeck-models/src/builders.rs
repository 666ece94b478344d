//! Builder patterns for seeded records.

use chrono::{DateTime, Utc};

use crate::ids::TaskId;
use crate::task::{Task, TaskPriority, TaskStatus};

/// Builder for creating Task instances with a fluent API.
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    id: TaskId,
    title: String,
    priority: TaskPriority,
    source: String,
    description: String,
    due_date: Option<DateTime<Utc>>,
    status: TaskStatus,
    ai_suggestion: Option<String>,
}

impl TaskBuilder {
    /// Creates a new TaskBuilder with required fields.
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        priority: TaskPriority,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority,
            source: source.into(),
            description: String::new(),
            due_date: None,
            status: TaskStatus::Pending,
            ai_suggestion: None,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the due date.
    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the status (defaults to pending).
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Attaches an advisory suggestion.
    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.ai_suggestion = Some(suggestion.into());
        self
    }

    /// Builds the Task.
    pub fn build(self) -> Task {
        Task {
            id: self.id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            source: self.source,
            due_date: self.due_date,
            status: self.status,
            ai_suggestion: self.ai_suggestion,
        }
    }
}

impl Task {
    /// Creates a builder for a new task.
    pub fn builder(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        priority: TaskPriority,
        source: impl Into<String>,
    ) -> TaskBuilder {
        TaskBuilder::new(id, title, priority, source)
    }
}
