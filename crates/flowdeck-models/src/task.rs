//! Task types for Flowdeck.
//!
//! Tasks are units of work attributed to a source integration. They are
//! seeded once and then only changed through partial updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::ids::TaskId;

/// Priority of a task. Ordered so that `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "h" => Ok(TaskPriority::High),
            "medium" | "med" | "m" => Ok(TaskPriority::Medium),
            "low" | "l" => Ok(TaskPriority::Low),
            other => Err(ModelError::InvalidPriority(other.to_string())),
        }
    }
}

/// Status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// All statuses, in workflow order.
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Returns true for completed tasks.
    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" | "in_progress" | "inprogress" | "active" => Ok(TaskStatus::InProgress),
            "completed" | "complete" | "done" => Ok(TaskStatus::Completed),
            other => Err(ModelError::InvalidStatus(other.to_string())),
        }
    }
}

/// A unit of work, real or synthetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier. Never changes after creation.
    pub id: TaskId,

    /// Short title.
    pub title: String,

    /// Free-text description.
    pub description: String,

    /// Priority.
    pub priority: TaskPriority,

    /// Label of the integration the task came from.
    pub source: String,

    /// When the task is due.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    /// Current status.
    pub status: TaskStatus,

    /// Advisory suggestion attached to the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_suggestion: Option<String>,
}

impl Task {
    /// Creates a pending task with no due date and no suggestion.
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        priority: TaskPriority,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            priority,
            source: source.into(),
            due_date: None,
            status: TaskStatus::Pending,
            ai_suggestion: None,
        }
    }

    /// Returns true if the task has a non-empty suggestion attached.
    pub fn has_suggestion(&self) -> bool {
        self.ai_suggestion.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns true if the task is past due and not completed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => due < now && !self.status.is_done(),
            None => false,
        }
    }

    /// Merges a partial update into this task.
    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(source) = &update.source {
            self.source = source.clone();
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(suggestion) = &update.ai_suggestion {
            self.ai_suggestion = suggestion.clone();
        }
    }
}

/// A partial set of task fields to overwrite.
///
/// Every field except the id can be set. `None` leaves the field untouched.
/// For the optional fields, `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub source: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub status: Option<TaskStatus>,
    pub ai_suggestion: Option<Option<String>>,
}

impl TaskUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for an update that only changes the status.
    pub fn status(status: TaskStatus) -> Self {
        Self::new().with_status(status)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.ai_suggestion = Some(suggestion);
        self
    }

    /// Returns true if the update sets no fields.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
