//! Insight cards and automation ideas.
//!
//! The cards are fixed copy, not computed from the data. The data-driven
//! parts of the insights view are [`TaskAnalysis`], the status counts, and
//! [`SuggestionCoverage`], which reports how many tasks already carry
//! advice.

use serde::Serialize;

use flowdeck_models::{Task, TaskPriority, TaskStatus};

/// A performance insight card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub title: &'static str,
    pub description: &'static str,
    pub suggestion: &'static str,
}

/// An automation opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Automation {
    pub title: &'static str,
    pub description: &'static str,
    pub potential: &'static str,
}

pub static INSIGHTS: &[Insight] = &[
    Insight {
        title: "Productivity Pattern",
        description: "You complete 67% more tasks in the morning (9-11 AM)",
        suggestion: "Schedule high-priority work during your peak hours",
    },
    Insight {
        title: "Task Distribution",
        description: "GitHub tasks take 40% longer than estimated",
        suggestion: "Add 1.4x buffer time for development tasks",
    },
    Insight {
        title: "Deadline Management",
        description: "You have 3 tasks due this week with high complexity",
        suggestion: "Consider rescheduling lower priority items",
    },
    Insight {
        title: "Focus Optimization",
        description: "Slack interruptions peak between 2-4 PM",
        suggestion: "Set \"Do Not Disturb\" during focused work blocks",
    },
];

pub static AUTOMATIONS: &[Automation] = &[
    Automation {
        title: "Auto-assign PR reviews",
        description: "Automatically assign code reviews based on expertise and availability",
        potential: "Save 2-3 hours/week",
    },
    Automation {
        title: "Meeting prep automation",
        description: "Generate agenda items from Slack discussions and GitHub activity",
        potential: "Save 30 min/meeting",
    },
    Automation {
        title: "Smart task prioritization",
        description: "Auto-prioritize tasks based on deadlines, dependencies, and impact",
        potential: "Improve delivery by 25%",
    },
];

/// How many tasks have a suggestion attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuggestionCoverage {
    pub with_suggestion: usize,
    pub total: usize,
}

impl SuggestionCoverage {
    pub fn of(tasks: &[Task]) -> Self {
        Self {
            with_suggestion: tasks.iter().filter(|t| t.has_suggestion()).count(),
            total: tasks.len(),
        }
    }

    /// True once every task has advice, i.e. generating again is a no-op.
    pub fn is_complete(&self) -> bool {
        self.with_suggestion == self.total
    }
}

/// Counts shown in the task analysis panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAnalysis {
    pub completed: usize,
    pub in_progress: usize,
    /// High priority and not yet completed.
    pub high_priority_open: usize,
}

impl TaskAnalysis {
    pub fn of(tasks: &[Task]) -> Self {
        Self {
            completed: tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count(),
            in_progress: tasks
                .iter()
                .filter(|t| t.status == TaskStatus::InProgress)
                .count(),
            high_priority_open: tasks
                .iter()
                .filter(|t| t.priority == TaskPriority::High && t.status != TaskStatus::Completed)
                .count(),
        }
    }
}
