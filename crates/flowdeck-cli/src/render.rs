//! Text and JSON rendering for the dashboard views.
//!
//! Every function here takes a snapshot and returns a `String`, so one-shot
//! commands and the REPL print the same output.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use flowdeck_core::{
    connect_prompt, Automation, Dashboard, Insight, IntegrationPartition, SuggestionCoverage,
    TaskAnalysis, TaskFilter, UpcomingIntegration, AUTOMATIONS, INSIGHTS, UPCOMING_INTEGRATIONS,
};
use flowdeck_models::{Integration, Task};

const TITLE_WIDTH: usize = 32;

/// Renders the dashboard panels.
pub fn dashboard(view: &Dashboard) -> String {
    let stats = &view.stats;
    let mut out = String::new();

    let _ = writeln!(out, "Dashboard");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  Connected services:   {}/{}",
        stats.connected_services, stats.total_services
    );
    let _ = writeln!(out, "  High priority open:   {}", stats.high_priority_open);
    let _ = writeln!(out, "  Completed:            {}", stats.completed);
    let _ = writeln!(out, "  Overdue:              {}", stats.overdue);
    let _ = writeln!(out);

    let _ = writeln!(out, "Recent Activity");
    if view.activity.is_empty() {
        let _ = writeln!(out, "  No connected services.");
    }
    for row in &view.activity {
        let _ = writeln!(
            out,
            "  {} {:<10} {:>4} items   last sync {}",
            row.icon,
            row.name,
            row.tasks_count,
            row.last_sync_label()
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Upcoming Deadlines");
    if view.deadlines.is_empty() {
        let _ = writeln!(out, "  Nothing due.");
    }
    for deadline in &view.deadlines {
        let _ = writeln!(
            out,
            "  {:<w$} {:<8} {:<7} {}",
            truncate(&deadline.title, TITLE_WIDTH),
            deadline.source,
            deadline.priority.as_str(),
            deadline.due_in.label(),
            w = TITLE_WIDTH
        );
    }

    out
}

/// Renders a filtered task list as a table.
pub fn task_table(filter: &TaskFilter, shown: &[&Task], total: usize) -> String {
    let mut out = String::new();

    let _ = write!(out, "{}: {} of {} tasks", filter.view.label(), shown.len(), total);
    if let Some(search) = &filter.search {
        let _ = write!(out, " matching '{}'", search);
    }
    let _ = writeln!(out);

    if shown.is_empty() {
        let _ = writeln!(out, "No tasks match.");
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<4} {:<w$} {:<8} {:<12} {:<8} DUE",
        "ID",
        "TITLE",
        "PRIORITY",
        "STATUS",
        "SOURCE",
        w = TITLE_WIDTH
    );
    let _ = writeln!(out, "{}", "-".repeat(4 + TITLE_WIDTH + 8 + 12 + 8 + 16));

    for task in shown {
        let _ = writeln!(
            out,
            "{:<4} {:<w$} {:<8} {:<12} {:<8} {}",
            task.id.as_str(),
            truncate(&task.title, TITLE_WIDTH),
            task.priority.as_str(),
            task.status.as_str(),
            task.source,
            due_date_label(task.due_date),
            w = TITLE_WIDTH
        );
    }

    out
}

/// Renders the insight cards, automation ideas, task analysis and per-task
/// suggestions.
pub fn insights(tasks: &[Task]) -> String {
    let coverage = SuggestionCoverage::of(tasks);
    let analysis = TaskAnalysis::of(tasks);
    let mut out = String::new();

    let _ = writeln!(out, "Performance Insights");
    for insight in INSIGHTS {
        let _ = writeln!(out, "  {}", insight.title);
        let _ = writeln!(out, "    {}", insight.description);
        let _ = writeln!(out, "    -> {}", insight.suggestion);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Automation Opportunities");
    for automation in AUTOMATIONS {
        let _ = writeln!(out, "  {} ({})", automation.title, automation.potential);
        let _ = writeln!(out, "    {}", automation.description);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Task Analysis");
    let _ = writeln!(out, "  Completed:            {}", analysis.completed);
    let _ = writeln!(out, "  In progress:          {}", analysis.in_progress);
    let _ = writeln!(out, "  High priority open:   {}", analysis.high_priority_open);
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Task Suggestions ({}/{} tasks covered)",
        coverage.with_suggestion, coverage.total
    );
    for task in tasks.iter().filter(|t| t.has_suggestion()) {
        let _ = writeln!(out, "  [{}] {}", task.id, task.title);
        let _ = writeln!(out, "    {}", task.ai_suggestion.as_deref().unwrap_or_default());
    }
    if !coverage.is_complete() {
        let _ = writeln!(out, "  Run /generate to suggest next steps for the rest.");
    }

    out
}

/// Renders connected, available and upcoming integrations.
pub fn integrations(integrations: &[Integration]) -> String {
    let partition = IntegrationPartition::of(integrations);
    let mut out = String::new();

    let _ = writeln!(out, "Connected ({})", partition.connected.len());
    if partition.connected.is_empty() {
        let _ = writeln!(out, "  None.");
    }
    for integration in &partition.connected {
        let _ = writeln!(
            out,
            "  {} {:<8} {:<10} {:>4} items   last sync {}",
            integration.icon,
            integration.id.as_str(),
            integration.name,
            integration.tasks_count,
            sync_time_label(integration.last_sync)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Available ({})", partition.available.len());
    for integration in &partition.available {
        let _ = writeln!(
            out,
            "  {} {:<8} {}",
            integration.icon,
            integration.id.as_str(),
            connect_prompt(integration)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Coming Soon");
    for upcoming in UPCOMING_INTEGRATIONS {
        let _ = writeln!(
            out,
            "  {} {:<8} {}",
            upcoming.icon, upcoming.name, upcoming.description
        );
    }

    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InsightsJson<'a> {
    analysis: TaskAnalysis,
    coverage: SuggestionCoverage,
    insights: &'static [Insight],
    automations: &'static [Automation],
    suggestions: Vec<&'a Task>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IntegrationsJson<'a> {
    connected: Vec<&'a Integration>,
    available: Vec<&'a Integration>,
    upcoming: &'static [UpcomingIntegration],
}

/// JSON form of [`insights`].
pub fn insights_json(tasks: &[Task]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&InsightsJson {
        analysis: TaskAnalysis::of(tasks),
        coverage: SuggestionCoverage::of(tasks),
        insights: INSIGHTS,
        automations: AUTOMATIONS,
        suggestions: tasks.iter().filter(|t| t.has_suggestion()).collect(),
    })
}

/// JSON form of [`integrations`].
pub fn integrations_json(integrations: &[Integration]) -> serde_json::Result<String> {
    let partition = IntegrationPartition::of(integrations);
    serde_json::to_string_pretty(&IntegrationsJson {
        connected: partition.connected,
        available: partition.available,
        upcoming: UPCOMING_INTEGRATIONS,
    })
}

fn due_date_label(due: Option<DateTime<Utc>>) -> String {
    match due {
        Some(at) => at.with_timezone(&Local).format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

fn sync_time_label(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => "Never".to_string(),
    }
}

/// Truncates a string to the given number of characters, adding "..." if
/// truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
