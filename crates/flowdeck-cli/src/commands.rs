//! Command handlers for CLI subcommands.

use chrono::Utc;
use tracing::{debug, info};

use flowdeck_core::{Dashboard, TaskFilter, TaskView};
use flowdeck_runtime::DashboardRuntime;

use crate::cli::{Commands, OutputFormat};
use crate::render;

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a one-shot CLI command against a started runtime.
///
/// `insights --generate` spawns the analysis timer, so this must run inside
/// a tokio runtime context.
pub fn execute(command: Commands, runtime: &DashboardRuntime) -> Result<()> {
    match command {
        Commands::Dashboard { format } => cmd_dashboard(runtime, format),
        Commands::Tasks {
            view,
            search,
            format,
        } => cmd_tasks(runtime, view, search.as_deref(), format),
        Commands::Insights { generate, format } => cmd_insights(runtime, generate, format),
        Commands::Integrations { format } => cmd_integrations(runtime, format),
        Commands::Repl => {
            // REPL is handled separately in main
            Ok(())
        }
    }
}

fn cmd_dashboard(runtime: &DashboardRuntime, format: OutputFormat) -> Result<()> {
    let snapshot = runtime.try_store()?.snapshot();
    let view = Dashboard::build(&snapshot.integrations, &snapshot.tasks, Utc::now());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Table => print!("{}", render::dashboard(&view)),
    }
    Ok(())
}

fn cmd_tasks(
    runtime: &DashboardRuntime,
    view: TaskView,
    search: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let tasks = runtime.try_store()?.tasks();

    let mut filter = TaskFilter::new().with_view(view);
    if let Some(search) = search {
        filter = filter.with_search(search);
    }
    let shown = filter.apply(&tasks);
    debug!(view = %view, shown = shown.len(), total = tasks.len(), "filtered tasks");

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
        OutputFormat::Table => print!("{}", render::task_table(&filter, &shown, tasks.len())),
    }
    Ok(())
}

fn cmd_insights(runtime: &DashboardRuntime, generate: bool, format: OutputFormat) -> Result<()> {
    let tasks = if generate {
        let tasks = runtime.generate_insights()?;
        info!(tasks = tasks.len(), "generated suggestions");
        tasks
    } else {
        runtime.try_store()?.tasks()
    };

    match format {
        OutputFormat::Json => println!("{}", render::insights_json(&tasks)?),
        OutputFormat::Table => print!("{}", render::insights(&tasks)),
    }
    Ok(())
}

fn cmd_integrations(runtime: &DashboardRuntime, format: OutputFormat) -> Result<()> {
    let integrations = runtime.try_store()?.integrations();

    match format {
        OutputFormat::Json => println!("{}", render::integrations_json(&integrations)?),
        OutputFormat::Table => print!("{}", render::integrations(&integrations)),
    }
    Ok(())
}
