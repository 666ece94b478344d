//! Flowdeck CLI entry point.

use std::path::Path;

use clap::Parser;
use tokio::runtime::Runtime;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use flowdeck_cli::cli::{Cli, Commands};
use flowdeck_cli::commands;
use flowdeck_cli::repl::Repl;
use flowdeck_runtime::DashboardRuntime;

fn main() {
    // Load .env.local if it exists (for FLOWDECK_* overrides)
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> commands::Result<()> {
    let rt = Runtime::new()?;
    let _guard = rt.enter();

    let state_dir = cli.state_dir();
    let mut dashboard = DashboardRuntime::new(cli.runtime_config());
    debug!(config = ?dashboard.config(), state_dir = %state_dir.display(), "starting");
    rt.block_on(dashboard.start())?;

    let result = match cli.command {
        Some(Commands::Repl) | None => run_repl(&rt, &dashboard, &state_dir),
        Some(cmd) => commands::execute(cmd, &dashboard),
    };

    rt.block_on(dashboard.shutdown())?;
    result
}

fn run_repl(rt: &Runtime, dashboard: &DashboardRuntime, state_dir: &Path) -> commands::Result<()> {
    let mut repl = Repl::new(dashboard, rt.handle().clone(), state_dir)?;
    repl.run()?;
    Ok(())
}
