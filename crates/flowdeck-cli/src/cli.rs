//! Command-line interface definition using clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use flowdeck_core::{config, TaskView};
use flowdeck_runtime::RuntimeConfig;

/// Flowdeck - productivity dashboard over your connected tools
#[derive(Parser, Debug)]
#[command(name = "flowdeck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to state directory (holds REPL history)
    #[arg(short, long, env = config::STATE_DIR_ENV)]
    pub state_dir: Option<PathBuf>,

    /// Seconds between sync refreshes of connected integrations
    #[arg(long, env = config::REFRESH_SECS_ENV, default_value_t = 60)]
    pub refresh_secs: u64,

    /// Skip the simulated loading, connect and analysis delays
    #[arg(long)]
    pub no_delay: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show headline stats, sync activity and upcoming deadlines
    Dashboard {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List tasks
    Tasks {
        /// Preset view (all, high, pending, completed)
        #[arg(long, default_value = "all")]
        view: TaskView,

        /// Case-insensitive match on title or description
        #[arg(long)]
        search: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show insights and task suggestions
    Insights {
        /// Attach suggestions to tasks that have none first
        #[arg(short, long)]
        generate: bool,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List connected, available and upcoming integrations
    Integrations {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Start interactive REPL mode
    Repl,
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Cli {
    /// Returns the state directory path, using default if not specified.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(config::default_state_dir)
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Builds the runtime configuration from the flags.
    pub fn runtime_config(&self) -> RuntimeConfig {
        let config = RuntimeConfig::new()
            .with_refresh_interval(Duration::from_secs(self.refresh_secs.max(1)));
        if self.no_delay {
            config.without_delays()
        } else {
            config
        }
    }
}
