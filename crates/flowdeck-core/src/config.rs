//! Shared configuration for Flowdeck.
//!
//! Flowdeck keeps no data on disk; the state directory only holds the REPL
//! history.
//!
//! ```text
//! ~/.flowdeck/
//! └── history.txt   # REPL history
//! ```
//!
//! # Environment Variables
//!
//! - `FLOWDECK_STATE_DIR`: Override the state directory
//! - `FLOWDECK_REFRESH_SECS`: Override the sync refresh interval

use std::path::{Path, PathBuf};

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "FLOWDECK_STATE_DIR";

/// Environment variable for the sync refresh interval, in seconds.
pub const REFRESH_SECS_ENV: &str = "FLOWDECK_REFRESH_SECS";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".flowdeck";

const HISTORY_FILE: &str = "history.txt";

/// Get the Flowdeck state directory.
///
/// The state directory is determined by:
/// 1. `FLOWDECK_STATE_DIR` environment variable if set
/// 2. `~/.flowdeck` if home directory is available
/// 3. `.flowdeck` in current directory as fallback
pub fn state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_state_dir())
}

/// The home-based default, ignoring the environment.
pub fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(DEFAULT_STATE_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
}

/// Path of the REPL history file inside `state_dir`.
pub fn history_file(state_dir: &Path) -> PathBuf {
    state_dir.join(HISTORY_FILE)
}
