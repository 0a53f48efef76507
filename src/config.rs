//! Configuration management for the sessionizer
//!
//! There is no configuration file: everything comes from environment
//! variables with sensible defaults, read once at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::tui::{LayoutConfig, Theme};

/// Directory name skipped during project discovery (dependency cache)
pub const DEPENDENCY_CACHE_DIR: &str = "node_modules";

/// Default maximum depth for project discovery
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Default startup command injected into freshly created sessions
pub const DEFAULT_STARTUP_COMMAND: &str = "nvim .";

const ENV_ROOTS: &str = "SESSIONIZER_ROOTS";
const ENV_MAX_DEPTH: &str = "SESSIONIZER_MAX_DEPTH";
const ENV_CLONE_ROOT: &str = "SESSIONIZER_CLONE_ROOT";
const ENV_STARTUP_COMMAND: &str = "SESSIONIZER_STARTUP_COMMAND";
const ENV_THEME: &str = "SESSIONIZER_THEME";
const ENV_TMUX: &str = "TMUX";

/// How long to wait for a new session to become controllable before
/// injecting the startup command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessProbe {
    /// Maximum number of `has-session` checks
    pub attempts: u32,
    /// Pause between checks
    pub interval: Duration,
}

impl Default for ReadinessProbe {
    fn default() -> Self {
        Self {
            attempts: 40,
            interval: Duration::from_millis(50),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Home directory, used for `~` display and default roots
    pub home: PathBuf,

    /// Whether we are running inside a tmux client
    pub inside_tmux: bool,

    /// Root directories scanned for projects
    pub search_roots: Vec<PathBuf>,

    /// Deepest directory level (relative to a root) listed as a project
    pub max_depth: usize,

    /// Directory names pruned from the scan (besides dot-directories)
    pub skip_dirs: Vec<String>,

    /// Where remote repositories get cloned
    pub clone_root: PathBuf,

    /// Command typed into new sessions once they are ready (None disables)
    pub startup_command: Option<String>,

    /// Readiness probe used before injecting the startup command
    pub readiness: ReadinessProbe,

    /// Colors used by the picker
    pub theme: Theme,

    /// Picker dimensions
    pub layout: LayoutConfig,
}

impl Config {
    /// Build a configuration with defaults rooted at `home`
    pub fn with_home(home: PathBuf) -> Self {
        Self {
            search_roots: vec![home.join("dev"), home.join("personal")],
            max_depth: DEFAULT_MAX_DEPTH,
            skip_dirs: vec![DEPENDENCY_CACHE_DIR.to_string()],
            clone_root: home.join("dev").join("clones"),
            startup_command: Some(DEFAULT_STARTUP_COMMAND.to_string()),
            readiness: ReadinessProbe::default(),
            theme: Theme::default(),
            layout: LayoutConfig::default(),
            inside_tmux: false,
            home,
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Invalid values are logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = dirs::home_dir().unwrap_or_else(|| {
            tracing::warn!("Could not determine home directory, using current directory");
            PathBuf::from(".")
        });
        let mut config = Self::with_home(home);

        config.inside_tmux = lookup(ENV_TMUX).is_some();

        if let Some(roots) = lookup(ENV_ROOTS) {
            let parsed: Vec<PathBuf> = roots
                .split(':')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(expand_path)
                .collect();
            if parsed.is_empty() {
                tracing::warn!("{} is empty, using default roots", ENV_ROOTS);
            } else {
                config.search_roots = parsed;
            }
        }

        if let Some(depth) = lookup(ENV_MAX_DEPTH) {
            match depth.trim().parse::<usize>() {
                Ok(d) if d >= 1 => config.max_depth = d,
                _ => tracing::warn!(
                    "Invalid {}={:?}, using {}",
                    ENV_MAX_DEPTH,
                    depth,
                    DEFAULT_MAX_DEPTH
                ),
            }
        }

        if let Some(root) = lookup(ENV_CLONE_ROOT) {
            if !root.trim().is_empty() {
                config.clone_root = expand_path(root.trim());
            }
        }

        if let Some(command) = lookup(ENV_STARTUP_COMMAND) {
            let command = command.trim();
            config.startup_command = if command.is_empty() {
                None
            } else {
                Some(command.to_string())
            };
        }

        if let Some(preset) = lookup(ENV_THEME) {
            match Theme::from_preset(&preset) {
                Some(theme) => config.theme = theme,
                None => tracing::warn!("Unknown theme preset {:?}, using dark", preset),
            }
        }

        config
    }

    /// Human-readable list of the search roots (used in the empty-catalog error)
    pub fn roots_display(&self) -> String {
        self.search_roots
            .iter()
            .map(|r| crate::project::display_path(r, &self.home))
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

/// Expand a leading `~` in a configured path
fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

/// Get the base application directory (~/.sessionizer)
/// Falls back to ./.sessionizer if home directory cannot be determined
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".sessionizer"))
        .unwrap_or_else(|| PathBuf::from(".sessionizer"))
}

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    app_dir().join("logs")
}

/// Ensure the application directories exist
pub fn ensure_directories(app_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(app_dir.join("logs")).context("Failed to create logs directory")?;
    Ok(())
}
