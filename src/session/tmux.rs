//! Thin client over the `tmux` command line
//!
//! Each method is one tmux invocation. Output formats are requested
//! explicitly with `-F` and parsed here.

use std::path::Path;
use std::sync::Arc;

use crate::process::{command_line, CommandOutput, CommandRunner};

use super::SessionError;

const TMUX: &str = "tmux";
const SESSION_FORMAT: &str = "#{session_name}:#{session_attached}:#{session_windows}";
const WINDOW_FORMAT: &str = "#{window_index}:#{window_active}:#{window_name}";
const PANE_PATH_FORMAT: &str = "#{pane_current_path}";

/// One line of `list-sessions`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// Session name
    pub name: String,
    /// Whether any client is attached
    pub attached: bool,
    /// Window count, as printed by tmux
    pub windows: String,
}

/// One line of `list-windows`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    /// Window index within its session
    pub index: String,
    /// Window name
    pub name: String,
    /// Whether this is the session's current window
    pub active: bool,
}

/// tmux command wrapper
pub struct Tmux<R> {
    runner: Arc<R>,
}

impl<R> Clone for Tmux<R> {
    fn clone(&self) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
        }
    }
}

impl<R: CommandRunner> Tmux<R> {
    /// Create a client that runs commands through `runner`
    pub fn new(runner: Arc<R>) -> Self {
        Self { runner }
    }

    /// List live sessions
    ///
    /// Any failure (most commonly: no server running) yields an empty list.
    pub fn list_sessions(&self) -> Vec<SessionInfo> {
        match self.run(&["list-sessions", "-F", SESSION_FORMAT]) {
            Ok(output) => output.stdout.lines().filter_map(parse_session_line).collect(),
            Err(e) => {
                tracing::debug!("No sessions listed: {}", e);
                Vec::new()
            }
        }
    }

    /// List the windows of one session
    pub fn list_windows(&self, session: &str) -> Result<Vec<WindowInfo>, SessionError> {
        let output = self.run(&["list-windows", "-t", session, "-F", WINDOW_FORMAT])?;
        Ok(output.stdout.lines().filter_map(parse_window_line).collect())
    }

    /// Current directory of the active pane in `session:window`
    pub fn pane_current_path(&self, session: &str, window: &str) -> Result<String, SessionError> {
        let target = format!("{}:{}", session, window);
        let output = self.run(&["display-message", "-p", "-t", &target, PANE_PATH_FORMAT])?;
        Ok(output.stdout.trim().to_string())
    }

    /// Whether a session with exactly this name exists
    pub fn has_session(&self, name: &str) -> bool {
        self.run(&["has-session", "-t", &exact(name)]).is_ok()
    }

    /// Whether a tmux server process is running
    pub fn server_running(&self) -> bool {
        let args = ["-x".to_string(), TMUX.to_string()];
        self.runner
            .output("pgrep", &args)
            .map(|o| o.success())
            .unwrap_or(false)
    }

    /// Create a detached session
    pub fn new_session_detached(&self, name: &str, cwd: Option<&Path>) -> Result<(), SessionError> {
        let args = new_session_args(name, cwd, true);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&args).map(|_| ())
    }

    /// Create a session attached to the controlling terminal; blocks until detach
    pub fn new_session_attached(&self, name: &str, cwd: Option<&Path>) -> Result<(), SessionError> {
        let args = new_session_args(name, cwd, false);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_interactive(&args)
    }

    /// Point the current client at another session
    pub fn switch_client(&self, name: &str) -> Result<(), SessionError> {
        self.run(&["switch-client", "-t", &exact(name)]).map(|_| ())
    }

    /// Attach this terminal to a session; blocks until detach
    pub fn attach_session(&self, name: &str) -> Result<(), SessionError> {
        self.run_interactive(&["attach-session", "-t", &exact(name)])
    }

    /// Kill a session
    pub fn kill_session(&self, name: &str) -> Result<(), SessionError> {
        self.run(&["kill-session", "-t", &exact(name)]).map(|_| ())
    }

    /// Rename a session
    pub fn rename_session(&self, old: &str, new: &str) -> Result<(), SessionError> {
        self.run(&["rename-session", "-t", &exact(old), new]).map(|_| ())
    }

    /// Type `keys` into a session's active pane, followed by Enter
    pub fn send_keys(&self, target: &str, keys: &str) -> Result<(), SessionError> {
        self.run(&["send-keys", "-t", target, keys, "Enter"]).map(|_| ())
    }

    fn run(&self, args: &[&str]) -> Result<CommandOutput, SessionError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let output = self
            .runner
            .output(TMUX, &args)
            .map_err(|source| SessionError::Spawn {
                command: command_line(TMUX, &args),
                source,
            })?;
        check(TMUX, &args, output)
    }

    fn run_interactive(&self, args: &[&str]) -> Result<(), SessionError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let output = self
            .runner
            .interactive(TMUX, &args)
            .map_err(|source| SessionError::Spawn {
                command: command_line(TMUX, &args),
                source,
            })?;
        check(TMUX, &args, output).map(|_| ())
    }
}

/// Turn a non-zero exit into [`SessionError::CommandFailed`]
pub(crate) fn check(
    program: &str,
    args: &[String],
    output: CommandOutput,
) -> Result<CommandOutput, SessionError> {
    if output.success() {
        Ok(output)
    } else {
        Err(SessionError::CommandFailed {
            command: command_line(program, args),
            code: output.code,
            stderr: output.stderr,
        })
    }
}

/// Session target that matches `name` exactly, never by prefix
fn exact(name: &str) -> String {
    format!("={}", name)
}

fn new_session_args(name: &str, cwd: Option<&Path>, detached: bool) -> Vec<String> {
    let mut args = vec!["new-session".to_string()];
    if detached {
        args.push("-d".to_string());
    }
    args.push("-s".to_string());
    args.push(name.to_string());
    if let Some(cwd) = cwd {
        args.push("-c".to_string());
        args.push(cwd.to_string_lossy().into_owned());
    }
    args
}

/// Parse `name:attached:windows`; the name is taken from the left remainder
fn parse_session_line(line: &str) -> Option<SessionInfo> {
    let line = line.trim_end();
    if line.is_empty() {
        return None;
    }
    let mut parts = line.rsplitn(3, ':');
    let windows = parts.next()?;
    let attached = parts.next()?;
    let name = parts.next()?;
    if name.is_empty() {
        return None;
    }
    Some(SessionInfo {
        name: name.to_string(),
        attached: attached.trim().parse::<u32>().map(|n| n > 0).unwrap_or(false),
        windows: windows.trim().to_string(),
    })
}

/// Parse `index:active:name`; the name may itself contain colons
fn parse_window_line(line: &str) -> Option<WindowInfo> {
    let line = line.trim_end();
    let mut parts = line.splitn(3, ':');
    let index = parts.next()?;
    let active = parts.next()?;
    let name = parts.next()?;
    if index.is_empty() {
        return None;
    }
    Some(WindowInfo {
        index: index.to_string(),
        name: name.to_string(),
        active: active == "1",
    })
}
