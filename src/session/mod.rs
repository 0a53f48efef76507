//! tmux session management
//!
//! [`tmux::Tmux`] wraps the individual tmux commands and parses their
//! output; [`SessionOrchestrator`] sequences them into the operations the
//! picker commits to (create, switch, kill, rename, clone-then-create).

pub mod orchestrator;
pub mod tmux;

pub use orchestrator::SessionOrchestrator;
pub use tmux::{SessionInfo, Tmux, WindowInfo};

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by session operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// A session name was empty after normalization
    #[error("session name must not be empty")]
    EmptySessionName,

    /// Text that matches neither accepted repository URL form
    #[error("not a recognized repository URL: {0}")]
    InvalidRemoteUrl(String),

    /// The external program could not be started at all
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The external program ran and reported failure
    #[error("`{command}` {}{}", describe_exit(.code), describe_stderr(.stderr))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// A directory needed for cloning could not be created
    #[error("failed to create {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// Make a user-supplied name safe for tmux (dots and spaces become `_`)
pub fn normalize_session_name(name: &str) -> String {
    name.trim().replace(['.', ' '], "_")
}

/// Derive a session name from the last segment of a path (dots become `_`)
pub fn session_name_from_path(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().replace('.', "_"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_session_name() {
        assert_eq!(normalize_session_name("my app.v2"), "my_app_v2");
        assert_eq!(normalize_session_name("  plain  "), "plain");
        assert_eq!(normalize_session_name("   "), "");
    }

    #[test]
    fn test_session_name_from_path() {
        assert_eq!(
            session_name_from_path(Path::new("/home/u/dev/site.io")),
            "site_io"
        );
        assert_eq!(
            session_name_from_path(Path::new("/home/u/dev/my project")),
            "my project"
        );
        assert_eq!(session_name_from_path(Path::new("/")), "");
    }

    #[test]
    fn test_error_messages() {
        let err = SessionError::CommandFailed {
            command: "tmux kill-session -t a".to_string(),
            code: Some(1),
            stderr: "can't find session: a\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`tmux kill-session -t a` exited with status 1: can't find session: a"
        );

        let err = SessionError::CommandFailed {
            command: "git clone x y".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "`git clone x y` was terminated by a signal");
    }
}
