//! External process execution
//!
//! Every interaction with `tmux`, `pgrep` and `git` goes through
//! [`CommandRunner`], so the orchestration logic can be exercised against a
//! scripted fake instead of real binaries.

use std::io;
use std::process::{Command, Stdio};

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (None when terminated by a signal)
    pub code: Option<i32>,
    /// Captured standard output (empty for interactive runs)
    pub stdout: String,
    /// Captured standard error (empty for interactive runs)
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the process exited with status zero
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs one-shot external commands
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion, capturing its output
    fn output(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;

    /// Run a command attached to the controlling terminal (inherits stdio)
    fn interactive(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn output(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        tracing::debug!("exec: {} {}", program, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn interactive(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        tracing::debug!("exec (interactive): {} {}", program, args.join(" "));
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(CommandOutput {
            code: status.code(),
            ..CommandOutput::default()
        })
    }
}

/// Render a command line for error messages and logs
pub fn command_line(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
