//! Terminal surface for the picker
//!
//! [`Tui`] takes the terminal over for the lifetime of one picker run and
//! hands it back in its original state, so tmux can attach to it afterwards.

pub mod layout;
pub mod theme;
pub mod views;
pub mod widgets;

pub use layout::{LayoutConfig, PickerLayout};
pub use theme::Theme;

use anyhow::Result;
use crossterm::{
    event::{self, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Raw-mode, alternate-screen terminal owned by the picker
///
/// tmux commands that take over the terminal must run after [`Tui::exit`].
/// Dropping a `Tui` that was never exited restores the terminal too.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    /// Raw mode and the alternate screen are active
    entered: bool,
    /// Key event types (press/release) are being reported
    reports_event_types: bool,
}

/// Where teardown problems are reported
#[derive(Clone, Copy)]
enum Report {
    /// Regular exit: the subscriber is still installed
    Log,
    /// Drop, possibly while unwinding: stderr is the only safe place
    Stderr,
}

impl Report {
    fn failure(self, step: &str, error: impl std::fmt::Display) {
        match self {
            Report::Log => tracing::warn!("Terminal restore: {}: {}", step, error),
            Report::Stderr => eprintln!("Terminal restore: {}: {}", step, error),
        }
    }
}

impl Tui {
    /// Create a terminal over stdout without touching its mode yet
    pub fn new() -> Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        Ok(Self {
            terminal,
            entered: false,
            reports_event_types: false,
        })
    }

    /// Switch to raw mode on the alternate screen
    pub fn enter(&mut self) -> Result<()> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        self.entered = true;

        // Release events are only distinguishable when the terminal reports them
        self.reports_event_types = supports_keyboard_enhancement().unwrap_or(false)
            && stdout()
                .execute(PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
                ))
                .is_ok();

        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Give the terminal back; a no-op unless [`Tui::enter`] succeeded
    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        tracing::debug!("Restoring terminal");
        self.pop_event_type_reporting(Report::Log);

        self.terminal.show_cursor()?;
        stdout().execute(LeaveAlternateScreen)?;
        disable_raw_mode()?;
        self.entered = false;
        Ok(())
    }

    /// Draw one frame
    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }

    /// Undo the keyboard enhancement while still in raw mode, then swallow
    /// whatever the terminal answered so it does not leak into the shell
    fn pop_event_type_reporting(&mut self, report: Report) {
        if !self.reports_event_types {
            return;
        }
        self.reports_event_types = false;

        if let Err(e) = stdout().execute(PopKeyboardEnhancementFlags) {
            report.failure("pop keyboard flags", e);
        }
        if let Err(e) = stdout().flush() {
            report.failure("flush stdout", e);
        }
        while event::poll(Duration::from_millis(10)).unwrap_or(false) {
            let _ = event::read();
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if !self.entered {
            return;
        }
        let report = Report::Stderr;
        self.pop_event_type_reporting(report);

        if let Err(e) = self.terminal.show_cursor() {
            report.failure("show cursor", e);
        }
        if let Err(e) = stdout().execute(LeaveAlternateScreen) {
            report.failure("leave alternate screen", e);
        }
        if let Err(e) = disable_raw_mode() {
            report.failure("disable raw mode", e);
        }
    }
}
