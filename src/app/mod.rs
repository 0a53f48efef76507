//! Application state and main event loop
//!
//! [`App`] owns the terminal and drives [`PickerState`] from crossterm key
//! events. Kill and rename run immediately; a committed [`Intent`] ends the
//! loop and is returned to the caller, which performs it after the terminal
//! has been restored.

mod mode;
mod preview;
mod state;

pub use mode::Mode;
pub use preview::{PreviewCache, PreviewWindow};
pub use state::{Action, Intent, Message, MessageLevel, PickerState};

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};

use crate::catalog::{Catalog, CatalogSource};
use crate::config::Config;
use crate::input::handle_key_event;
use crate::process::{CommandRunner, SystemRunner};
use crate::session::{SessionOrchestrator, Tmux};
use crate::tui::views::render_picker;
use crate::tui::Tui;

/// Main application struct
pub struct App {
    /// Application configuration (theme and layout are read on every frame)
    config: Config,
    /// Picker state
    state: PickerState,
    /// Catalog provider used for refreshes and mode changes
    catalog: Catalog<SystemRunner>,
    /// Runs kill and rename while the picker stays open
    orchestrator: SessionOrchestrator<SystemRunner>,
    /// Used for window previews
    tmux: Tmux<SystemRunner>,
    /// Window listings per session
    preview: PreviewCache,
    /// Catalog generation the preview cache was filled for
    preview_generation: u64,
    /// Terminal UI
    tui: Tui,
    /// Whether the UI needs to be re-rendered
    needs_render: bool,
}

impl App {
    /// Create a new application instance over an initial picker state
    pub fn new(
        config: Config,
        runner: Arc<SystemRunner>,
        catalog: Catalog<SystemRunner>,
        state: PickerState,
    ) -> Result<Self> {
        let orchestrator = SessionOrchestrator::new(&config, Arc::clone(&runner));
        let tmux = Tmux::new(runner);
        let preview = PreviewCache::new(config.home.clone());
        let tui = Tui::new()?;

        Ok(Self {
            preview_generation: state.generation,
            config,
            state,
            catalog,
            orchestrator,
            tmux,
            preview,
            tui,
            needs_render: true,
        })
    }

    /// Run the picker until the user quits or commits
    ///
    /// Returns the committed intent, or None when the user quit.
    pub async fn run(&mut self) -> Result<Option<Intent>> {
        self.tui.enter()?;
        tracing::info!(
            "Picker started with {} {:?}",
            self.state.items.len(),
            self.state.kind
        );

        let result = self.event_loop().await;

        // Restore the terminal before anything attaches to it
        self.tui.exit()?;

        result
    }

    /// Main event loop
    async fn event_loop(&mut self) -> Result<Option<Intent>> {
        let tick_rate = Duration::from_millis(100);

        loop {
            if self.needs_render {
                self.render()?;
                self.needs_render = false;
            }

            if !event::poll(tick_rate)? {
                tokio::task::yield_now().await;
                continue;
            }

            match event::read()? {
                Event::Key(key) => {
                    let action = handle_key_event(&mut self.state, key, &self.catalog);
                    if let Some(intent) = self.apply(action) {
                        return Ok(intent);
                    }
                    self.needs_render = true;
                }
                Event::Resize(_, _) => self.needs_render = true,
                _ => {}
            }
        }
    }

    /// Perform an action; `Some` ends the loop with the given outcome
    fn apply(&mut self, action: Action) -> Option<Option<Intent>> {
        resolve_action(&mut self.state, &self.orchestrator, &self.catalog, action)
    }

    /// Render the current state
    fn render(&mut self) -> Result<()> {
        if self.preview_generation != self.state.generation {
            self.preview.clear();
            self.preview_generation = self.state.generation;
        }

        let preview = match self.state.selected_item() {
            Some(item)
                if self.config.layout.show_preview
                    && self.state.mode == Mode::Normal
                    && item.is_session() =>
            {
                Some(self.preview.windows(&self.tmux, &item.title))
            }
            _ => None,
        };

        let state = &self.state;
        let theme = &self.config.theme;
        let layout = &self.config.layout;
        self.tui.draw(|frame| {
            let area = frame.size();
            render_picker(frame, area, state, preview, theme, layout);
        })
    }
}

/// Carry out what a key press resolved to
///
/// Kill and rename run right away and leave their outcome as the picker
/// message; quit and commit end the loop (`Some(None)` and `Some(Some(_))`).
fn resolve_action<R: CommandRunner + 'static>(
    state: &mut PickerState,
    orchestrator: &SessionOrchestrator<R>,
    catalog: &dyn CatalogSource,
    action: Action,
) -> Option<Option<Intent>> {
    match action {
        Action::None => None,
        Action::Quit => {
            tracing::info!("Picker closed without a selection");
            Some(None)
        }
        Action::Commit(intent) => {
            tracing::info!("Committed: {}", intent);
            Some(Some(intent))
        }
        Action::Kill(name) => {
            let result = orchestrator.kill(&name);
            if let Err(e) = &result {
                tracing::warn!("Kill failed: {}", e);
            }
            state.finish_kill(&name, result, catalog);
            None
        }
        Action::Rename { from, to } => {
            let result = orchestrator.rename(&from, &to);
            if let Err(e) = &result {
                tracing::warn!("Rename failed: {}", e);
            }
            state.finish_rename(&from, result, catalog);
            None
        }
    }
}
