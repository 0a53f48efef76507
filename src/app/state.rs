//! Picker state machine
//!
//! [`PickerState`] owns the catalog snapshot, the ranked view over it, the
//! cursor, and the current [`Mode`]. Transitions are plain method calls; the
//! only outside dependency is a [`CatalogSource`] for refetching items, so the
//! whole machine runs in tests without a terminal or tmux.

use std::fmt;
use std::path::PathBuf;

use crate::catalog::{CatalogKind, CatalogSource, Item, ItemKind};
use crate::git::looks_like_remote_url;
use crate::process::CommandRunner;
use crate::scoring::{filter_and_rank, RankOrder};
use crate::session::{SessionError, SessionOrchestrator};

use super::mode::Mode;

/// What the picker resolved to when the interactive loop ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Switch to an existing session
    Switch(String),
    /// Open a session for a project directory
    Create(PathBuf),
    /// Open a session with a literal name
    CreateNamed(String),
    /// Clone a repository, then open a session in it
    CloneAndCreate(String),
}

impl Intent {
    /// The intent committing `item` resolves to
    pub fn for_item(item: &Item) -> Self {
        match item.kind {
            ItemKind::Session { .. } => Intent::Switch(item.title.clone()),
            ItemKind::Project => Intent::Create(PathBuf::from(&item.target)),
        }
    }

    /// Carry out the intent
    pub fn execute<R: CommandRunner + 'static>(
        &self,
        orchestrator: &SessionOrchestrator<R>,
    ) -> Result<(), SessionError> {
        match self {
            Intent::Switch(name) => orchestrator.switch(name),
            Intent::Create(path) => orchestrator.create(path),
            Intent::CreateNamed(name) => orchestrator.create_named(name),
            Intent::CloneAndCreate(url) => orchestrator.clone_and_create(url),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Switch(name) => write!(f, "switch to {}", name),
            Intent::Create(path) => write!(f, "create session in {}", path.display()),
            Intent::CreateNamed(name) => write!(f, "create session {}", name),
            Intent::CloneAndCreate(url) => write!(f, "clone {}", url),
        }
    }
}

/// Result of handling one key
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Action {
    /// Nothing for the caller to do
    #[default]
    None,
    /// Leave without a selection
    Quit,
    /// Leave with a resolved intent
    Commit(Intent),
    /// Kill a session now, then stay in the picker
    Kill(String),
    /// Rename a session now, then stay in the picker
    Rename { from: String, to: String },
}

/// Severity of a transient message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Error,
}

/// Banner text shown until the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub level: MessageLevel,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Error,
        }
    }
}

/// Picker state
#[derive(Debug, Clone)]
pub struct PickerState {
    /// Current mode and its mode-specific fields
    pub mode: Mode,
    /// Kind of the loaded catalog
    pub kind: CatalogKind,
    /// Full catalog snapshot, title-sorted
    pub items: Vec<Item>,
    /// Indices into `items` in display order
    pub view: Vec<usize>,
    /// Cursor position within `view`
    pub selected: usize,
    /// Ranking direction of the view
    pub order: RankOrder,
    /// Transient message (cleared on next keypress)
    pub message: Option<Message>,
    /// Bumped on every catalog load
    pub generation: u64,
}

impl PickerState {
    /// Create a picker in Normal mode over an initial catalog
    pub fn new(kind: CatalogKind, items: Vec<Item>) -> Self {
        let mut state = Self {
            mode: Mode::Normal,
            kind,
            items,
            view: Vec::new(),
            selected: 0,
            order: RankOrder::Descending,
            message: None,
            generation: 0,
        };
        state.refilter();
        state
    }

    /// Start on sessions when any exist, otherwise on projects
    ///
    /// Returns None when both catalogs are empty.
    pub fn initial(catalog: &dyn CatalogSource) -> Option<Self> {
        [CatalogKind::Sessions, CatalogKind::Projects]
            .into_iter()
            .map(|kind| (kind, catalog.load(kind)))
            .find(|(_, items)| !items.is_empty())
            .map(|(kind, items)| Self::new(kind, items))
    }

    /// Items in display order
    pub fn visible(&self) -> impl Iterator<Item = &Item> + '_ {
        self.view.iter().filter_map(|&i| self.items.get(i))
    }

    /// Number of items in the view
    pub fn visible_len(&self) -> usize {
        self.view.len()
    }

    /// Item at a view position
    pub fn visible_item(&self, position: usize) -> Option<&Item> {
        self.view.get(position).and_then(|&i| self.items.get(i))
    }

    /// Item under the cursor
    pub fn selected_item(&self) -> Option<&Item> {
        self.visible_item(self.selected)
    }

    /// Move the cursor down, wrapping at the end
    pub fn select_next(&mut self) {
        let count = self.view.len();
        if count > 0 {
            // Clamp first to handle a stale cursor
            let current = self.selected.min(count - 1);
            self.selected = (current + 1) % count;
        } else {
            self.selected = 0;
        }
    }

    /// Move the cursor up, wrapping at the start
    pub fn select_prev(&mut self) {
        let count = self.view.len();
        if count > 0 {
            let current = self.selected.min(count - 1);
            self.selected = current.checked_sub(1).unwrap_or(count - 1);
        } else {
            self.selected = 0;
        }
    }

    /// Recompute the view from the current query and reset the cursor to
    /// where the best match lands
    pub fn refilter(&mut self) {
        self.view = filter_and_rank(&self.items, self.mode.query(), self.order)
            .into_iter()
            .map(|s| s.index)
            .collect();
        self.selected = match self.order {
            RankOrder::Descending => 0,
            RankOrder::Ascending => self.view.len().saturating_sub(1),
        };
    }

    /// Replace the catalog with a fresh load of `kind`
    pub fn reload(&mut self, kind: CatalogKind, catalog: &dyn CatalogSource) {
        self.kind = kind;
        self.items = catalog.load(kind);
        self.generation += 1;
        self.refilter();
    }

    /// Refetch the current catalog kind, keeping the cursor where possible
    pub fn refresh(&mut self, catalog: &dyn CatalogSource) {
        let previous = self.selected;
        self.reload(self.kind, catalog);
        if self.order == RankOrder::Descending && !self.view.is_empty() {
            self.selected = previous.min(self.view.len() - 1);
        }
    }

    /// Switch between the session and project catalogs
    pub fn toggle_kind(&mut self, catalog: &dyn CatalogSource) {
        self.reload(self.kind.toggled(), catalog);
    }

    /// Normal -> Search
    pub fn enter_search(&mut self) {
        self.mode = Mode::Search {
            query: String::new(),
        };
        self.order = RankOrder::Descending;
        self.refilter();
    }

    /// Normal -> NewSession: project catalog, best match at the bottom
    pub fn enter_new_session(&mut self, catalog: &dyn CatalogSource) {
        self.mode = Mode::NewSession {
            query: String::new(),
        };
        self.order = RankOrder::Ascending;
        self.reload(CatalogKind::Projects, catalog);
    }

    /// Normal -> Rename, only when a session is under the cursor
    pub fn enter_rename(&mut self) {
        match self.selected_item() {
            Some(item) if item.is_session() => {
                let name = item.title.clone();
                self.mode = Mode::Rename {
                    target: name.clone(),
                    input: name,
                };
            }
            Some(_) => self.message = Some(Message::error("Only sessions can be renamed")),
            None => {}
        }
    }

    /// Leave the current mode for Normal, restoring the unfiltered catalog
    pub fn cancel(&mut self, catalog: &dyn CatalogSource) {
        match std::mem::take(&mut self.mode) {
            Mode::Normal | Mode::Rename { .. } => {}
            Mode::Search { .. } => self.refilter(),
            Mode::NewSession { .. } => {
                self.order = RankOrder::Descending;
                self.reload(CatalogKind::Sessions, catalog);
            }
        }
    }

    /// Append a character to the active text buffer
    pub fn insert_char(&mut self, c: char) {
        if let Some(buf) = self.mode.input_mut() {
            buf.push(c);
            self.after_edit();
        }
    }

    /// Remove the last character of the active text buffer
    pub fn delete_char(&mut self) {
        if let Some(buf) = self.mode.input_mut() {
            if buf.pop().is_some() {
                self.after_edit();
            }
        }
    }

    /// Empty the active text buffer
    pub fn clear_input(&mut self) {
        if let Some(buf) = self.mode.input_mut() {
            if !buf.is_empty() {
                buf.clear();
                self.after_edit();
            }
        }
    }

    fn after_edit(&mut self) {
        if matches!(self.mode, Mode::Search { .. } | Mode::NewSession { .. }) {
            self.refilter();
        }
    }

    /// Commit with Enter; what gets committed depends on the mode
    pub fn commit(&mut self) -> Action {
        match &self.mode {
            Mode::Normal => self.commit_at(self.selected),
            Mode::Search { .. } => self.commit_at(0),
            Mode::NewSession { query } => {
                let query = query.clone();
                self.commit_new_session(query)
            }
            Mode::Rename { .. } => match std::mem::take(&mut self.mode) {
                Mode::Rename { target, input } => Action::Rename {
                    from: target,
                    to: input,
                },
                _ => Action::None,
            },
        }
    }

    /// Direct commit of the n-th visible item (1-based), Normal mode only
    pub fn commit_number(&mut self, number: usize) -> Action {
        if self.mode != Mode::Normal || number == 0 {
            return Action::None;
        }
        self.commit_at(number - 1)
    }

    fn commit_at(&self, position: usize) -> Action {
        self.visible_item(position)
            .map(|item| Action::Commit(Intent::for_item(item)))
            .unwrap_or_default()
    }

    fn commit_new_session(&mut self, query: String) -> Action {
        let trimmed = query.trim();
        if looks_like_remote_url(trimmed) {
            return Action::Commit(Intent::CloneAndCreate(query));
        }
        if let Some(item) = self.selected_item().or_else(|| self.visible_item(0)) {
            return Action::Commit(Intent::for_item(item));
        }
        if trimmed.is_empty() {
            self.message = Some(Message::error("Type a session name or repository URL"));
            return Action::None;
        }
        Action::Commit(Intent::CreateNamed(query))
    }

    /// Request a kill of the session under the cursor (Normal mode only)
    pub fn kill_selected(&mut self) -> Action {
        if self.mode != Mode::Normal {
            return Action::None;
        }
        match self.selected_item() {
            Some(item) if item.is_session() => Action::Kill(item.title.clone()),
            Some(_) => {
                self.message = Some(Message::error("Only sessions can be killed"));
                Action::None
            }
            None => Action::None,
        }
    }

    /// Record the outcome of a kill and refresh the catalog
    pub fn finish_kill<E: fmt::Display>(
        &mut self,
        name: &str,
        result: Result<(), E>,
        catalog: &dyn CatalogSource,
    ) {
        self.message = Some(match result {
            Ok(()) => Message::info(format!("Killed session {}", name)),
            Err(e) => Message::error(format!("Failed to kill {}: {}", name, e)),
        });
        self.refresh(catalog);
    }

    /// Record the outcome of a rename and refresh the catalog
    pub fn finish_rename<E: fmt::Display>(
        &mut self,
        from: &str,
        result: Result<String, E>,
        catalog: &dyn CatalogSource,
    ) {
        self.message = Some(match result {
            Ok(to) => Message::info(format!("Renamed {} to {}", from, to)),
            Err(e) => Message::error(format!("Failed to rename {}: {}", from, e)),
        });
        self.refresh(catalog);
    }
}
