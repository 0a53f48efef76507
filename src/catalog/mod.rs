//! Selectable items and the providers that produce them
//!
//! A catalog is rebuilt wholesale on every refresh: items are immutable
//! snapshots and nothing is diffed or patched in place.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::process::CommandRunner;
use crate::project::{scan_projects, ProjectScan};
use crate::session::tmux::Tmux;

/// Which kind of catalog is being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogKind {
    /// Live tmux sessions
    #[default]
    Sessions,
    /// Project directories found under the search roots
    Projects,
}

impl CatalogKind {
    /// The other kind (used by the toggle key)
    pub fn toggled(self) -> Self {
        match self {
            CatalogKind::Sessions => CatalogKind::Projects,
            CatalogKind::Projects => CatalogKind::Sessions,
        }
    }
}

/// Kind-specific attributes of an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// A directory that can become a session
    Project,
    /// A running session
    Session {
        /// Whether at least one client is attached
        attached: bool,
        /// Window count, as reported by tmux
        window_count: String,
    },
}

/// A selectable entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Display name
    pub title: String,
    /// Human-readable path (`~`-relative); empty for sessions
    pub description: String,
    /// Argument handed to the orchestrator: a path for projects, a session name for sessions
    pub target: String,
    /// Kind plus the attributes only that kind carries
    pub kind: ItemKind,
}

impl Item {
    /// Create a project item
    pub fn project(title: impl Into<String>, description: impl Into<String>, path: PathBuf) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            target: path.to_string_lossy().into_owned(),
            kind: ItemKind::Project,
        }
    }

    /// Create a session item
    pub fn session(name: impl Into<String>, attached: bool, window_count: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            description: String::new(),
            target: name,
            kind: ItemKind::Session {
                attached,
                window_count: window_count.into(),
            },
        }
    }

    /// Whether this item is a running session
    pub fn is_session(&self) -> bool {
        matches!(self.kind, ItemKind::Session { .. })
    }
}

/// Sort items by title, case-sensitive, ascending
pub fn sort_by_title(items: &mut [Item]) {
    items.sort_by(|a, b| a.title.cmp(&b.title));
}

/// Something that can (re)build a catalog on demand
pub trait CatalogSource {
    /// Load the full, title-sorted catalog of the given kind
    ///
    /// Never fails: discovery errors degrade to an empty or partial list.
    fn load(&self, kind: CatalogKind) -> Vec<Item>;
}

/// Catalog provider backed by the filesystem and tmux
pub struct Catalog<R: CommandRunner> {
    tmux: Tmux<R>,
    roots: Vec<PathBuf>,
    home: PathBuf,
    max_depth: usize,
    skip_dirs: Vec<String>,
}

impl<R: CommandRunner> Catalog<R> {
    /// Create a provider using the configured roots and depth
    pub fn new(config: &Config, runner: Arc<R>) -> Self {
        Self {
            tmux: Tmux::new(runner),
            roots: config.search_roots.clone(),
            home: config.home.clone(),
            max_depth: config.max_depth,
            skip_dirs: config.skip_dirs.clone(),
        }
    }

    /// Scan the search roots for project directories
    pub fn list_projects(&self) -> ProjectScan {
        scan_projects(&self.roots, &self.home, self.max_depth, &self.skip_dirs)
    }

    /// Query tmux for live sessions ("no server" reads as no sessions)
    pub fn list_sessions(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self
            .tmux
            .list_sessions()
            .into_iter()
            .map(|s| Item::session(s.name, s.attached, s.windows))
            .collect();
        sort_by_title(&mut items);
        items
    }
}

impl<R: CommandRunner> CatalogSource for Catalog<R> {
    fn load(&self, kind: CatalogKind) -> Vec<Item> {
        match kind {
            CatalogKind::Sessions => self.list_sessions(),
            CatalogKind::Projects => {
                let scan = self.list_projects();
                for warning in &scan.warnings {
                    tracing::warn!("Project scan: {}", warning);
                }
                scan.items
            }
        }
    }
}
