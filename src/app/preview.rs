//! Window preview for the session under the cursor
//!
//! Window listings are fetched on first use and cached per session name
//! until the next catalog refresh.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::process::CommandRunner;
use crate::project::display_path;
use crate::session::Tmux;

/// One window line of the preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewWindow {
    pub index: String,
    pub name: String,
    pub active: bool,
    /// Active pane's directory, `~`-relative (empty when unknown)
    pub path: String,
}

/// Lazily filled window listings, keyed by session name
#[derive(Debug, Default)]
pub struct PreviewCache {
    home: PathBuf,
    entries: HashMap<String, Vec<PreviewWindow>>,
}

impl PreviewCache {
    pub fn new(home: PathBuf) -> Self {
        Self {
            home,
            entries: HashMap::new(),
        }
    }

    /// Windows of `session`, querying tmux on a cache miss
    ///
    /// A failed query caches an empty preview so it is not retried on
    /// every frame.
    pub fn windows<R: CommandRunner>(&mut self, tmux: &Tmux<R>, session: &str) -> &[PreviewWindow] {
        let home = &self.home;
        self.entries
            .entry(session.to_string())
            .or_insert_with(|| load_windows(tmux, session, home))
    }

    /// Forget everything (called on catalog refresh)
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn load_windows<R: CommandRunner>(tmux: &Tmux<R>, session: &str, home: &Path) -> Vec<PreviewWindow> {
    let windows = match tmux.list_windows(session) {
        Ok(windows) => windows,
        Err(e) => {
            tracing::debug!("No preview for {}: {}", session, e);
            return Vec::new();
        }
    };

    windows
        .into_iter()
        .map(|w| {
            let path = tmux
                .pane_current_path(session, &w.index)
                .map(|p| {
                    if p.is_empty() {
                        p
                    } else {
                        display_path(Path::new(&p), home)
                    }
                })
                .unwrap_or_default();
            PreviewWindow {
                index: w.index,
                name: w.name,
                active: w.active,
                path,
            }
        })
        .collect()
}
