//! Picker modes
//!
//! Each mode carries only the fields that exist while it is active, so a
//! rename target cannot outlive the Rename mode and a query cannot leak
//! into Normal.

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Keys are commands; the full catalog is shown
    #[default]
    Normal,
    /// Filtering the current catalog, best match first
    Search {
        /// Text typed so far
        query: String,
    },
    /// Choosing or naming a session to create, best match last
    NewSession {
        /// Text typed so far (project filter, new name, or repository URL)
        query: String,
    },
    /// Editing the name of an existing session
    Rename {
        /// Session being renamed
        target: String,
        /// Proposed new name, pre-filled with the current one
        input: String,
    },
}

impl Mode {
    /// Filter text in effect (empty outside Search and NewSession)
    pub fn query(&self) -> &str {
        match self {
            Mode::Search { query } | Mode::NewSession { query } => query,
            Mode::Normal | Mode::Rename { .. } => "",
        }
    }

    /// The text buffer being edited, if this mode has one
    pub fn input_mut(&mut self) -> Option<&mut String> {
        match self {
            Mode::Search { query } | Mode::NewSession { query } => Some(query),
            Mode::Rename { input, .. } => Some(input),
            Mode::Normal => None,
        }
    }

    /// The text buffer shown on the input line, if any
    pub fn input(&self) -> Option<&str> {
        match self {
            Mode::Search { query } | Mode::NewSession { query } => Some(query),
            Mode::Rename { input, .. } => Some(input),
            Mode::Normal => None,
        }
    }

    /// Whether typed characters edit text rather than trigger commands
    pub fn is_text_input(&self) -> bool {
        !matches!(self, Mode::Normal)
    }

    /// Short badge shown in the header
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Search { .. } => "SEARCH",
            Mode::NewSession { .. } => "NEW",
            Mode::Rename { .. } => "RENAME",
        }
    }
}
