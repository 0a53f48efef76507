//! Helper functions for consistent selection rendering in the picker list.
//!
//! Selected rows get an arrow prefix and bold text; there is no background
//! highlight.

use ratatui::style::{Modifier, Style};

use crate::tui::theme::Theme;

/// Returns the selection prefix for a list item.
///
/// Selected items get an arrow (`▶ `), unselected items get two spaces for alignment.
pub fn selection_prefix(is_selected: bool) -> &'static str {
    if is_selected {
        "▶ "
    } else {
        "  "
    }
}

/// Returns a style for an item name with selection styling.
///
/// Selected names use the accent color in bold, others the plain text color.
pub fn selection_name_style(is_selected: bool, theme: &Theme) -> Style {
    Style::default()
        .fg(if is_selected {
            theme.accent
        } else {
            theme.text
        })
        .add_modifier(if is_selected {
            Modifier::BOLD
        } else {
            Modifier::empty()
        })
}
