//! Text input mode handlers
//!
//! Search and NewSession edit a filter query; Rename edits a session name.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, PickerState};
use crate::catalog::CatalogSource;

/// Handle key while typing a Search or NewSession query
pub fn handle_query_key(
    state: &mut PickerState,
    key: KeyEvent,
    catalog: &dyn CatalogSource,
) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('p') => state.select_prev(),
            KeyCode::Char('n') => state.select_next(),
            KeyCode::Char('u') => state.clear_input(),
            _ => {}
        }
        return Action::None;
    }

    match key.code {
        KeyCode::Esc => state.cancel(catalog),
        KeyCode::Enter => return state.commit(),
        KeyCode::Up => state.select_prev(),
        KeyCode::Down => state.select_next(),
        KeyCode::Backspace => state.delete_char(),
        KeyCode::Char(c) => state.insert_char(c),
        _ => {}
    }
    Action::None
}

/// Handle key while renaming a session
pub fn handle_rename_key(
    state: &mut PickerState,
    key: KeyEvent,
    catalog: &dyn CatalogSource,
) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('u') {
            state.clear_input();
        }
        return Action::None;
    }

    match key.code {
        KeyCode::Esc => state.cancel(catalog),
        KeyCode::Enter => return state.commit(),
        KeyCode::Backspace => state.delete_char(),
        KeyCode::Char(c) => state.insert_char(c),
        _ => {}
    }
    Action::None
}
