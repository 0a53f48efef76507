//! Normal mode input handler
//!
//! Keys are commands here: navigation, mode entry, direct commit and the
//! destructive session operations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, PickerState};
use crate::catalog::CatalogSource;

/// Handle key in normal mode
pub fn handle_normal_key(
    state: &mut PickerState,
    key: KeyEvent,
    catalog: &dyn CatalogSource,
) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('d') => state.kill_selected(),
            KeyCode::Char('r') => {
                state.refresh(catalog);
                Action::None
            }
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
        KeyCode::Down | KeyCode::Char('j') => {
            state.select_next();
            Action::None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.select_prev();
            Action::None
        }
        KeyCode::Enter => state.commit(),
        KeyCode::Char(c @ '1'..='9') => {
            // Digit is a 1-based shortcut into the visible list
            let number = c.to_digit(10).unwrap_or(0) as usize;
            state.commit_number(number)
        }
        KeyCode::Char('/') => {
            state.enter_search();
            Action::None
        }
        KeyCode::Char('n') => {
            state.enter_new_session(catalog);
            Action::None
        }
        KeyCode::Char('r') => {
            state.enter_rename();
            Action::None
        }
        KeyCode::Char('x') => state.kill_selected(),
        KeyCode::Char('t') => {
            state.toggle_kind(catalog);
            Action::None
        }
        _ => Action::None,
    }
}
