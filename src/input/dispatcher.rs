//! Main input dispatch logic
//!
//! Routes keyboard events to the handler for the current mode.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{Action, Mode, PickerState};
use crate::catalog::CatalogSource;

/// Handle a key event by routing to the appropriate mode handler
pub fn handle_key_event(
    state: &mut PickerState,
    key: KeyEvent,
    catalog: &dyn CatalogSource,
) -> Action {
    // Only process key press events (not release/repeat)
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    // Messages last until the next keypress
    state.message = None;

    // Ctrl+C quits from Normal and backs out of the text-entry modes like Esc
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        if state.mode == Mode::Normal {
            return Action::Quit;
        }
        state.cancel(catalog);
        return Action::None;
    }

    match state.mode {
        Mode::Normal => super::normal::handle_normal_key(state, key, catalog),
        Mode::Search { .. } | Mode::NewSession { .. } => {
            super::text_input::handle_query_key(state, key, catalog)
        }
        Mode::Rename { .. } => super::text_input::handle_rename_key(state, key, catalog),
    }
}
