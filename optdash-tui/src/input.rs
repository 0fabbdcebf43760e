//! Keyboard input handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use optdash_core::domain::OptionSide;

use crate::app::{AppState, Overlay, Panel};

/// Handle a key event and update app state.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (not release/repeat)
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    // An open overlay consumes all input.
    if app.overlay.is_some() {
        handle_overlay_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char(c @ '1'..='5') => {
            app.active_panel = Panel::from_index(c as usize - '1' as usize);
        }
        KeyCode::Tab => app.active_panel = app.active_panel.next(),
        KeyCode::BackTab => app.active_panel = app.active_panel.prev(),
        KeyCode::Char('?') => app.active_panel = Panel::Help,
        KeyCode::Char('s') => app.start_edit(Overlay::EditScan),
        KeyCode::Char('/') => app.start_edit(Overlay::EditTicker),
        KeyCode::Char('r') => app.force_refresh(),
        _ => handle_panel_key(app, key),
    }
}

fn handle_overlay_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Char(c) => app.input_buffer.push(c),
        _ => {}
    }
}

fn handle_panel_key(app: &mut AppState, key: KeyEvent) {
    if app.active_panel != Panel::Chain {
        return;
    }
    match key.code {
        KeyCode::Char('[') | KeyCode::Left | KeyCode::Char('h') => app.select_expiry(-1),
        KeyCode::Char(']') | KeyCode::Right | KeyCode::Char('l') => app.select_expiry(1),
        KeyCode::Char('c') => app.toggle_side(OptionSide::Call),
        KeyCode::Char('p') => app.toggle_side(OptionSide::Put),
        _ => {}
    }
}
