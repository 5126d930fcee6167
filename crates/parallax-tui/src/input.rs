use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Mode};
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Next,
    Prev,
    First,
    Last,
    /// First 'g' press, waiting for the second
    PendingG,
    Reload,
    OpenInBrowser,
    Help,
    ExitMode,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    if app.mode == Mode::Help {
        // Any key closes help, but Ctrl+C still quits
        return match keymap.get(&KeyBinding::new(key.code, key.modifiers)) {
            Some(Action::Quit) if key.code == KeyCode::Char('c') => Action::Quit,
            _ => Action::ExitMode,
        };
    }

    let binding = KeyBinding::new(key.code, key.modifiers);

    if keymap.is_g_prefix(&binding) {
        return if app.pending_key == Some('g') {
            keymap.pending_g_action().copied().unwrap_or(Action::None)
        } else {
            Action::PendingG
        };
    }

    if let Some(action) = keymap.get(&binding) {
        return *action;
    }

    // Symbols such as '?' arrive with SHIFT on some terminals
    match key.code {
        KeyCode::Char(c) if key.modifiers == KeyModifiers::SHIFT && !c.is_ascii_alphabetic() => {
            keymap
                .get(&KeyBinding::simple(key.code))
                .copied()
                .unwrap_or(Action::None)
        }
        _ => Action::None,
    }
}
