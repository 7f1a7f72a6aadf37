//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Provides default vim-style bindings for the log view.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&key).copied()
    }

    fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: KeyAction) {
        self.bindings.insert(KeyEvent::new(code, modifiers), action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut keys = Self {
            bindings: HashMap::new(),
        };
        let none = KeyModifiers::NONE;
        let shift = KeyModifiers::SHIFT;
        let ctrl = KeyModifiers::CONTROL;

        // Line scrolling
        keys.bind(KeyCode::Char('j'), none, KeyAction::ScrollDown);
        keys.bind(KeyCode::Char('k'), none, KeyAction::ScrollUp);
        keys.bind(KeyCode::Down, none, KeyAction::ScrollDown);
        keys.bind(KeyCode::Up, none, KeyAction::ScrollUp);

        // Page scrolling
        keys.bind(KeyCode::Char('d'), ctrl, KeyAction::PageDown);
        keys.bind(KeyCode::Char('u'), ctrl, KeyAction::PageUp);
        keys.bind(KeyCode::PageDown, none, KeyAction::PageDown);
        keys.bind(KeyCode::PageUp, none, KeyAction::PageUp);

        // Jumps
        keys.bind(KeyCode::Char('g'), none, KeyAction::ScrollToTop);
        keys.bind(KeyCode::Home, none, KeyAction::ScrollToTop);
        keys.bind(KeyCode::Char('G'), shift, KeyAction::ScrollToBottom);
        keys.bind(KeyCode::Char('G'), none, KeyAction::ScrollToBottom);
        keys.bind(KeyCode::End, none, KeyAction::ScrollToBottom);

        keys.bind(KeyCode::Char('a'), none, KeyAction::ToggleAutoFollow);

        // Font; '+' arrives with SHIFT on most layouts
        keys.bind(KeyCode::Char('+'), none, KeyAction::IncreaseFontSize);
        keys.bind(KeyCode::Char('+'), shift, KeyAction::IncreaseFontSize);
        keys.bind(KeyCode::Char('='), none, KeyAction::IncreaseFontSize);
        keys.bind(KeyCode::Char('-'), none, KeyAction::DecreaseFontSize);

        // Search
        keys.bind(KeyCode::Char('f'), ctrl, KeyAction::ToggleSearch);
        keys.bind(KeyCode::Char('/'), none, KeyAction::ToggleSearch);
        keys.bind(KeyCode::Char('n'), none, KeyAction::NextMatch);
        keys.bind(KeyCode::Char('N'), shift, KeyAction::PrevMatch);
        keys.bind(KeyCode::Char('N'), none, KeyAction::PrevMatch);

        keys.bind(KeyCode::Char('q'), none, KeyAction::Quit);
        keys.bind(KeyCode::Char('c'), ctrl, KeyAction::Quit);

        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn default_bindings_cover_vim_scrolling() {
        let keys = KeyBindings::default();
        assert_eq!(
            keys.get(key(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(KeyAction::ScrollDown)
        );
        assert_eq!(
            keys.get(key(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some(KeyAction::ScrollToBottom)
        );
        assert_eq!(
            keys.get(key(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(KeyAction::PageUp)
        );
    }

    #[test]
    fn ctrl_f_toggles_search() {
        let keys = KeyBindings::default();
        assert_eq!(
            keys.get(key(KeyCode::Char('f'), KeyModifiers::CONTROL)),
            Some(KeyAction::ToggleSearch)
        );
    }

    #[test]
    fn plus_works_with_or_without_shift() {
        let keys = KeyBindings::default();
        for modifiers in [KeyModifiers::NONE, KeyModifiers::SHIFT] {
            assert_eq!(
                keys.get(key(KeyCode::Char('+'), modifiers)),
                Some(KeyAction::IncreaseFontSize)
            );
        }
    }

    #[test]
    fn unbound_key_yields_none() {
        let keys = KeyBindings::default();
        assert_eq!(keys.get(key(KeyCode::Char('z'), KeyModifiers::NONE)), None);
    }
}
