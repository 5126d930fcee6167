use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use parallax_core::config::KeymapConfig;
use tracing::warn;

use crate::input::Action;

/// Parsed key binding (key code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

/// Runtime keymap for key-to-action lookup
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
    /// Action bound to the "gg" sequence, if any
    pending_g_action: Option<Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    pub fn from_config(config: &KeymapConfig) -> Self {
        let mut bindings = HashMap::new();
        let mut pending_g_action = None;

        let mut add_binding = |key_str: &str, action: Action| {
            if key_str == "gg" {
                pending_g_action = Some(action);
                return;
            }

            match parse_key_binding(key_str) {
                Some(binding) => {
                    if let Some(existing) = bindings.get(&binding) {
                        warn!(
                            "Key conflict: '{}' already bound to {:?}, ignoring binding to {:?}",
                            key_str, existing, action
                        );
                    } else {
                        bindings.insert(binding, action);
                    }
                }
                None => warn!("Invalid key binding: '{}', ignoring", key_str),
            }
        };

        add_binding(&config.quit, Action::Quit);
        add_binding(&config.next, Action::Next);
        add_binding(&config.prev, Action::Prev);
        add_binding(&config.first, Action::First);
        add_binding(&config.last, Action::Last);
        add_binding(&config.reload, Action::Reload);
        add_binding(&config.open_browser, Action::OpenInBrowser);
        add_binding(&config.help, Action::Help);

        // Always available, not configurable
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        bindings.entry(KeyBinding::simple(KeyCode::Right)).or_insert(Action::Next);
        bindings.entry(KeyBinding::simple(KeyCode::Left)).or_insert(Action::Prev);
        bindings.entry(KeyBinding::simple(KeyCode::Home)).or_insert(Action::First);
        bindings.entry(KeyBinding::simple(KeyCode::End)).or_insert(Action::Last);
        bindings.insert(KeyBinding::simple(KeyCode::Esc), Action::ExitMode);

        Self {
            bindings,
            pending_g_action,
        }
    }

    pub fn get(&self, binding: &KeyBinding) -> Option<&Action> {
        self.bindings.get(binding)
    }

    pub fn pending_g_action(&self) -> Option<&Action> {
        self.pending_g_action.as_ref()
    }

    /// Whether a plain 'g' starts the "gg" sequence
    pub fn is_g_prefix(&self, binding: &KeyBinding) -> bool {
        self.pending_g_action.is_some()
            && binding.code == KeyCode::Char('g')
            && binding.modifiers == KeyModifiers::NONE
    }
}

/// Parse Vim-style key notation into KeyBinding
/// Supported formats:
/// - Single char: "l", "h", "q", "/"
/// - Uppercase (Shift): "G"
/// - Ctrl: "<C-n>"
/// - Shift: "<S-Tab>"
/// - Special keys: "<CR>", "<Esc>", "<Tab>", "<Space>", "<Left>", "<Right>", "<Home>", "<End>"
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();

    if let Some(inner) = s.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        if let Some(rest) = inner.strip_prefix("C-") {
            return parse_key_name(rest).map(KeyBinding::ctrl);
        }
        if let Some(rest) = inner.strip_prefix("S-") {
            return parse_key_name(rest).map(KeyBinding::shift);
        }
        return parse_key_name(inner).map(KeyBinding::simple);
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Some(KeyBinding::shift(KeyCode::Char(c))),
        (Some(c), None) => Some(KeyBinding::simple(KeyCode::Char(c))),
        _ => None,
    }
}

/// Parse a key name (without modifiers)
fn parse_key_name(name: &str) -> Option<KeyCode> {
    match name.to_lowercase().as_str() {
        "cr" | "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "space" | "spc" => Some(KeyCode::Char(' ')),
        "bs" | "backspace" => Some(KeyCode::Backspace),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c.to_ascii_lowercase())),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_and_shifted() {
        assert_eq!(parse_key_binding("l"), Some(KeyBinding::simple(KeyCode::Char('l'))));
        assert_eq!(parse_key_binding("?"), Some(KeyBinding::simple(KeyCode::Char('?'))));
        assert_eq!(parse_key_binding("G"), Some(KeyBinding::shift(KeyCode::Char('G'))));
    }

    #[test]
    fn test_parse_special_keys() {
        assert_eq!(parse_key_binding("<C-n>"), Some(KeyBinding::ctrl(KeyCode::Char('n'))));
        assert_eq!(parse_key_binding("<S-Tab>"), Some(KeyBinding::shift(KeyCode::Tab)));
        assert_eq!(parse_key_binding("<Right>"), Some(KeyBinding::simple(KeyCode::Right)));
        assert_eq!(parse_key_binding("<Space>"), Some(KeyBinding::simple(KeyCode::Char(' '))));
        assert_eq!(parse_key_binding("<Nope>"), None);
        assert_eq!(parse_key_binding("ab"), None);
    }

    #[test]
    fn test_keymap_from_default_config() {
        let keymap = Keymap::default();

        assert_eq!(keymap.get(&KeyBinding::simple(KeyCode::Char('q'))), Some(&Action::Quit));
        assert_eq!(keymap.get(&KeyBinding::simple(KeyCode::Char('l'))), Some(&Action::Next));
        assert_eq!(keymap.get(&KeyBinding::simple(KeyCode::Left)), Some(&Action::Prev));
        assert_eq!(keymap.get(&KeyBinding::shift(KeyCode::Char('G'))), Some(&Action::Last));
        assert_eq!(keymap.pending_g_action(), Some(&Action::First));
        assert!(keymap.is_g_prefix(&KeyBinding::simple(KeyCode::Char('g'))));
    }

    #[test]
    fn test_conflicting_binding_keeps_first() {
        let config = KeymapConfig {
            reload: "q".to_string(),
            ..Default::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(keymap.get(&KeyBinding::simple(KeyCode::Char('q'))), Some(&Action::Quit));
    }
}
