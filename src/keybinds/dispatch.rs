//! Key combination parsing and key → action dispatch.
//!
//! Key strings use the `modifier-modifier-key` form, e.g. `ctrl-a`,
//! `shift-delete`, `escape`. `ctrl`, `cmd`, `meta` and `super` all map to the
//! single primary modifier, so `ctrl-a` also fires on Cmd+A.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use super::actions::TabAction;
use super::config::{DISABLED, KeybindConfig};

/// Failure to parse a key string from the config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("Empty key combination")]
    Empty,

    #[error("Key combination '{0}' ends with a modifier, no key specified")]
    MissingKey(String),

    #[error("Key combination '{combo}' names more than one key ('{extra}')")]
    MultipleKeys { combo: String, extra: String },
}

/// A parsed key combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    /// Ctrl on Linux/Windows, Cmd on macOS
    pub primary: bool,
    pub alt: bool,
    pub shift: bool,
    /// Lower-cased key name: a single character or a named key like `delete`
    pub key: String,
}

impl KeyCombo {
    /// Parse a `ctrl-a` style key string.
    ///
    /// # Errors
    ///
    /// Returns `KeyParseError` if the string is empty, has no key, or names
    /// more than one non-modifier key.
    pub fn parse(s: &str) -> Result<Self, KeyParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(KeyParseError::Empty);
        }

        // "ctrl--" binds the minus key
        let (mods, key_part) = match trimmed.strip_suffix("--") {
            Some(rest) => (rest, Some("-")),
            None => (trimmed, None),
        };

        let mut combo = Self {
            primary: false,
            alt: false,
            shift: false,
            key: String::new(),
        };
        let mut key = key_part.map(str::to_string);

        for part in mods.split('-').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" | "cmd" | "command" | "meta" | "super" => combo.primary = true,
                "alt" | "option" => combo.alt = true,
                "shift" => combo.shift = true,
                other => {
                    if key.is_some() {
                        return Err(KeyParseError::MultipleKeys {
                            combo: trimmed.to_string(),
                            extra: other.to_string(),
                        });
                    }
                    key = Some(normalize_key(other));
                }
            }
        }

        combo.key = key.ok_or_else(|| KeyParseError::MissingKey(trimmed.to_string()))?;
        Ok(combo)
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.primary {
            parts.push("Ctrl".to_string());
        }
        if self.alt {
            parts.push("Alt".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }

        let mut chars = self.key.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_uppercase().to_string(),
            (Some(c), Some(_)) => c.to_uppercase().chain(self.key.chars().skip(1)).collect(),
            (None, _) => String::new(),
        };
        parts.push(key);

        write!(f, "{}", parts.join("+"))
    }
}

fn normalize_key(key: &str) -> String {
    match key {
        "del" => "delete".to_string(),
        "esc" => "escape".to_string(),
        "return" => "enter".to_string(),
        "bs" => "backspace".to_string(),
        other => other.to_string(),
    }
}

/// A key press as reported by the host view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key name, e.g. `a`, `A`, `Delete`, `Escape`
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyEvent {
    /// A key press with no modifiers held
    #[must_use]
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    /// A key press with Ctrl held
    #[must_use]
    pub fn ctrl(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ctrl: true,
            ..Self::default()
        }
    }

    /// A key press with Cmd/Meta held
    #[must_use]
    pub fn meta(key: &str) -> Self {
        Self {
            key: key.to_string(),
            meta: true,
            ..Self::default()
        }
    }

    fn combo(&self) -> KeyCombo {
        KeyCombo {
            primary: self.ctrl || self.meta,
            alt: self.alt,
            shift: self.shift,
            key: normalize_key(&self.key.to_lowercase()),
        }
    }
}

/// Lookup table from key combination to action.
#[derive(Debug, Clone, Default)]
pub struct KeyDispatcher {
    bindings: HashMap<KeyCombo, TabAction>,
}

impl KeyDispatcher {
    /// Build the table from configured keybinds.
    ///
    /// Actions with no configured keys, or bound to `none`, are left unbound.
    /// Unknown action names in the config are ignored.
    ///
    /// # Errors
    ///
    /// Returns `KeyParseError` for the first key string that fails to parse.
    pub fn from_config(config: &KeybindConfig) -> Result<Self, KeyParseError> {
        let mut bindings = HashMap::new();

        for action in TabAction::ALL {
            if config.is_disabled(action.id()) {
                continue;
            }
            for key in config.get(action.id()) {
                if key == DISABLED {
                    continue;
                }
                let combo = KeyCombo::parse(&key)?;
                if let Some(previous) = bindings.insert(combo, action) {
                    log::warn!(
                        "Key '{key}' bound to both {} and {}; using {}",
                        previous.id(),
                        action.id(),
                        action.id()
                    );
                }
            }
        }

        for name in config.keybinds.keys() {
            if TabAction::from_id(name).is_none() {
                log::warn!("Ignoring keybind for unknown action '{name}'");
            }
        }

        Ok(Self { bindings })
    }

    /// The action bound to this key press, if any
    #[must_use]
    pub fn resolve(&self, event: &KeyEvent) -> Option<TabAction> {
        self.bindings.get(&event.combo()).copied()
    }

    /// Key combinations bound to `action`, sorted for display
    #[must_use]
    pub fn keys_for(&self, action: TabAction) -> Vec<&KeyCombo> {
        let mut keys: Vec<&KeyCombo> = self
            .bindings
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(combo, _)| combo)
            .collect();
        keys.sort_by_key(|combo| combo.to_string());
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybinds::config::KeybindDef;

    #[test]
    fn test_parse_simple() {
        let combo = KeyCombo::parse("ctrl-a").unwrap();
        assert!(combo.primary);
        assert!(!combo.shift);
        assert_eq!(combo.key, "a");
    }

    #[test]
    fn test_parse_modifier_aliases() {
        assert_eq!(KeyCombo::parse("cmd-a").unwrap(), KeyCombo::parse("ctrl-a").unwrap());
        assert_eq!(KeyCombo::parse("meta-a").unwrap(), KeyCombo::parse("CTRL-A").unwrap());
    }

    #[test]
    fn test_parse_named_key_aliases() {
        assert_eq!(KeyCombo::parse("del").unwrap().key, "delete");
        assert_eq!(KeyCombo::parse("esc").unwrap().key, "escape");
        assert_eq!(KeyCombo::parse("shift-delete").unwrap().to_string(), "Shift+Delete");
    }

    #[test]
    fn test_parse_minus_key() {
        let combo = KeyCombo::parse("ctrl--").unwrap();
        assert!(combo.primary);
        assert_eq!(combo.key, "-");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(KeyCombo::parse("  "), Err(KeyParseError::Empty));
        assert!(matches!(KeyCombo::parse("ctrl-shift"), Err(KeyParseError::MissingKey(_))));
        assert!(matches!(KeyCombo::parse("a-b"), Err(KeyParseError::MultipleKeys { .. })));
    }

    #[test]
    fn test_display() {
        assert_eq!(KeyCombo::parse("ctrl-f").unwrap().to_string(), "Ctrl+F");
        assert_eq!(KeyCombo::parse("escape").unwrap().to_string(), "Escape");
    }

    #[test]
    fn test_default_dispatch() {
        let dispatcher = KeyDispatcher::from_config(&KeybindConfig::default()).unwrap();

        assert_eq!(dispatcher.resolve(&KeyEvent::ctrl("f")), Some(TabAction::FocusSearch));
        assert_eq!(dispatcher.resolve(&KeyEvent::meta("f")), Some(TabAction::FocusSearch));
        assert_eq!(dispatcher.resolve(&KeyEvent::ctrl("a")), Some(TabAction::SelectAllVisible));
        assert_eq!(dispatcher.resolve(&KeyEvent::meta("A")), Some(TabAction::SelectAllVisible));
        assert_eq!(dispatcher.resolve(&KeyEvent::plain("Delete")), Some(TabAction::CloseSelected));
        assert_eq!(
            dispatcher.resolve(&KeyEvent::plain("Escape")),
            Some(TabAction::ClearSearchOrDeselect)
        );
    }

    #[test]
    fn test_unbound_keys() {
        let dispatcher = KeyDispatcher::from_config(&KeybindConfig::default()).unwrap();
        assert_eq!(dispatcher.resolve(&KeyEvent::plain("a")), None);
        assert_eq!(dispatcher.resolve(&KeyEvent::ctrl("z")), None);
    }

    #[test]
    fn test_disabled_binding() {
        let mut config = KeybindConfig::default();
        config
            .keybinds
            .insert("select_all".to_string(), KeybindDef::Single("none".to_string()));
        let dispatcher = KeyDispatcher::from_config(&config).unwrap();
        assert_eq!(dispatcher.resolve(&KeyEvent::ctrl("a")), None);
    }

    #[test]
    fn test_custom_binding() {
        let mut config = KeybindConfig::default();
        config.keybinds.insert(
            "copy_links".to_string(),
            KeybindDef::Multiple(vec!["ctrl-shift-c".to_string(), "alt-c".to_string()]),
        );
        let dispatcher = KeyDispatcher::from_config(&config).unwrap();

        let event = KeyEvent {
            key: "C".to_string(),
            ctrl: true,
            shift: true,
            ..KeyEvent::default()
        };
        assert_eq!(dispatcher.resolve(&event), Some(TabAction::CopyLinks));
        assert_eq!(dispatcher.keys_for(TabAction::CopyLinks).len(), 2);
    }

    #[test]
    fn test_invalid_binding_is_error() {
        let mut config = KeybindConfig::default();
        config
            .keybinds
            .insert("copy_links".to_string(), KeybindDef::Single("ctrl-".to_string()));
        assert!(KeyDispatcher::from_config(&config).is_err());
    }
}
