//! The `[keybinds]` config table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key string that turns a binding off
pub const DISABLED: &str = "none";

/// Tab list shortcuts, action id → key(s).
///
/// Only overrides need to be written; an action missing from the table
/// keeps its default keys.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct KeybindConfig {
    pub keybinds: HashMap<String, KeybindDef>,
}

/// One key string, or a list of alternatives
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum KeybindDef {
    Single(String),
    Multiple(Vec<String>),
}

impl KeybindDef {
    fn keys(&self) -> Vec<String> {
        match self {
            Self::Single(key) => vec![key.clone()],
            Self::Multiple(keys) => keys.clone(),
        }
    }

    fn is_disabled(&self) -> bool {
        match self {
            Self::Single(key) => key == DISABLED,
            Self::Multiple(keys) => keys.iter().all(|k| k == DISABLED),
        }
    }
}

impl Default for KeybindConfig {
    fn default() -> Self {
        Self {
            keybinds: default_keybinds(),
        }
    }
}

/// Ctrl+F, Escape, Ctrl+A and Delete; Cmd works wherever Ctrl does.
fn default_keybinds() -> HashMap<String, KeybindDef> {
    [
        ("focus_search", KeybindDef::Single("ctrl-f".into())),
        ("clear_search_or_deselect", KeybindDef::Single("escape".into())),
        ("select_all", KeybindDef::Single("ctrl-a".into())),
        ("close_selected", KeybindDef::Multiple(vec!["delete".into()])),
    ]
    .into_iter()
    .map(|(action, def)| (action.to_string(), def))
    .collect()
}

impl KeybindConfig {
    /// Keys bound to `action`, falling back to its defaults.
    ///
    /// Empty when the action has no keys at all.
    #[must_use]
    pub fn get(&self, action: &str) -> Vec<String> {
        if let Some(def) = self.keybinds.get(action) {
            return def.keys();
        }
        default_keybinds()
            .get(action)
            .map_or_else(Vec::new, KeybindDef::keys)
    }

    /// Whether `action` was explicitly switched off with `"none"`
    #[must_use]
    pub fn is_disabled(&self, action: &str) -> bool {
        self.keybinds.get(action).is_some_and(KeybindDef::is_disabled)
    }
}
