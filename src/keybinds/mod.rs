//! Keyboard shortcuts for the tab list.
//!
//! Key strings from the `[keybinds]` config table are parsed into a lookup
//! table that maps key presses onto [`TabAction`]s.

pub mod actions;
pub mod config;
pub mod dispatch;
pub mod help;

pub use actions::TabAction;
pub use config::{KeybindConfig, KeybindDef};
pub use dispatch::{KeyCombo, KeyDispatcher, KeyEvent, KeyParseError};
