//! Tablib - browser tab manager core
//!
//! This library holds the client-side logic of a tab manager: fuzzy and
//! substring search over open windows and tabs, multi-select with click
//! modifiers, bulk operations (close, move, copy as links, paste to open)
//! and a window optimizer that merges sparse windows and splits overfull
//! ones. The host browser is reached only through
//! [`inventory::InventoryProvider`].

use thiserror::Error;

pub mod app;
pub mod cli;
pub mod config;
pub mod inventory;
pub mod keybinds;
pub mod links;
pub mod notify;
pub mod optimize;
pub mod output;
pub mod search;
pub mod selection;
pub mod ui;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum TablibError {
    /// Tab inventory error
    #[error("Inventory error: {0}")]
    Provider(#[from] inventory::ProviderError),
    /// Window optimization error
    #[error("Optimization error: {0}")]
    Plan(#[from] optimize::PlanError),
    /// Clipboard error
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] links::ClipboardError),
    /// Change notification error
    #[error("Notification error: {0}")]
    Notify(#[from] notify::NotifyError),
    /// Keybind parse error
    #[error("Keybind error: {0}")]
    Keybind(#[from] keybinds::KeyParseError),
    /// Controller error
    #[error(transparent)]
    App(#[from] app::AppError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Interactive prompt error
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
