//! Host inventory capability set

use super::{TabId, Window, WindowId};
use thiserror::Error;

/// Errors reported by an inventory provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Tab does not exist (closed, or never existed)
    #[error("No tab with id {0}")]
    TabNotFound(TabId),

    /// Window does not exist
    #[error("No window with id {0}")]
    WindowNotFound(WindowId),

    /// Host refused or failed the operation
    #[error("Host error: {0}")]
    Host(String),

    /// IO error while reading or writing inventory state
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Inventory state could not be (de)serialized
    #[error("Invalid inventory data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where moved tabs land in the target window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovePosition {
    /// Append after the last tab (`index: -1` in browser terms)
    #[default]
    End,
    /// Insert starting at this index
    Index(usize),
}

/// Abstract browser tab/window host.
///
/// Calls are blocking and issued one at a time; callers that depend on
/// ordering (a window must exist before tabs move into it) simply sequence
/// the calls. Multi-call operations are not atomic: a failure part-way
/// leaves whatever partial state the host reached.
pub trait InventoryProvider {
    /// Fetch every window with its ordered tabs
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the host cannot be queried.
    fn list_windows(&self) -> Result<Vec<Window>, ProviderError>;

    /// Bring a window to the front
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::WindowNotFound` for unknown windows.
    fn focus_window(&mut self, window: WindowId) -> Result<(), ProviderError>;

    /// Make a tab the active tab of its window
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::TabNotFound` for unknown tabs.
    fn activate_tab(&mut self, tab: TabId) -> Result<(), ProviderError>;

    /// Close tabs
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the host rejects the request.
    fn close_tabs(&mut self, tabs: &[TabId]) -> Result<(), ProviderError>;

    /// Detach a tab into a brand new window
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the tab is unknown or the window cannot be created.
    fn create_window_with_tab(&mut self, tab: TabId) -> Result<WindowId, ProviderError>;

    /// Open a new window showing `url`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the window cannot be created.
    fn create_window_with_url(&mut self, url: &str) -> Result<WindowId, ProviderError>;

    /// Move tabs (in the given order) into `window`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if a tab or the target window is unknown.
    fn move_tabs(
        &mut self,
        tabs: &[TabId],
        window: WindowId,
        position: MovePosition,
    ) -> Result<(), ProviderError>;

    /// Open `url` in a new tab at the end of `window`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the window is unknown.
    fn create_tab(&mut self, window: WindowId, url: &str) -> Result<TabId, ProviderError>;
}
