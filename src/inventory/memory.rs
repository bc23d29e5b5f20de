//! In-process inventory provider
//!
//! Backs the CLI (a JSON snapshot file stands in for the browser) and the
//! test suite. Mirrors the host behaviors the core relies on: new windows
//! take focus, and a window whose last tab leaves it disappears.

use super::provider::{InventoryProvider, MovePosition, ProviderError};
use super::{Tab, TabId, Window, WindowId};
use std::fs;
use std::path::Path;

/// Inventory provider holding windows in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    windows: Vec<Window>,
    next_tab: u64,
    next_window: u64,
    call_budget: Option<usize>,
}

impl MemoryProvider {
    /// Create a provider over the given windows
    #[must_use]
    pub fn new(windows: Vec<Window>) -> Self {
        let next_tab = windows
            .iter()
            .flat_map(|w| w.tabs.iter())
            .map(|t| t.id.0)
            .max()
            .map_or(1, |max| max + 1);
        let next_window = windows.iter().map(|w| w.id.0).max().map_or(1, |max| max + 1);

        Self {
            windows,
            next_tab,
            next_window,
            call_budget: None,
        }
    }

    /// Allow only `calls` more mutating calls; every later one fails.
    #[must_use]
    pub const fn with_call_budget(mut self, calls: usize) -> Self {
        self.call_budget = Some(calls);
        self
    }

    /// Load windows from a JSON snapshot file
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let content = fs::read_to_string(path)?;
        let windows: Vec<Window> = serde_json::from_str(&content)?;
        Ok(Self::new(windows))
    }

    /// Write the current windows back to a JSON snapshot file
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if serialization or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProviderError> {
        let json = serde_json::to_string_pretty(&self.windows)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Current windows
    #[must_use]
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    fn spend(&mut self) -> Result<(), ProviderError> {
        match self.call_budget.as_mut() {
            Some(0) => Err(ProviderError::Host("call budget exhausted".to_string())),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn window_mut(&mut self, id: WindowId) -> Result<&mut Window, ProviderError> {
        self.windows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(ProviderError::WindowNotFound(id))
    }

    fn ensure_tab(&self, tab: TabId) -> Result<(), ProviderError> {
        if self.windows.iter().any(|w| w.contains(tab)) {
            Ok(())
        } else {
            Err(ProviderError::TabNotFound(tab))
        }
    }

    fn detach(&mut self, tab: TabId) -> Result<Tab, ProviderError> {
        for window in &mut self.windows {
            if let Some(pos) = window.position_of(tab) {
                return Ok(window.tabs.remove(pos));
            }
        }
        Err(ProviderError::TabNotFound(tab))
    }

    fn drop_empty_windows(&mut self) {
        self.windows.retain(|w| !w.tabs.is_empty());
    }

    fn open_window(&mut self, tab: Tab) -> WindowId {
        let id = WindowId(self.next_window);
        self.next_window += 1;

        for window in &mut self.windows {
            window.focused = false;
        }
        self.windows.push(Window {
            id,
            focused: true,
            tabs: vec![tab],
        });
        id
    }

    fn new_tab(&mut self, url: &str) -> Tab {
        let id = TabId(self.next_tab);
        self.next_tab += 1;
        Tab::new(id, url, url)
    }
}

impl InventoryProvider for MemoryProvider {
    fn list_windows(&self) -> Result<Vec<Window>, ProviderError> {
        Ok(self.windows.clone())
    }

    fn focus_window(&mut self, window: WindowId) -> Result<(), ProviderError> {
        self.spend()?;
        self.window_mut(window)?;
        for w in &mut self.windows {
            w.focused = w.id == window;
        }
        Ok(())
    }

    fn activate_tab(&mut self, tab: TabId) -> Result<(), ProviderError> {
        self.spend()?;
        self.ensure_tab(tab)?;
        for window in &mut self.windows {
            if window.contains(tab) {
                for t in &mut window.tabs {
                    t.active = t.id == tab;
                }
            }
        }
        Ok(())
    }

    fn close_tabs(&mut self, tabs: &[TabId]) -> Result<(), ProviderError> {
        self.spend()?;
        for tab in tabs {
            self.ensure_tab(*tab)?;
        }
        for window in &mut self.windows {
            window.tabs.retain(|t| !tabs.contains(&t.id));
        }
        self.drop_empty_windows();
        Ok(())
    }

    fn create_window_with_tab(&mut self, tab: TabId) -> Result<WindowId, ProviderError> {
        self.spend()?;
        let tab = self.detach(tab)?;
        self.drop_empty_windows();
        Ok(self.open_window(tab))
    }

    fn create_window_with_url(&mut self, url: &str) -> Result<WindowId, ProviderError> {
        self.spend()?;
        let tab = self.new_tab(url);
        Ok(self.open_window(tab))
    }

    fn move_tabs(
        &mut self,
        tabs: &[TabId],
        window: WindowId,
        position: MovePosition,
    ) -> Result<(), ProviderError> {
        self.spend()?;
        self.window_mut(window)?;
        for tab in tabs {
            self.ensure_tab(*tab)?;
        }

        let mut moving = Vec::with_capacity(tabs.len());
        for tab in tabs {
            moving.push(self.detach(*tab)?);
        }

        let target = self.window_mut(window)?;
        match position {
            MovePosition::End => target.tabs.extend(moving),
            MovePosition::Index(index) => {
                let at = index.min(target.tabs.len());
                target.tabs.splice(at..at, moving);
            }
        }
        self.drop_empty_windows();
        Ok(())
    }

    fn create_tab(&mut self, window: WindowId, url: &str) -> Result<TabId, ProviderError> {
        self.spend()?;
        self.window_mut(window)?;
        let tab = self.new_tab(url);
        let id = tab.id;
        self.window_mut(window)?.tabs.push(tab);
        Ok(id)
    }
}
