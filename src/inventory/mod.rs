//! Browser inventory model
//!
//! Read-only snapshots of the host's windows and tabs. The host owns the
//! real objects; the core only ever looks at a [`Snapshot`] fetched through
//! an [`InventoryProvider`] and throws it away on the next refresh.
//!
//! Tab order inside a window is meaningful: it drives display order,
//! range selection and the chunking done by the window optimizer.

mod memory;
mod provider;

pub use memory::MemoryProvider;
pub use provider::{InventoryProvider, MovePosition, ProviderError};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Opaque tab identifier, stable for the lifetime of the tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u64);

/// Opaque window identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single browser tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "favIconUrl", skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl Tab {
    /// Create a tab with the given id, title and url
    #[must_use]
    pub fn new(id: TabId, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            url: url.into(),
            fav_icon_url: None,
            active: false,
        }
    }
}

/// A browser window with its ordered tabs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub id: WindowId,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

impl Window {
    #[must_use]
    pub const fn new(id: WindowId, tabs: Vec<Tab>) -> Self {
        Self {
            id,
            focused: false,
            tabs,
        }
    }

    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    #[must_use]
    pub fn contains(&self, tab: TabId) -> bool {
        self.tabs.iter().any(|t| t.id == tab)
    }

    /// Ordinal position of a tab within this window
    #[must_use]
    pub fn position_of(&self, tab: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab)
    }

    /// Ids of all tabs, in window order
    pub fn tab_ids(&self) -> impl Iterator<Item = TabId> + '_ {
        self.tabs.iter().map(|t| t.id)
    }
}

/// A full inventory fetch.
///
/// `generation` increases on every refresh so that anything derived from a
/// snapshot (an optimization plan, for instance) can tell whether it is stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub windows: Vec<Window>,
    pub generation: u64,
}

impl Snapshot {
    #[must_use]
    pub const fn new(windows: Vec<Window>, generation: u64) -> Self {
        Self {
            windows,
            generation,
        }
    }

    #[must_use]
    pub fn total_tabs(&self) -> usize {
        self.windows.iter().map(Window::tab_count).sum()
    }

    #[must_use]
    pub fn find_window(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    /// Window that currently owns `tab`
    #[must_use]
    pub fn window_of(&self, tab: TabId) -> Option<&Window> {
        self.windows.iter().find(|w| w.contains(tab))
    }

    #[must_use]
    pub fn contains_tab(&self, tab: TabId) -> bool {
        self.window_of(tab).is_some()
    }

    /// Tabs whose id is in `ids`, in inventory order
    #[must_use]
    pub fn tabs_in_order(&self, ids: &HashSet<TabId>) -> Vec<&Tab> {
        self.windows
            .iter()
            .flat_map(|w| w.tabs.iter())
            .filter(|t| ids.contains(&t.id))
            .collect()
    }

    /// The focused window, falling back to the first one
    #[must_use]
    pub fn current_window(&self) -> Option<&Window> {
        self.windows
            .iter()
            .find(|w| w.focused)
            .or_else(|| self.windows.first())
    }
}

/// Collapse whitespace runs (including newlines) into single spaces and trim.
#[must_use]
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::snapshot_with_counts;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Hello\n\t world  "), "Hello world");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("\n\n"), "");
    }

    #[test]
    fn test_window_lookup() {
        let snapshot = snapshot_with_counts(&[2, 3]);
        let second = &snapshot.windows[1];
        let tab = second.tabs[1].id;

        assert_eq!(snapshot.window_of(tab).map(|w| w.id), Some(second.id));
        assert_eq!(second.position_of(tab), Some(1));
        assert!(snapshot.window_of(TabId(999)).is_none());
        assert_eq!(snapshot.total_tabs(), 5);
    }

    #[test]
    fn test_tabs_in_order_follows_inventory() {
        let snapshot = snapshot_with_counts(&[2, 2]);
        let ids: HashSet<TabId> = [snapshot.windows[1].tabs[0].id, snapshot.windows[0].tabs[1].id]
            .into_iter()
            .collect();

        let tabs = snapshot.tabs_in_order(&ids);
        assert_eq!(tabs[0].id, snapshot.windows[0].tabs[1].id);
        assert_eq!(tabs[1].id, snapshot.windows[1].tabs[0].id);
    }

    #[test]
    fn test_current_window_prefers_focused() {
        let mut snapshot = snapshot_with_counts(&[1, 1]);
        assert_eq!(snapshot.current_window().map(|w| w.id), Some(snapshot.windows[0].id));

        snapshot.windows[1].focused = true;
        assert_eq!(snapshot.current_window().map(|w| w.id), Some(snapshot.windows[1].id));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let json = r#"[{"id": 7, "focused": true, "tabs": [{"id": 1, "title": "A", "url": "https://a.com", "favIconUrl": "https://a.com/f.ico"}]}]"#;
        let windows: Vec<Window> = serde_json::from_str(json).unwrap();
        assert_eq!(windows[0].id, WindowId(7));
        assert!(windows[0].focused);
        assert_eq!(windows[0].tabs[0].fav_icon_url.as_deref(), Some("https://a.com/f.ico"));
        assert!(!windows[0].tabs[0].active);
    }
}
