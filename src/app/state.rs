//! Application state and its pure transitions
//!
//! Nothing here talks to the host. [`TabManager`](super::TabManager) owns an
//! `AppState` and is the only thing that mutates it.

use crate::inventory::{Snapshot, Tab, TabId};
use crate::links::LinkFormat;
use crate::optimize::{self, OptimizationPlan, Thresholds};
use crate::search::{FilteredView, SearchMode, filter_windows};
use crate::selection::SelectionState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row density of the tab list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Compact,
    #[default]
    Normal,
    Cozy,
}

impl ViewMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Normal => "normal",
            Self::Cozy => "cozy",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where pasted links are opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenMode {
    #[default]
    NewWindow,
    CurrentWindow,
}

impl OpenMode {
    /// Phrase used in toasts, e.g. `"new window"`
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NewWindow => "new window",
            Self::CurrentWindow => "current window",
        }
    }
}

/// Dialog currently covering the tab list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    None,
    Paste,
    Optimize,
}

/// Everything the tab list view renders from
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub snapshot: Snapshot,
    pub query: String,
    pub mode: SearchMode,
    pub selection: SelectionState,
    /// Present only while the optimize dialog is open
    pub plan: Option<OptimizationPlan>,
    pub thresholds: Thresholds,
    pub view_mode: ViewMode,
    pub show_url_in_compact: bool,
    pub copy_format: LinkFormat,
    pub open_mode: OpenMode,
    pub modal: Modal,
    pub search_focused: bool,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranked and filtered view of the current snapshot
    #[must_use]
    pub fn view(&self) -> FilteredView<'_> {
        filter_windows(&self.snapshot.windows, &self.query, self.mode)
    }

    /// Tab ids in display order
    #[must_use]
    pub fn visible_tab_ids(&self) -> Vec<TabId> {
        self.view().visible_tab_ids()
    }

    /// Selected tabs in inventory order
    #[must_use]
    pub fn selected_tabs(&self) -> Vec<&Tab> {
        self.snapshot.tabs_in_order(self.selection.ids())
    }

    /// Whether tab rows show their url
    #[must_use]
    pub fn shows_urls(&self) -> bool {
        self.view_mode != ViewMode::Compact || self.show_url_in_compact
    }

    /// Replace the snapshot.
    ///
    /// Closed tabs leave the selection. An open plan is recomputed against
    /// the new snapshot so a stale plan can never be applied.
    pub fn set_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.selection.retain_existing(&self.snapshot);
        if self.plan.is_some() {
            self.plan = Some(optimize::plan(&self.snapshot, self.thresholds));
        }
    }

    pub fn set_query(&mut self, query: &str) {
        query.clone_into(&mut self.query);
    }

    pub fn toggle_search_mode(&mut self) -> SearchMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    /// Open the optimize dialog with a fresh plan for `thresholds`
    pub fn open_optimize(&mut self, thresholds: Thresholds) -> &OptimizationPlan {
        self.thresholds = thresholds;
        self.modal = Modal::Optimize;
        self.plan.insert(optimize::plan(&self.snapshot, thresholds))
    }

    pub fn open_paste(&mut self) {
        self.plan = None;
        self.modal = Modal::Paste;
    }

    /// Close whatever dialog is open, discarding any plan
    pub fn close_modal(&mut self) {
        self.modal = Modal::None;
        self.plan = None;
    }

    /// Escape: close a dialog, else clear the search, else clear the selection.
    ///
    /// Takes exactly one step per press. With a dialog open, Escape only
    /// closes it; the search and selection are left for the next press.
    pub fn clear_search_or_deselect(&mut self) {
        if self.modal != Modal::None {
            self.close_modal();
        } else if !self.query.is_empty() {
            self.query.clear();
        } else {
            self.selection.deselect_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{Snapshot, TabId};
    use crate::selection::ClickModifiers;
    use crate::testing::{snapshot_with_counts, windows_with_counts};

    fn state_with(counts: &[usize]) -> AppState {
        let mut state = AppState::new();
        state.set_snapshot(snapshot_with_counts(counts));
        state
    }

    #[test]
    fn test_snapshot_prunes_selection() {
        let mut state = state_with(&[2, 2]);
        state.selection.select_all_visible(&[TabId(1), TabId(3)]);

        let mut windows = windows_with_counts(&[2, 2]);
        windows[1].tabs.remove(0);
        state.set_snapshot(Snapshot::new(windows, 2));

        assert!(state.selection.contains(TabId(1)));
        assert!(!state.selection.contains(TabId(3)));
    }

    #[test]
    fn test_snapshot_recomputes_open_plan() {
        let mut state = state_with(&[2, 3, 8]);
        let before = state.open_optimize(Thresholds::default()).clone();
        assert_eq!(before.actions.len(), 1);

        state.set_snapshot(Snapshot::new(windows_with_counts(&[2, 3, 20]), 2));
        let after = state.plan.as_ref().unwrap();
        assert_eq!(after.generation, 2);
        assert_eq!(after.actions.len(), 2);
    }

    #[test]
    fn test_snapshot_without_plan_keeps_none() {
        let mut state = state_with(&[2, 3]);
        state.set_snapshot(snapshot_with_counts(&[2, 3]));
        assert!(state.plan.is_none());
    }

    #[test]
    fn test_escape_order() {
        let mut state = state_with(&[3]);
        let visible = state.visible_tab_ids();
        state.selection.click(TabId(1), ClickModifiers::NONE, &visible);
        state.set_query("tab");
        state.open_paste();

        state.clear_search_or_deselect();
        assert_eq!(state.modal, Modal::None);
        assert_eq!(state.query, "tab");

        state.clear_search_or_deselect();
        assert!(state.query.is_empty());
        assert_eq!(state.selection.len(), 1);

        state.clear_search_or_deselect();
        assert!(state.selection.is_empty());
    }

    #[test]
    fn test_close_modal_discards_plan() {
        let mut state = state_with(&[1, 1]);
        state.open_optimize(Thresholds::default());
        assert!(state.plan.is_some());
        state.close_modal();
        assert!(state.plan.is_none());
    }

    #[test]
    fn test_selected_tabs_in_inventory_order() {
        let mut state = state_with(&[2, 2]);
        state.selection.toggle(TabId(4));
        state.selection.toggle(TabId(1));
        let urls: Vec<&str> = state.selected_tabs().iter().map(|t| t.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/1", "https://example.com/4"]);
    }

    #[test]
    fn test_shows_urls() {
        let mut state = AppState::new();
        assert!(state.shows_urls());
        state.view_mode = ViewMode::Compact;
        assert!(!state.shows_urls());
        state.show_url_in_compact = true;
        assert!(state.shows_urls());
    }

    #[test]
    fn test_open_mode_serde() {
        assert_eq!(serde_json::to_string(&OpenMode::CurrentWindow).unwrap(), "\"current-window\"");
        assert_eq!(OpenMode::NewWindow.label(), "new window");
    }
}
