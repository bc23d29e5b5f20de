//! Multi-select state machine
//!
//! Tracks the selected tab ids and the anchor used for shift-click ranges.
//!
//! | input            | selection                               | anchor     |
//! |------------------|-----------------------------------------|------------|
//! | click            | toggle clicked tab                      | clicked    |
//! | ctrl/cmd-click   | unchanged (host activates the tab)      | unchanged  |
//! | shift-click      | range anchor..clicked over visible list | unchanged  |
//! | shift, no anchor | toggle clicked tab                      | clicked    |
//!
//! Ranges are measured over the *visible* list, so the same anchor produces
//! different ranges under different filters. An anchor that is not visible
//! counts as no anchor.

use crate::inventory::{Snapshot, TabId, Window};
use std::collections::HashSet;

/// Modifier keys held during a tab activation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    pub ctrl: bool,
    /// Cmd on macOS
    pub meta: bool,
    pub shift: bool,
}

impl ClickModifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        shift: false,
    };
    pub const SHIFT: Self = Self {
        ctrl: false,
        meta: false,
        shift: true,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        meta: false,
        shift: false,
    };

    /// The single logical branch these modifiers select
    #[must_use]
    pub const fn kind(self) -> ClickKind {
        if self.ctrl || self.meta {
            ClickKind::Activate
        } else if self.shift {
            ClickKind::Range
        } else {
            ClickKind::Plain
        }
    }
}

/// Logical meaning of a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Plain,
    Activate,
    Range,
}

/// What the caller has to do after a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Selection (possibly) changed; re-render
    Updated,
    /// Ask the host to activate this tab and focus its window
    Activate(TabId),
}

/// Selected tabs plus the range anchor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: HashSet<TabId>,
    anchor: Option<TabId>,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, tab: TabId) -> bool {
        self.selected.contains(&tab)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    #[must_use]
    pub const fn ids(&self) -> &HashSet<TabId> {
        &self.selected
    }

    #[must_use]
    pub const fn anchor(&self) -> Option<TabId> {
        self.anchor
    }

    /// Interpret a click on `tab` given the currently visible tab order.
    pub fn click(&mut self, tab: TabId, modifiers: ClickModifiers, visible: &[TabId]) -> ClickOutcome {
        match modifiers.kind() {
            ClickKind::Activate => ClickOutcome::Activate(tab),
            ClickKind::Plain => {
                self.toggle(tab);
                self.anchor = Some(tab);
                ClickOutcome::Updated
            }
            ClickKind::Range => {
                self.range_click(tab, visible);
                ClickOutcome::Updated
            }
        }
    }

    fn range_click(&mut self, tab: TabId, visible: &[TabId]) {
        let anchor_pos = self
            .anchor
            .and_then(|anchor| visible.iter().position(|&id| id == anchor));
        let target_pos = visible.iter().position(|&id| id == tab);

        match (anchor_pos, target_pos) {
            (Some(from), Some(to)) => {
                let (start, end) = if from <= to { (from, to) } else { (to, from) };
                self.selected.clear();
                self.selected.extend(visible[start..=end].iter().copied());
                log::debug!("range select {} tabs", end - start + 1);
            }
            _ => {
                self.toggle(tab);
                self.anchor = Some(tab);
            }
        }
    }

    /// Flip membership of one tab without touching the anchor (checkbox)
    pub fn toggle(&mut self, tab: TabId) {
        if !self.selected.remove(&tab) {
            self.selected.insert(tab);
        }
    }

    /// Add every visible tab; nothing is removed
    pub fn select_all_visible(&mut self, visible: &[TabId]) {
        self.selected.extend(visible.iter().copied());
    }

    /// Clear the selection. The anchor is kept, so a following shift-click
    /// still ranges from it.
    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Whether every tab of a non-empty window is selected
    #[must_use]
    pub fn is_window_fully_selected(&self, window: &Window) -> bool {
        !window.tabs.is_empty() && window.tab_ids().all(|id| self.selected.contains(&id))
    }

    /// Deselect the whole window if fully selected, otherwise select all of it.
    pub fn toggle_window(&mut self, window: &Window) {
        if window.tab_ids().all(|id| self.selected.contains(&id)) {
            for id in window.tab_ids() {
                self.selected.remove(&id);
            }
        } else {
            self.selected.extend(window.tab_ids());
        }
    }

    /// Forget a tab that was closed
    pub fn remove(&mut self, tab: TabId) {
        self.selected.remove(&tab);
    }

    /// Drop ids of tabs that no longer exist in `snapshot`
    pub fn retain_existing(&mut self, snapshot: &Snapshot) {
        let before = self.selected.len();
        self.selected.retain(|&id| snapshot.contains_tab(id));
        let dropped = before - self.selected.len();
        if dropped > 0 {
            log::debug!("dropped {dropped} vanished tabs from selection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ids, snapshot_with_counts, tab, window};

    fn set(raw: &[u64]) -> HashSet<TabId> {
        ids(raw).into_iter().collect()
    }

    #[test]
    fn test_plain_click_toggles_and_anchors() {
        let visible = ids(&[1, 2, 3, 4]);
        let mut sel = SelectionState::new();

        assert_eq!(sel.click(TabId(1), ClickModifiers::NONE, &visible), ClickOutcome::Updated);
        assert_eq!(sel.ids(), &set(&[1]));
        assert_eq!(sel.anchor(), Some(TabId(1)));

        sel.click(TabId(1), ClickModifiers::NONE, &visible);
        assert!(sel.is_empty());
        assert_eq!(sel.anchor(), Some(TabId(1)));
    }

    #[test]
    fn test_shift_range_extends_and_shrinks_from_anchor() {
        let visible = ids(&[1, 2, 3, 4]);
        let mut sel = SelectionState::new();

        sel.click(TabId(1), ClickModifiers::NONE, &visible);
        sel.click(TabId(3), ClickModifiers::SHIFT, &visible);
        assert_eq!(sel.ids(), &set(&[1, 2, 3]));
        assert_eq!(sel.anchor(), Some(TabId(1)));

        sel.click(TabId(2), ClickModifiers::SHIFT, &visible);
        assert_eq!(sel.ids(), &set(&[1, 2]));
        assert_eq!(sel.anchor(), Some(TabId(1)));
    }

    #[test]
    fn test_shift_range_backwards() {
        let visible = ids(&[1, 2, 3, 4]);
        let mut sel = SelectionState::new();

        sel.click(TabId(4), ClickModifiers::NONE, &visible);
        sel.click(TabId(2), ClickModifiers::SHIFT, &visible);
        assert_eq!(sel.ids(), &set(&[2, 3, 4]));
    }

    #[test]
    fn test_range_replaces_previous_selection() {
        let visible = ids(&[1, 2, 3, 4, 5]);
        let mut sel = SelectionState::new();

        sel.click(TabId(5), ClickModifiers::NONE, &visible);
        sel.click(TabId(2), ClickModifiers::NONE, &visible);
        sel.click(TabId(3), ClickModifiers::SHIFT, &visible);
        assert_eq!(sel.ids(), &set(&[2, 3]));
    }

    #[test]
    fn test_first_shift_click_without_anchor() {
        let visible = ids(&[1, 2, 3]);
        let mut sel = SelectionState::new();

        sel.click(TabId(2), ClickModifiers::SHIFT, &visible);
        assert_eq!(sel.ids(), &set(&[2]));
        assert_eq!(sel.anchor(), Some(TabId(2)));
    }

    #[test]
    fn test_hidden_anchor_degrades_to_toggle() {
        let mut sel = SelectionState::new();
        sel.click(TabId(1), ClickModifiers::NONE, &ids(&[1, 2, 3]));

        // A filter now hides tab 1
        let visible = ids(&[2, 3]);
        sel.click(TabId(3), ClickModifiers::SHIFT, &visible);
        assert_eq!(sel.ids(), &set(&[1, 3]));
        assert_eq!(sel.anchor(), Some(TabId(3)));
    }

    #[test]
    fn test_ctrl_click_is_pass_through() {
        let visible = ids(&[1, 2]);
        let mut sel = SelectionState::new();
        sel.click(TabId(1), ClickModifiers::NONE, &visible);

        let both = ClickModifiers {
            ctrl: false,
            meta: true,
            shift: true,
        };
        assert_eq!(sel.click(TabId(2), both, &visible), ClickOutcome::Activate(TabId(2)));
        assert_eq!(sel.click(TabId(2), ClickModifiers::CTRL, &visible), ClickOutcome::Activate(TabId(2)));
        assert_eq!(sel.ids(), &set(&[1]));
        assert_eq!(sel.anchor(), Some(TabId(1)));
    }

    #[test]
    fn test_select_all_visible_is_additive() {
        let mut sel = SelectionState::new();
        sel.toggle(TabId(9));
        sel.select_all_visible(&ids(&[1, 2]));
        assert_eq!(sel.ids(), &set(&[1, 2, 9]));
        assert_eq!(sel.anchor(), None);
    }

    #[test]
    fn test_deselect_all_keeps_anchor() {
        let visible = ids(&[1, 2, 3]);
        let mut sel = SelectionState::new();
        sel.click(TabId(1), ClickModifiers::NONE, &visible);
        sel.deselect_all();
        assert!(sel.is_empty());

        sel.click(TabId(3), ClickModifiers::SHIFT, &visible);
        assert_eq!(sel.ids(), &set(&[1, 2, 3]));
    }

    #[test]
    fn test_toggle_window_on_full_coverage() {
        let w = window(1, vec![tab(1, "a", "a"), tab(2, "b", "b"), tab(3, "c", "c")]);
        let mut sel = SelectionState::new();
        sel.toggle(TabId(2));

        sel.toggle_window(&w);
        assert_eq!(sel.ids(), &set(&[1, 2, 3]));
        assert!(sel.is_window_fully_selected(&w));

        sel.toggle_window(&w);
        assert!(sel.is_empty());
        assert!(!sel.is_window_fully_selected(&w));
    }

    #[test]
    fn test_empty_window_is_never_fully_selected() {
        let w = window(1, vec![]);
        let mut sel = SelectionState::new();
        sel.toggle_window(&w);
        assert!(sel.is_empty());
        assert!(!sel.is_window_fully_selected(&w));
    }

    #[test]
    fn test_retain_existing_drops_closed_tabs() {
        let snapshot = snapshot_with_counts(&[2]);
        let mut sel = SelectionState::new();
        sel.click(TabId(7), ClickModifiers::NONE, &ids(&[7]));
        sel.toggle(TabId(1));

        sel.retain_existing(&snapshot);
        assert_eq!(sel.ids(), &set(&[1]));
        assert_eq!(sel.anchor(), Some(TabId(7)));

        sel.remove(TabId(1));
        assert!(sel.is_empty());
    }
}
