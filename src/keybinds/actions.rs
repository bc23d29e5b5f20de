//! Named actions that keybinds dispatch to.

/// Actions that can be triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabAction {
    /// Move focus to the search box - Ctrl/Cmd+F
    FocusSearch,
    /// Switch between fuzzy and substring matching
    ToggleSearchMode,
    /// Clear the search, or the selection if there is no search - Escape
    ClearSearchOrDeselect,

    /// Select every visible tab - Ctrl/Cmd+A
    SelectAllVisible,
    /// Clear the selection
    DeselectAll,

    /// Close selected tabs - Delete
    CloseSelected,
    /// Move selected tabs into a new window
    MoveToNewWindow,
    /// Copy selected tabs as links
    CopyLinks,

    /// Open the paste-links dialog
    PasteLinks,
    /// Open the window optimization preview
    OptimizeWindows,
}

impl TabAction {
    /// Every action, in help display order
    pub const ALL: [Self; 10] = [
        Self::FocusSearch,
        Self::ToggleSearchMode,
        Self::ClearSearchOrDeselect,
        Self::SelectAllVisible,
        Self::DeselectAll,
        Self::CloseSelected,
        Self::MoveToNewWindow,
        Self::CopyLinks,
        Self::PasteLinks,
        Self::OptimizeWindows,
    ];

    /// Identifier used as the key in the `[keybinds]` config table
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::FocusSearch => "focus_search",
            Self::ToggleSearchMode => "toggle_search_mode",
            Self::ClearSearchOrDeselect => "clear_search_or_deselect",
            Self::SelectAllVisible => "select_all",
            Self::DeselectAll => "deselect_all",
            Self::CloseSelected => "close_selected",
            Self::MoveToNewWindow => "move_to_new_window",
            Self::CopyLinks => "copy_links",
            Self::PasteLinks => "paste_links",
            Self::OptimizeWindows => "optimize_windows",
        }
    }

    /// Look an action up by its config identifier
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }

    /// Returns whether this action does nothing without a selection.
    #[must_use]
    pub const fn requires_selection(&self) -> bool {
        matches!(
            self,
            Self::CloseSelected | Self::MoveToNewWindow | Self::CopyLinks
        )
    }

    /// Returns a human-readable description of the action.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::FocusSearch => "Focus the search box",
            Self::ToggleSearchMode => "Switch between fuzzy and normal search",
            Self::ClearSearchOrDeselect => "Clear search, or deselect all",
            Self::SelectAllVisible => "Select all visible tabs",
            Self::DeselectAll => "Deselect all tabs",
            Self::CloseSelected => "Close selected tabs",
            Self::MoveToNewWindow => "Move selected tabs to a new window",
            Self::CopyLinks => "Copy selected tabs as links",
            Self::PasteLinks => "Open pasted links",
            Self::OptimizeWindows => "Optimize windows",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_selection() {
        assert!(TabAction::CloseSelected.requires_selection());
        assert!(TabAction::CopyLinks.requires_selection());
        assert!(!TabAction::SelectAllVisible.requires_selection());
        assert!(!TabAction::PasteLinks.requires_selection());
    }

    #[test]
    fn test_id_round_trip() {
        for action in TabAction::ALL {
            assert_eq!(TabAction::from_id(action.id()), Some(action));
        }
        assert_eq!(TabAction::from_id("launch_rockets"), None);
    }

    #[test]
    fn test_description() {
        assert_eq!(TabAction::CloseSelected.description(), "Close selected tabs");
    }
}
