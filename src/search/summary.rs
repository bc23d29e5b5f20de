//! Result summary labels

use super::filter::{FilteredView, WindowMatches};
use crate::inventory::Snapshot;

/// `"1 tab"` / `"3 tabs"`
#[must_use]
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Results summary, e.g. `"4 tabs in 2 windows"`.
///
/// With a filter active the counts are the matches; otherwise they are the
/// inventory totals.
#[must_use]
pub fn summary_label(view: &FilteredView<'_>, snapshot: &Snapshot) -> String {
    let (tabs, windows) = if view.is_filtered() {
        (view.matched_tabs, view.matched_windows)
    } else {
        (snapshot.total_tabs(), snapshot.windows.len())
    };
    format!("{} in {}", plural(tabs, "tab"), plural(windows, "window"))
}

/// Window header, e.g. `"Window 2 (3 matching tabs)"`.
///
/// Windows are numbered by their inventory position, not their rank.
#[must_use]
pub fn window_label(entry: &WindowMatches<'_>, filtered: bool) -> String {
    let count = entry.tabs.len();
    let noun = if filtered { "matching tab" } else { "tab" };
    format!("Window {} ({})", entry.window_index + 1, plural(count, noun))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchMode, filter_windows};
    use crate::testing::snapshot_with_counts;

    #[test]
    fn test_plural() {
        assert_eq!(plural(0, "tab"), "0 tabs");
        assert_eq!(plural(1, "tab"), "1 tab");
        assert_eq!(plural(2, "window"), "2 windows");
    }

    #[test]
    fn test_unfiltered_summary_uses_totals() {
        let snapshot = snapshot_with_counts(&[2, 0, 1]);
        let view = filter_windows(&snapshot.windows, "", SearchMode::Fuzzy);
        assert_eq!(summary_label(&view, &snapshot), "3 tabs in 3 windows");
    }

    #[test]
    fn test_filtered_summary_and_window_label() {
        let snapshot = snapshot_with_counts(&[2, 2]);
        // Only "Tab 3" contains a 3
        let view = filter_windows(&snapshot.windows, "3", SearchMode::Substring);
        assert_eq!(summary_label(&view, &snapshot), "1 tab in 1 window");
        assert_eq!(window_label(&view.windows[0], true), "Window 2 (1 matching tab)");
    }
}
