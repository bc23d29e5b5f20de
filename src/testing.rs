//! Testing utilities for tablib
//!
//! Fixture builders for windows, tabs and snapshots so tests can describe an
//! inventory by its shape instead of spelling out every field.
//!
//! Only available when compiled with `cfg(test)`.

use crate::inventory::{Snapshot, Tab, TabId, Window, WindowId};

/// Build a tab with a title and url
#[must_use]
pub fn tab(id: u64, title: &str, url: &str) -> Tab {
    Tab::new(TabId(id), title, url)
}

/// Build a window from already-built tabs
#[must_use]
pub fn window(id: u64, tabs: Vec<Tab>) -> Window {
    Window::new(WindowId(id), tabs)
}

/// Build windows holding the given number of tabs each.
///
/// Window ids start at 1, tab ids are numbered 1.. across all windows in
/// order, titles are `Tab N` and urls `https://example.com/N`.
///
/// # Examples
/// ```ignore
/// let windows = windows_with_counts(&[2, 3]);
/// assert_eq!(windows[1].tabs[0].id, TabId(3));
/// ```
#[must_use]
pub fn windows_with_counts(counts: &[usize]) -> Vec<Window> {
    let mut next_tab = 1;
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let tabs = (0..count)
                .map(|_| {
                    let id = next_tab;
                    next_tab += 1;
                    tab(id, &format!("Tab {id}"), &format!("https://example.com/{id}"))
                })
                .collect();
            window(i as u64 + 1, tabs)
        })
        .collect()
}

/// Same as [`windows_with_counts`], wrapped in a generation-1 snapshot
#[must_use]
pub fn snapshot_with_counts(counts: &[usize]) -> Snapshot {
    Snapshot::new(windows_with_counts(counts), 1)
}

/// Collect tab ids from raw numbers
#[must_use]
pub fn ids(raw: &[u64]) -> Vec<TabId> {
    raw.iter().copied().map(TabId).collect()
}
