//! Filter and rank engine
//!
//! Applies the active query to every tab of every window and produces the
//! view the presentation layer renders:
//!
//! - **empty query**: every tab, original order everywhere
//! - **substring**: tabs whose title or url contains the query, original order
//! - **fuzzy**: tabs whose title or url fuzzy-matches, tabs sorted by score
//!   inside each window and windows sorted by their best tab
//!
//! Windows left without any entry are dropped from the view.

use super::scorer::{FuzzyMatch, fuzzy_match};
use crate::inventory::{Tab, TabId, Window};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How the query is matched against tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Subsequence matching with scoring and ranking
    #[default]
    Fuzzy,
    /// Case-insensitive substring matching, no reordering
    Substring,
}

impl SearchMode {
    /// The other mode
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Fuzzy => Self::Substring,
            Self::Substring => Self::Fuzzy,
        }
    }

    /// Short label for mode toggles
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fuzzy => "Fuzzy",
            Self::Substring => "Normal",
        }
    }
}

/// A tab that survived filtering
#[derive(Debug, Clone, PartialEq)]
pub struct TabMatch<'a> {
    pub tab: &'a Tab,
    /// Position of the tab in its window before any reordering
    pub tab_index: usize,
    pub score: f64,
    /// Matched char positions in the lower-cased title (fuzzy only)
    pub title_positions: Vec<usize>,
    /// Matched char positions in the lower-cased url (fuzzy only)
    pub url_positions: Vec<usize>,
}

impl<'a> TabMatch<'a> {
    const fn plain(tab: &'a Tab, tab_index: usize) -> Self {
        Self {
            tab,
            tab_index,
            score: 0.0,
            title_positions: Vec::new(),
            url_positions: Vec::new(),
        }
    }
}

/// A window with its matching tabs
#[derive(Debug, Clone, PartialEq)]
pub struct WindowMatches<'a> {
    pub window: &'a Window,
    /// Position of the window in the inventory before any reordering
    pub window_index: usize,
    pub tabs: Vec<TabMatch<'a>>,
    /// Best tab score in this window (0 when unscored)
    pub best_score: f64,
}

/// Ranked, filtered view of the inventory
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredView<'a> {
    pub windows: Vec<WindowMatches<'a>>,
    /// Distinct tabs in the view
    pub matched_tabs: usize,
    /// Windows with at least one tab in the view
    pub matched_windows: usize,
    filtered: bool,
}

impl FilteredView<'_> {
    /// Whether a query was active when this view was built
    #[must_use]
    pub const fn is_filtered(&self) -> bool {
        self.filtered
    }

    /// Tab ids in display order, flattened across windows
    #[must_use]
    pub fn visible_tab_ids(&self) -> Vec<TabId> {
        self.windows
            .iter()
            .flat_map(|w| w.tabs.iter().map(|m| m.tab.id))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Filter and rank `windows` against `query`.
#[must_use]
pub fn filter_windows<'a>(windows: &'a [Window], query: &str, mode: SearchMode) -> FilteredView<'a> {
    let filtered = !query.is_empty();
    let needle = query.to_lowercase();

    let mut entries: Vec<WindowMatches<'a>> = windows
        .iter()
        .enumerate()
        .filter_map(|(window_index, window)| {
            let mut tabs: Vec<TabMatch<'a>> = window
                .tabs
                .iter()
                .enumerate()
                .filter_map(|(tab_index, tab)| {
                    if !filtered {
                        return Some(TabMatch::plain(tab, tab_index));
                    }
                    match mode {
                        SearchMode::Fuzzy => fuzzy_entry(tab, tab_index, query),
                        SearchMode::Substring => substring_matches(tab, &needle)
                            .then(|| TabMatch::plain(tab, tab_index)),
                    }
                })
                .collect();

            if tabs.is_empty() {
                return None;
            }

            let ranked = filtered && mode == SearchMode::Fuzzy;
            if ranked {
                tabs.sort_by(|a, b| b.score.total_cmp(&a.score));
            }

            let best_score = tabs
                .iter()
                .map(|m| m.score)
                .fold(f64::NEG_INFINITY, f64::max);

            Some(WindowMatches {
                window,
                window_index,
                tabs,
                best_score,
            })
        })
        .collect();

    if filtered && mode == SearchMode::Fuzzy {
        entries.sort_by(|a, b| b.best_score.total_cmp(&a.best_score));
    }

    let distinct: HashSet<TabId> = entries
        .iter()
        .flat_map(|w| w.tabs.iter().map(|m| m.tab.id))
        .collect();

    log::debug!(
        "filter {query:?} ({mode:?}): {} tabs in {} windows",
        distinct.len(),
        entries.len()
    );

    FilteredView {
        matched_tabs: distinct.len(),
        matched_windows: entries.len(),
        windows: entries,
        filtered,
    }
}

fn substring_matches(tab: &Tab, needle: &str) -> bool {
    tab.title.to_lowercase().contains(needle) || tab.url.to_lowercase().contains(needle)
}

fn fuzzy_entry<'a>(tab: &'a Tab, tab_index: usize, query: &str) -> Option<TabMatch<'a>> {
    let title = fuzzy_match(&tab.title, query);
    let url = fuzzy_match(&tab.url, query);
    if title.is_none() && url.is_none() {
        return None;
    }

    let score_of = |m: &Option<FuzzyMatch>| m.as_ref().map_or(f64::NEG_INFINITY, |m| m.score);
    let score = score_of(&title).max(score_of(&url));

    Some(TabMatch {
        tab,
        tab_index,
        score,
        title_positions: title.map(|m| m.positions).unwrap_or_default(),
        url_positions: url.map(|m| m.positions).unwrap_or_default(),
    })
}
