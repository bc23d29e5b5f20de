//! Output formatting for CLI display
//!
//! Renders a [`FilteredView`] as indented text: one header per window, one
//! line per tab, with fuzzy matches highlighted.

use crate::app::ViewMode;
use crate::inventory::clean_text;
use crate::search::{FilteredView, Segment, TabMatch, segments, window_label};
use crate::selection::SelectionState;
use colored::Colorize;

/// How tab rows are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowStyle {
    pub view_mode: ViewMode,
    pub show_urls: bool,
    /// Plain url per line, nothing else
    pub quiet: bool,
}

/// Join segments, highlighting the matched runs
#[must_use]
pub fn highlight(parts: &[Segment]) -> String {
    parts
        .iter()
        .map(|s| {
            if s.matched {
                s.text.yellow().bold().to_string()
            } else {
                s.text.clone()
            }
        })
        .collect()
}

fn highlighted(text: &str, positions: &[usize]) -> String {
    if positions.is_empty() {
        return clean_text(text);
    }
    // Positions index the raw text, so whitespace is flattened per char
    let parts: Vec<Segment> = segments(text, positions)
        .into_iter()
        .map(|s| Segment {
            text: s.text.replace(char::is_whitespace, " "),
            matched: s.matched,
        })
        .collect();
    highlight(&parts)
}

/// Format one tab row
#[must_use]
pub fn tab_line(entry: &TabMatch<'_>, selected: bool, style: RowStyle) -> String {
    if style.quiet {
        return entry.tab.url.clone();
    }

    let marker = if selected { "[x]" } else { "[ ]" };
    let active = if entry.tab.active { "*" } else { " " };
    let title = if entry.tab.title.is_empty() {
        "(untitled)".dimmed().to_string()
    } else {
        highlighted(&entry.tab.title, &entry.title_positions)
    };

    let mut line = format!("  {marker}{active}{:>5}  {title}", entry.tab.id.0);
    if style.show_urls {
        let url = highlighted(&entry.tab.url, &entry.url_positions);
        match style.view_mode {
            ViewMode::Cozy => line.push_str(&format!("\n              {}", url.dimmed())),
            ViewMode::Compact | ViewMode::Normal => line.push_str(&format!("  {}", url.dimmed())),
        }
    }
    line
}

/// Format the whole view, windows in ranked order
#[must_use]
pub fn render_view(view: &FilteredView<'_>, selection: &SelectionState, style: RowStyle) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in &view.windows {
        if !style.quiet {
            let mut header = window_label(entry, view.is_filtered()).bold().to_string();
            if entry.window.focused {
                header.push_str(&format!(" {}", "(focused)".green()));
            }
            lines.push(header);
        }
        for tab in &entry.tabs {
            lines.push(tab_line(tab, selection.contains(tab.tab.id), style));
        }
    }
    lines
}
