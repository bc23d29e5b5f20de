//! Format tabs as link lists

use crate::inventory::{Tab, clean_text};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for copied links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkFormat {
    /// One URL per line
    #[default]
    Plain,
    /// `[title](url)` per line
    Markdown,
    /// `<a href="url">title</a>` per line
    Html,
}

impl LinkFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Markdown => "markdown",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for LinkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            other => Err(format!("Unknown link format '{other}' (expected plain, markdown or html)")),
        }
    }
}

/// Render tabs as newline-separated links.
///
/// Markdown labels are flattened to one line with square brackets turned
/// into parentheses, and fall back to the url when nothing is left, so the
/// output parses back into the same url list.
#[must_use]
pub fn export_links(tabs: &[&Tab], format: LinkFormat) -> String {
    tabs.iter()
        .map(|tab| match format {
            LinkFormat::Plain => tab.url.clone(),
            LinkFormat::Markdown => format!("[{}]({})", markdown_label(tab), tab.url),
            LinkFormat::Html => format!("<a href=\"{}\">{}</a>", tab.url, escape_html(&tab.title)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn markdown_label(tab: &Tab) -> String {
    let label = clean_text(&tab.title).replace('[', "(").replace(']', ")");
    if label.is_empty() { tab.url.clone() } else { label }
}

/// Escape `& < > " '` for inclusion in HTML text
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}
