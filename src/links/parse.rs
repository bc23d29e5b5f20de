//! Extract URLs from pasted text
//!
//! Accepts plain URLs, Markdown links and HTML anchors, one or more per
//! line. Each line is tried against the formats in that order and the first
//! format that yields anything wins for that line.

use regex::Regex;
use std::sync::OnceLock;

static PLAIN_URL_REGEX: OnceLock<Regex> = OnceLock::new();
static MARKDOWN_LINK_REGEX: OnceLock<Regex> = OnceLock::new();
static HTML_HREF_REGEX: OnceLock<Regex> = OnceLock::new();

fn plain_url_regex() -> &'static Regex {
    PLAIN_URL_REGEX
        .get_or_init(|| Regex::new(r"^https?://.+").expect("Failed to compile plain URL regex"))
}

fn markdown_link_regex() -> &'static Regex {
    MARKDOWN_LINK_REGEX.get_or_init(|| {
        // [label](url)
        Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("Failed to compile Markdown link regex")
    })
}

fn html_href_regex() -> &'static Regex {
    HTML_HREF_REGEX.get_or_init(|| {
        // href="url" or href='url'
        Regex::new(r#"href=["']([^"']+)["']"#).expect("Failed to compile href regex")
    })
}

/// Parse every URL out of `text`, in order of appearance.
///
/// Lines that contain nothing recognizable are skipped silently.
///
/// # Examples
///
/// ```
/// use tablib::links::parse_links;
///
/// let urls = parse_links("https://a.com\n[Title](https://b.com)\n<a href='https://c.com'>x</a>");
/// assert_eq!(urls, vec!["https://a.com", "https://b.com", "https://c.com"]);
/// ```
#[must_use]
pub fn parse_links(text: &str) -> Vec<String> {
    text.trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .flat_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Vec<String> {
    if plain_url_regex().is_match(line) {
        return vec![line.to_string()];
    }

    let markdown: Vec<String> = markdown_link_regex()
        .captures_iter(line)
        .map(|caps| caps[2].to_string())
        .collect();
    if !markdown.is_empty() {
        return markdown;
    }

    html_href_regex()
        .captures_iter(line)
        .map(|caps| caps[1].to_string())
        .collect()
}
