//! Link import and export
//!
//! Turns selected tabs into plain, Markdown or HTML link lists for the
//! clipboard, and turns pasted text back into URLs to open.

mod clipboard;
mod export;
mod parse;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, SystemClipboard};
pub use export::{LinkFormat, escape_html, export_links};
pub use parse::parse_links;
