//! Clipboard access

use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Clipboard failures
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// No clipboard could be opened (headless session, missing display)
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard rejected the write
    #[error("Clipboard error: {0}")]
    Write(String),
}

/// Somewhere copied links can be written to
pub trait Clipboard {
    /// Replace the clipboard contents with `text`
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError` if the clipboard cannot be opened or written.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard, opened per write
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

/// In-memory clipboard for tests and headless use
///
/// Clones share the same contents, so a handle kept outside the
/// controller sees what the controller copied.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
    broken: bool,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose every write fails
    #[must_use]
    pub fn broken() -> Self {
        Self {
            contents: Arc::default(),
            broken: true,
        }
    }

    /// Last text written, if any
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.broken {
            return Err(ClipboardError::Unavailable("clipboard disabled".to_string()));
        }
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard() {
        let mut clipboard = MemoryClipboard::new();
        assert!(clipboard.contents().is_none());
        clipboard.set_text("hello").unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("hello"));
    }

    #[test]
    fn test_memory_clipboard_clones_share_contents() {
        let reader = MemoryClipboard::new();
        let mut writer = reader.clone();
        writer.set_text("shared").unwrap();
        assert_eq!(reader.contents().as_deref(), Some("shared"));
    }

    #[test]
    fn test_broken_clipboard() {
        let mut clipboard = MemoryClipboard::broken();
        assert!(matches!(clipboard.set_text("x"), Err(ClipboardError::Unavailable(_))));
        assert!(clipboard.contents().is_none());
    }
}
