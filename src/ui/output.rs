//! Toast and status output
//!
//! Operations report their outcome through an [`OutputWriter`]. The CLI
//! prints straight to the terminal; an embedding view collects the same
//! messages in a [`ToastQueue`] and shows each one for a few seconds.

use colored::Colorize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Default time a toast stays visible
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(3);

/// Oldest toasts are discarded past this many
const MAX_TOASTS: usize = 32;

/// Sink for user-facing messages
///
/// # Examples
///
/// ```
/// use tablib::ui::output::{OutputWriter, ToastQueue};
///
/// let toasts = ToastQueue::new();
/// toasts.success("Copied 2 links (plain format)");
/// assert_eq!(toasts.latest().unwrap().message, "Copied 2 links (plain format)");
/// ```
pub trait OutputWriter: Send + Sync {
    /// Write a normal message
    fn write(&self, message: &str);

    /// Write an error message
    fn error(&self, message: &str);

    /// Write a success message
    fn success(&self, message: &str);

    /// Write a warning message
    fn warning(&self, message: &str);

    /// Write an info message (dimmed/secondary)
    fn info(&self, message: &str);

    /// Drop anything still on screen
    fn clear(&self);
}

/// Terminal writer used by the CLI
///
/// With `quiet` set only warnings and errors are printed.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutWriter {
    quiet: bool,
}

impl StdoutWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self { quiet: false }
    }

    #[must_use]
    pub const fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl OutputWriter for StdoutWriter {
    fn write(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "❌".red(), message);
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", "✓".green(), message);
        }
    }

    fn warning(&self, message: &str) {
        eprintln!("{} {}", "⚠️".yellow(), message);
    }

    fn info(&self, message: &str) {
        if !self.quiet {
            println!("{}", message.dimmed());
        }
    }

    fn clear(&self) {}
}

/// Message level for categorizing output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Normal,
    Error,
    Success,
    Warning,
    Info,
}

/// A message waiting to be shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: MessageLevel,
    pub message: String,
    posted: Instant,
}

/// Buffered toasts with automatic expiry
///
/// Clones share the same buffer, so one handle can be given to the
/// controller and another kept by the view.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: Arc<Mutex<Vec<Toast>>>,
    ttl: Duration,
}

impl ToastQueue {
    /// Create a queue with the default three second lifetime
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TOAST_TTL)
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            toasts: Arc::new(Mutex::new(Vec::new())),
            ttl,
        }
    }

    /// Toasts that have not expired, oldest first
    #[must_use]
    pub fn active(&self) -> Vec<Toast> {
        let now = Instant::now();
        self.lock()
            .iter()
            .filter(|toast| now.duration_since(toast.posted) < self.ttl)
            .cloned()
            .collect()
    }

    /// The newest toast that has not expired
    #[must_use]
    pub fn latest(&self) -> Option<Toast> {
        let now = Instant::now();
        self.lock()
            .iter()
            .rev()
            .find(|toast| now.duration_since(toast.posted) < self.ttl)
            .cloned()
    }

    /// Every message ever posted and not cleared, ignoring expiry
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().iter().map(|toast| toast.message.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.latest().is_none()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, level: MessageLevel, message: &str) {
        let mut toasts = self.lock();
        toasts.push(Toast {
            level,
            message: message.to_string(),
            posted: Instant::now(),
        });

        if toasts.len() > MAX_TOASTS {
            let excess = toasts.len() - MAX_TOASTS;
            toasts.drain(0..excess);
        }
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputWriter for ToastQueue {
    fn write(&self, message: &str) {
        self.push(MessageLevel::Normal, message);
    }

    fn error(&self, message: &str) {
        self.push(MessageLevel::Error, message);
    }

    fn success(&self, message: &str) {
        self.push(MessageLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.push(MessageLevel::Warning, message);
    }

    fn info(&self, message: &str) {
        self.push(MessageLevel::Info, message);
    }

    fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_levels_in_order() {
        let toasts = ToastQueue::new();

        toasts.success("Copied");
        toasts.error("Failed to close tabs");
        toasts.warning("Careful");

        let active = toasts.active();
        assert_eq!(active.len(), 3);
        assert_eq!(active[0].level, MessageLevel::Success);
        assert_eq!(active[0].message, "Copied");
        assert_eq!(active[1].level, MessageLevel::Error);
        assert_eq!(active[2].level, MessageLevel::Warning);
    }

    #[test]
    fn test_clear() {
        let toasts = ToastQueue::new();
        toasts.write("one");
        toasts.write("two");
        assert_eq!(toasts.len(), 2);

        toasts.clear();
        assert!(toasts.is_empty());
        assert!(toasts.history().is_empty());
    }

    #[test]
    fn test_latest() {
        let toasts = ToastQueue::new();
        toasts.write("First");
        toasts.success("Latest");

        let latest = toasts.latest().unwrap();
        assert_eq!(latest.level, MessageLevel::Success);
        assert_eq!(latest.message, "Latest");
    }

    #[test]
    fn test_expiry() {
        let toasts = ToastQueue::with_ttl(Duration::from_millis(50));
        toasts.write("Message");
        assert_eq!(toasts.len(), 1);

        std::thread::sleep(Duration::from_millis(100));
        assert!(toasts.is_empty());
        assert_eq!(toasts.history(), vec!["Message"]);
    }

    #[test]
    fn test_clones_share_buffer() {
        let toasts = ToastQueue::new();
        let view = toasts.clone();
        toasts.info("shared");
        assert_eq!(view.latest().unwrap().message, "shared");
    }

    #[test]
    fn test_buffer_is_bounded() {
        let toasts = ToastQueue::new();
        for i in 0..(MAX_TOASTS + 10) {
            toasts.write(&i.to_string());
        }
        let history = toasts.history();
        assert_eq!(history.len(), MAX_TOASTS);
        assert_eq!(history[0], "10");
    }
}
