//! User-facing output
//!
//! - **`OutputWriter`** - Status messages with severity levels
//! - **`StdoutWriter`** - Colored terminal output for the CLI
//! - **`ToastQueue`** - Buffered, expiring toasts for an embedding view

pub mod output;

pub use output::{DEFAULT_TOAST_TTL, MessageLevel, OutputWriter, StdoutWriter, Toast, ToastQueue};
