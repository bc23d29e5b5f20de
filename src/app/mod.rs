//! Application state and controller

mod controller;
mod state;

pub use controller::{ActionOutcome, AppError, TabManager};
pub use state::{AppState, Modal, OpenMode, ViewMode};
