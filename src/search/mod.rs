//! Tab search
//!
//! Fuzzy scoring, filtering and ranking of the inventory, plus the helpers
//! the presentation layer needs to highlight matches and summarize results.

pub mod filter;
pub mod highlight;
pub mod scorer;
pub mod summary;

pub use filter::{FilteredView, SearchMode, TabMatch, WindowMatches, filter_windows};
pub use highlight::{Segment, segments};
pub use scorer::{FuzzyMatch, fuzzy_match};
pub use summary::{plural, summary_label, window_label};
