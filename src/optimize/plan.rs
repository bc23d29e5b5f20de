//! Optimization planning

use super::PlanError;
use crate::inventory::{Snapshot, Window, WindowId};
use serde::{Deserialize, Serialize};
use std::fmt;

const DEFAULT_MIN_TABS: usize = 5;
const DEFAULT_MAX_TABS: usize = 15;

/// Tab-count band windows should stay within.
///
/// Always satisfies `1 <= min_tabs <= max_tabs`; every constructor and
/// deserialization checks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ThresholdFields")]
pub struct Thresholds {
    min_tabs: usize,
    max_tabs: usize,
}

/// Unchecked `[optimize]` table; zero or missing values take the defaults
#[derive(Deserialize)]
struct ThresholdFields {
    #[serde(default)]
    min_tabs: usize,
    #[serde(default)]
    max_tabs: usize,
}

impl TryFrom<ThresholdFields> for Thresholds {
    type Error = PlanError;

    fn try_from(fields: ThresholdFields) -> Result<Self, Self::Error> {
        let or_default = |value: usize, default: usize| if value == 0 { default } else { value };
        Self::new(
            or_default(fields.min_tabs, DEFAULT_MIN_TABS),
            or_default(fields.max_tabs, DEFAULT_MAX_TABS),
        )
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_tabs: DEFAULT_MIN_TABS,
            max_tabs: DEFAULT_MAX_TABS,
        }
    }
}

impl Thresholds {
    /// Validated thresholds
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidThresholds` if either bound is zero or
    /// `min_tabs > max_tabs`.
    pub fn new(min_tabs: usize, max_tabs: usize) -> Result<Self, PlanError> {
        if min_tabs == 0 || min_tabs > max_tabs {
            return Err(PlanError::InvalidThresholds {
                min: min_tabs,
                max: max_tabs,
            });
        }
        Ok(Self { min_tabs, max_tabs })
    }

    /// Build thresholds from raw form fields.
    ///
    /// A blank, non-numeric or zero field falls back to its default (5 and 15).
    /// Leading digits are honored, so `"7 tabs"` reads as 7.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidThresholds` if the resulting minimum
    /// exceeds the maximum.
    pub fn from_fields(min: &str, max: &str) -> Result<Self, PlanError> {
        let min_tabs = parse_field(min).unwrap_or(DEFAULT_MIN_TABS);
        let max_tabs = parse_field(max).unwrap_or(DEFAULT_MAX_TABS);
        Self::new(min_tabs, max_tabs)
    }

    /// Windows with fewer tabs are merged
    #[must_use]
    pub const fn min_tabs(self) -> usize {
        self.min_tabs
    }

    /// Windows with more tabs are split; never zero
    #[must_use]
    pub const fn max_tabs(self) -> usize {
        self.max_tabs
    }
}

fn parse_field(raw: &str) -> Option<usize> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok().filter(|&n| n > 0)
}

/// One step of an optimization plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    /// Merge every under-filled window into one
    Merge { window_count: usize, tab_count: usize },
    /// Split an over-filled window
    Split {
        window_id: WindowId,
        tab_count: usize,
        resulting_windows: usize,
    },
}

impl PlanAction {
    /// Human-readable description for previews
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Merge {
                window_count,
                tab_count,
            } => format!(
                "Merge {window_count} small windows ({tab_count} tabs total) into one window"
            ),
            Self::Split {
                tab_count,
                resulting_windows,
                ..
            } => format!("Split window with {tab_count} tabs into {resulting_windows} windows"),
        }
    }
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// A computed optimization, tied to the snapshot it was computed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationPlan {
    /// Under-filled windows, in inventory order
    pub to_merge: Vec<Window>,
    /// Over-filled windows, in inventory order
    pub to_split: Vec<Window>,
    /// Merge first (at most one), then one split per over-filled window
    pub actions: Vec<PlanAction>,
    pub thresholds: Thresholds,
    /// Generation of the snapshot this plan was computed from
    pub generation: u64,
}

impl OptimizationPlan {
    /// True when every window is already within the band
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty()
    }

    /// Descriptions of every action, in execution order
    #[must_use]
    pub fn descriptions(&self) -> Vec<String> {
        self.actions.iter().map(PlanAction::description).collect()
    }

    /// Whether the merge step will run
    #[must_use]
    pub fn merges(&self) -> bool {
        self.to_merge.len() > 1
    }
}

/// Classify the windows of `snapshot` and derive the actions needed.
#[must_use]
pub fn plan(snapshot: &Snapshot, thresholds: Thresholds) -> OptimizationPlan {
    let (mut to_merge, mut to_split) = (Vec::new(), Vec::new());
    for window in &snapshot.windows {
        let count = window.tab_count();
        if count < thresholds.min_tabs {
            to_merge.push(window.clone());
        } else if count > thresholds.max_tabs {
            to_split.push(window.clone());
        }
    }

    let mut actions = Vec::with_capacity(to_split.len() + 1);
    if to_merge.len() > 1 {
        actions.push(PlanAction::Merge {
            window_count: to_merge.len(),
            tab_count: to_merge.iter().map(Window::tab_count).sum(),
        });
    }
    for window in &to_split {
        actions.push(PlanAction::Split {
            window_id: window.id,
            tab_count: window.tab_count(),
            resulting_windows: window.tab_count().div_ceil(thresholds.max_tabs),
        });
    }

    log::debug!(
        "plan {}..={}: {} to merge, {} to split, {} actions",
        thresholds.min_tabs,
        thresholds.max_tabs,
        to_merge.len(),
        to_split.len(),
        actions.len()
    );

    OptimizationPlan {
        to_merge,
        to_split,
        actions,
        thresholds,
        generation: snapshot.generation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::snapshot_with_counts;

    #[test]
    fn test_merge_and_split() {
        let snapshot = snapshot_with_counts(&[2, 3, 20]);
        let plan = plan(&snapshot, Thresholds::default());

        assert_eq!(plan.to_merge.iter().map(Window::tab_count).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(plan.to_split.iter().map(Window::tab_count).collect::<Vec<_>>(), vec![20]);
        assert_eq!(plan.actions.len(), 2);
        assert_eq!(
            plan.actions[0],
            PlanAction::Merge {
                window_count: 2,
                tab_count: 5
            }
        );
        assert_eq!(
            plan.actions[1],
            PlanAction::Split {
                window_id: WindowId(3),
                tab_count: 20,
                resulting_windows: 2
            }
        );
        assert_eq!(
            plan.descriptions(),
            vec![
                "Merge 2 small windows (5 tabs total) into one window",
                "Split window with 20 tabs into 2 windows",
            ]
        );
    }

    #[test]
    fn test_all_within_band_is_noop() {
        let snapshot = snapshot_with_counts(&[5, 10, 15]);
        let plan = plan(&snapshot, Thresholds::default());
        assert!(plan.is_noop());
        assert!(plan.to_merge.is_empty());
        assert!(plan.to_split.is_empty());
    }

    #[test]
    fn test_single_small_window_is_left_alone() {
        let snapshot = snapshot_with_counts(&[1, 8]);
        let plan = plan(&snapshot, Thresholds::default());
        assert_eq!(plan.to_merge.len(), 1);
        assert!(!plan.merges());
        assert!(plan.is_noop());
    }

    #[test]
    fn test_split_counts_round_up() {
        let snapshot = snapshot_with_counts(&[31]);
        let plan = plan(&snapshot, Thresholds::new(1, 10).unwrap());
        assert_eq!(plan.actions[0].description(), "Split window with 31 tabs into 4 windows");
    }

    #[test]
    fn test_plan_records_generation() {
        let mut snapshot = snapshot_with_counts(&[2, 2]);
        snapshot.generation = 42;
        assert_eq!(plan(&snapshot, Thresholds::default()).generation, 42);
    }

    #[test]
    fn test_thresholds_from_fields() {
        assert_eq!(Thresholds::from_fields("", "").unwrap(), Thresholds::default());
        assert_eq!(Thresholds::from_fields("abc", "0").unwrap(), Thresholds::default());
        assert_eq!(
            Thresholds::from_fields("3", "8 tabs").unwrap(),
            Thresholds::new(3, 8).unwrap()
        );
        assert!(matches!(
            Thresholds::from_fields("20", ""),
            Err(PlanError::InvalidThresholds { min: 20, max: 15 })
        ));
    }

    #[test]
    fn test_thresholds_validate() {
        assert!(Thresholds::new(5, 5).is_ok());
        assert!(Thresholds::new(0, 5).is_err());
        assert!(Thresholds::new(6, 5).is_err());
    }

    #[test]
    fn test_deserialized_zero_thresholds_use_defaults() {
        let thresholds: Thresholds = toml::from_str("min_tabs = 0\nmax_tabs = 0").unwrap();
        assert_eq!(thresholds, Thresholds::default());

        let plan = plan(&snapshot_with_counts(&[3, 40]), thresholds);
        assert_eq!(plan.actions[0].description(), "Split window with 40 tabs into 3 windows");
    }

    #[test]
    fn test_deserialized_thresholds_are_validated() {
        let thresholds: Thresholds = toml::from_str("max_tabs = 20").unwrap();
        assert_eq!((thresholds.min_tabs(), thresholds.max_tabs()), (5, 20));
        assert!(toml::from_str::<Thresholds>("min_tabs = 9\nmax_tabs = 4").is_err());
        assert!(toml::from_str::<Thresholds>("min_tabs = 30").is_err());
    }
}
