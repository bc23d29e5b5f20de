//! Window optimization
//!
//! Keeps windows within a configured tab-count band. Windows below the
//! minimum are merged into one new window (only when there are at least two
//! of them); windows above the maximum are split into chunks of at most the
//! maximum.
//!
//! A plan is computed from one snapshot and is only valid against that
//! snapshot. [`apply`] refuses plans whose generation does not match the
//! caller's current snapshot.

mod apply;
mod plan;

pub use apply::apply;
pub use plan::{OptimizationPlan, PlanAction, Thresholds, plan};

use crate::inventory::ProviderError;
use thiserror::Error;

/// Errors from planning or applying an optimization
#[derive(Debug, Error)]
pub enum PlanError {
    /// Threshold values cannot form a band (zero, or minimum above maximum)
    #[error("Invalid thresholds: need 1 <= minimum ({min}) <= maximum ({max})")]
    InvalidThresholds { min: usize, max: usize },

    /// The inventory changed after the plan was computed
    #[error("Plan was computed for snapshot {planned} but the current snapshot is {current}")]
    StalePlan { planned: u64, current: u64 },

    /// The plan has no actions
    #[error("Nothing to optimize")]
    NothingToApply,

    /// A host call failed part-way through
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}
