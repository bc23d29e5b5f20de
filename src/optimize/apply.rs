//! Plan execution against the inventory provider

use super::PlanError;
use super::plan::OptimizationPlan;
use crate::inventory::{InventoryProvider, MovePosition, ProviderError, TabId, WindowId};

/// Execute `plan` against `provider`.
///
/// Merges run first, then splits, one provider call at a time. Nothing is
/// rolled back on failure: the error is returned and the caller re-fetches
/// the inventory to see what actually happened.
///
/// Returns the number of plan actions applied.
///
/// # Errors
///
/// - `PlanError::StalePlan` if `current_generation` is not the plan's snapshot
/// - `PlanError::NothingToApply` if the plan has no actions
/// - `PlanError::Provider` if any host call fails
pub fn apply<P: InventoryProvider + ?Sized>(
    plan: &OptimizationPlan,
    current_generation: u64,
    provider: &mut P,
) -> Result<usize, PlanError> {
    if plan.generation != current_generation {
        return Err(PlanError::StalePlan {
            planned: plan.generation,
            current: current_generation,
        });
    }
    if plan.is_noop() {
        return Err(PlanError::NothingToApply);
    }

    if plan.merges() {
        let tabs: Vec<TabId> = plan
            .to_merge
            .iter()
            .flat_map(|w| w.tab_ids())
            .collect();
        let window = gather_into_new_window(provider, &tabs)?;
        log::info!("merged {} windows into window {window:?}", plan.to_merge.len());
    }

    let max_tabs = plan.thresholds.max_tabs();
    for window in &plan.to_split {
        let tabs: Vec<TabId> = window.tab_ids().collect();
        for chunk in tabs.chunks(max_tabs).skip(1) {
            gather_into_new_window(provider, chunk)?;
        }
        log::info!(
            "split window {} ({} tabs) into {} windows",
            window.id,
            tabs.len(),
            tabs.len().div_ceil(max_tabs)
        );
    }

    Ok(plan.actions.len())
}

/// Create a window seeded with the first tab, then move the rest after it.
fn gather_into_new_window<P: InventoryProvider + ?Sized>(
    provider: &mut P,
    tabs: &[TabId],
) -> Result<Option<WindowId>, ProviderError> {
    let Some((&first, rest)) = tabs.split_first() else {
        return Ok(None);
    };
    let window = provider.create_window_with_tab(first)?;
    if !rest.is_empty() {
        provider.move_tabs(rest, window, MovePosition::End)?;
    }
    Ok(Some(window))
}
