//! Tab manager controller
//!
//! `TabManager` owns the application state, the inventory provider, the
//! clipboard and the toast sink. Every user-visible operation is a method
//! here. Operations that change the host re-fetch the whole inventory
//! afterwards, whether they succeeded or not, so the state never drifts from
//! what the host actually holds.

use super::state::{AppState, Modal, OpenMode};
use crate::config::TablibConfig;
use crate::inventory::{InventoryProvider, MovePosition, ProviderError, Snapshot, TabId, WindowId};
use crate::keybinds::{KeyDispatcher, KeyEvent, KeyParseError, TabAction};
use crate::links::{Clipboard, LinkFormat, export_links, parse_links};
use crate::notify::Subscription;
use crate::optimize::{self, OptimizationPlan, PlanError, Thresholds};
use crate::search::{FilteredView, SearchMode, plural};
use crate::selection::{ClickModifiers, ClickOutcome};
use crate::ui::OutputWriter;
use thiserror::Error;

/// Errors the controller cannot absorb into a toast
#[derive(Debug, Error)]
pub enum AppError {
    /// The inventory could not be fetched
    #[error("Failed to load tabs: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid keybind: {0}")]
    Keybind(#[from] KeyParseError),
}

/// Result type for controller operations
pub type Result<T> = std::result::Result<T, AppError>;

/// What an operation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The operation ran and touched `affected_count` tabs or actions
    Success { affected_count: usize },

    /// Nothing to do, e.g. no tabs selected
    Noop,

    /// Input was rejected before any host call
    Rejected(String),

    /// The host failed part-way; state has been re-fetched
    Failed(String),
}

impl ActionOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub const fn affected_count(&self) -> Option<usize> {
        match self {
            Self::Success { affected_count } => Some(*affected_count),
            _ => None,
        }
    }
}

/// Single owner of the tab manager state
pub struct TabManager<P: InventoryProvider> {
    state: AppState,
    provider: P,
    clipboard: Box<dyn Clipboard>,
    output: Box<dyn OutputWriter>,
    keys: KeyDispatcher,
    generation: u64,
}

impl<P: InventoryProvider> TabManager<P> {
    /// Create a manager with default settings and an empty snapshot.
    ///
    /// Call [`refresh`](Self::refresh) to load the inventory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Keybind` if the default keybinds fail to parse.
    pub fn new(provider: P, clipboard: Box<dyn Clipboard>, output: Box<dyn OutputWriter>) -> Result<Self> {
        Ok(Self {
            state: AppState::new(),
            provider,
            clipboard,
            output,
            keys: KeyDispatcher::from_config(&crate::keybinds::KeybindConfig::default())?,
            generation: 0,
        })
    }

    /// Take search, view, copy, open and threshold preferences from `config`.
    ///
    /// Thresholds arrive already checked, so the optimize key can always plan.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Keybind` if a configured key string is invalid.
    pub fn apply_config(&mut self, config: &TablibConfig) -> Result<()> {
        self.keys = KeyDispatcher::from_config(&config.keybinds)?;
        self.state.mode = config.search_mode;
        self.state.view_mode = config.view_mode;
        self.state.show_url_in_compact = config.show_url_in_compact;
        self.state.copy_format = config.copy_format;
        self.state.open_mode = config.open_mode;
        self.state.thresholds = config.optimize;
        Ok(())
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Give the provider back, e.g. to persist it
    pub fn into_provider(self) -> P {
        self.provider
    }

    /// Ranked and filtered view of the current snapshot
    #[must_use]
    pub fn view(&self) -> FilteredView<'_> {
        self.state.view()
    }

    /// Re-fetch the full inventory
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` if the host cannot list its windows.
    pub fn refresh(&mut self) -> Result<()> {
        let windows = self.provider.list_windows()?;
        self.generation += 1;
        let snapshot = Snapshot::new(windows, self.generation);
        log::debug!(
            "snapshot {}: {} tabs in {} windows",
            snapshot.generation,
            snapshot.total_tabs(),
            snapshot.windows.len()
        );
        self.state.set_snapshot(snapshot);
        Ok(())
    }

    pub fn set_query(&mut self, query: &str) {
        self.state.set_query(query);
    }

    pub fn toggle_search_mode(&mut self) -> SearchMode {
        let mode = self.state.toggle_search_mode();
        log::debug!("search mode: {}", mode.label());
        mode
    }

    /// Handle a click on a tab row.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` if the re-fetch after activating fails.
    pub fn click_tab(&mut self, tab: TabId, modifiers: ClickModifiers) -> Result<ActionOutcome> {
        let visible = self.state.visible_tab_ids();
        match self.state.selection.click(tab, modifiers, &visible) {
            ClickOutcome::Updated => Ok(ActionOutcome::Success {
                affected_count: self.state.selection.len(),
            }),
            ClickOutcome::Activate(tab) => self.activate_tab(tab),
        }
    }

    /// Checkbox toggle; leaves the anchor alone
    pub fn toggle_tab(&mut self, tab: TabId) {
        self.state.selection.toggle(tab);
    }

    pub fn select_all_visible(&mut self) {
        let visible = self.state.visible_tab_ids();
        self.state.selection.select_all_visible(&visible);
    }

    pub fn deselect_all(&mut self) {
        self.state.selection.deselect_all();
    }

    /// Select every tab of a window, or clear them if all are selected.
    /// Unknown windows are ignored.
    pub fn toggle_window(&mut self, window: WindowId) {
        if let Some(window) = self.state.snapshot.find_window(window) {
            self.state.selection.toggle_window(window);
        }
    }

    /// Whether every tab of `window` is selected (toggle button label)
    #[must_use]
    pub fn is_window_fully_selected(&self, window: WindowId) -> bool {
        self.state
            .snapshot
            .find_window(window)
            .is_some_and(|w| self.state.selection.is_window_fully_selected(w))
    }

    /// Bring a window to the front
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` if the re-fetch fails.
    pub fn focus_window(&mut self, window: WindowId) -> Result<ActionOutcome> {
        let result = self.provider.focus_window(window);
        self.finish(result.map(|()| 1), "Failed to focus window")
    }

    /// Close a single tab
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` if the re-fetch fails.
    pub fn close_tab(&mut self, tab: TabId) -> Result<ActionOutcome> {
        let result = self.provider.close_tabs(&[tab]);
        if result.is_ok() {
            self.state.selection.remove(tab);
        }
        self.finish(result.map(|()| 1), "Failed to close tabs")
    }

    /// Close every selected tab
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` if the re-fetch fails.
    pub fn close_selected(&mut self) -> Result<ActionOutcome> {
        let ids = self.selected_ids();
        if ids.is_empty() {
            return Ok(ActionOutcome::Noop);
        }

        let result = self.provider.close_tabs(&ids);
        if result.is_ok() {
            log::info!("closed {} tabs", ids.len());
        }
        self.state.selection.deselect_all();
        self.finish(result.map(|()| ids.len()), "Failed to close tabs")
    }

    /// Move every selected tab, in inventory order, into one new window
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` if the re-fetch fails.
    pub fn move_selected_to_new_window(&mut self) -> Result<ActionOutcome> {
        let ids = self.selected_ids();
        let Some((&first, rest)) = ids.split_first() else {
            return Ok(ActionOutcome::Noop);
        };

        let result = self.provider.create_window_with_tab(first).and_then(|window| {
            if !rest.is_empty() {
                self.provider.move_tabs(rest, window, MovePosition::End)?;
            }
            log::info!("moved {} tabs to window {window}", ids.len());
            Ok(ids.len())
        });
        self.state.selection.deselect_all();
        self.finish(result, "Failed to move tabs")
    }

    /// Copy the selected tabs as links in `format`
    pub fn copy_links(&mut self, format: LinkFormat) -> ActionOutcome {
        let tabs = self.state.selected_tabs();
        if tabs.is_empty() {
            return ActionOutcome::Noop;
        }

        let count = tabs.len();
        let text = export_links(&tabs, format);
        match self.clipboard.set_text(&text) {
            Ok(()) => {
                self.output
                    .success(&format!("Copied {} ({format} format)", plural(count, "link")));
                ActionOutcome::Success { affected_count: count }
            }
            Err(e) => {
                log::warn!("{e}");
                self.output.error("Failed to copy to clipboard");
                ActionOutcome::Failed(e.to_string())
            }
        }
    }

    /// Open every url found in pasted `text`
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` if the re-fetch fails.
    pub fn open_links(&mut self, text: &str, mode: OpenMode) -> Result<ActionOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(self.reject("Please paste some links first"));
        }

        let urls = parse_links(text);
        let Some((first, rest)) = urls.split_first() else {
            return Ok(self.reject("No valid URLs found"));
        };

        let result = match mode {
            OpenMode::NewWindow => self.provider.create_window_with_url(first).and_then(|window| {
                for url in rest {
                    self.provider.create_tab(window, url)?;
                }
                Ok(Some(window))
            }),
            OpenMode::CurrentWindow => self.provider.list_windows().and_then(|windows| {
                let Some(window) = windows.iter().find(|w| w.focused).or_else(|| windows.first()) else {
                    return Ok(None);
                };
                for url in &urls {
                    self.provider.create_tab(window.id, url)?;
                }
                Ok(Some(window.id))
            }),
        };

        let outcome = match result {
            Ok(Some(window)) => {
                log::info!("opened {} links in window {window}", urls.len());
                self.output
                    .success(&format!("Opened {} in {}", plural(urls.len(), "link"), mode.label()));
                if self.state.modal == Modal::Paste {
                    self.state.close_modal();
                }
                ActionOutcome::Success {
                    affected_count: urls.len(),
                }
            }
            Ok(None) => self.reject("No window available to open links"),
            Err(e) => {
                log::warn!("opening links failed: {e}");
                self.output.error("Failed to open links");
                ActionOutcome::Failed(e.to_string())
            }
        };

        self.refresh()?;
        Ok(outcome)
    }

    pub fn open_paste_dialog(&mut self) {
        self.state.open_paste();
    }

    /// Compute a plan from raw threshold fields and open the optimize dialog.
    ///
    /// Blank or non-numeric fields use the defaults.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidThresholds` if the minimum exceeds the
    /// maximum; the dialog state is left unchanged.
    pub fn preview_optimization(&mut self, min: &str, max: &str) -> std::result::Result<&OptimizationPlan, PlanError> {
        let thresholds = match Thresholds::from_fields(min, max) {
            Ok(thresholds) => thresholds,
            Err(e) => {
                self.output.warning(&e.to_string());
                return Err(e);
            }
        };
        let plan = self.state.open_optimize(thresholds);
        log::debug!("optimization preview: {} actions", plan.actions.len());
        Ok(plan)
    }

    /// Apply the plan shown in the optimize dialog
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` if the re-fetch fails.
    pub fn apply_optimization(&mut self) -> Result<ActionOutcome> {
        let Some(plan) = self.state.plan.as_ref() else {
            return Ok(ActionOutcome::Noop);
        };

        match optimize::apply(plan, self.state.snapshot.generation, &mut self.provider) {
            Ok(applied) => {
                self.output.success(&format!(
                    "Optimization complete! {} applied",
                    plural(applied, "action")
                ));
                self.state.close_modal();
                self.refresh()?;
                Ok(ActionOutcome::Success {
                    affected_count: applied,
                })
            }
            Err(PlanError::NothingToApply) => Ok(ActionOutcome::Noop),
            Err(e) => {
                log::warn!("optimization failed: {e}");
                self.output.error("Optimization failed");
                self.refresh()?;
                Ok(ActionOutcome::Failed(e.to_string()))
            }
        }
    }

    /// Close the optimize dialog and drop its plan
    pub fn cancel_optimization(&mut self) {
        self.state.close_modal();
    }

    /// Run the action bound to a key press, if any.
    ///
    /// Returns the action that ran.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` if a re-fetch after a host call fails.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<Option<TabAction>> {
        let Some(action) = self.keys.resolve(event) else {
            return Ok(None);
        };
        if action.requires_selection() && self.state.selection.is_empty() {
            return Ok(None);
        }
        log::debug!("key {:?} -> {}", event.key, action.id());

        match action {
            TabAction::FocusSearch => self.state.search_focused = true,
            TabAction::ToggleSearchMode => {
                self.toggle_search_mode();
            }
            TabAction::ClearSearchOrDeselect => self.state.clear_search_or_deselect(),
            TabAction::SelectAllVisible => self.select_all_visible(),
            TabAction::DeselectAll => self.deselect_all(),
            TabAction::CloseSelected => {
                self.close_selected()?;
            }
            TabAction::MoveToNewWindow => {
                self.move_selected_to_new_window()?;
            }
            TabAction::CopyLinks => {
                self.copy_links(self.state.copy_format);
            }
            TabAction::PasteLinks => self.open_paste_dialog(),
            TabAction::OptimizeWindows => {
                let thresholds = self.state.thresholds;
                self.state.open_optimize(thresholds);
            }
        }
        Ok(Some(action))
    }

    /// Re-fetch if the subscription reported a change since the last poll.
    ///
    /// Returns whether a refresh happened.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` if the re-fetch fails.
    pub fn poll_changes(&mut self, subscription: &Subscription) -> Result<bool> {
        if subscription.try_drain() {
            self.refresh()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn selected_ids(&self) -> Vec<TabId> {
        self.state.selected_tabs().iter().map(|t| t.id).collect()
    }

    fn activate_tab(&mut self, tab: TabId) -> Result<ActionOutcome> {
        let result = match self.state.snapshot.window_of(tab).map(|w| w.id) {
            Some(window) => self
                .provider
                .activate_tab(tab)
                .and_then(|()| self.provider.focus_window(window)),
            None => Err(ProviderError::TabNotFound(tab)),
        };
        self.finish(result.map(|()| 1), "Failed to switch to tab")
    }

    fn reject(&self, message: &str) -> ActionOutcome {
        self.output.warning(message);
        ActionOutcome::Rejected(message.to_string())
    }

    /// Toast a failure, then re-fetch regardless of the result
    fn finish(&mut self, result: std::result::Result<usize, ProviderError>, failure: &str) -> Result<ActionOutcome> {
        let outcome = match result {
            Ok(affected_count) => ActionOutcome::Success { affected_count },
            Err(e) => {
                log::warn!("{failure}: {e}");
                self.output.error(failure);
                ActionOutcome::Failed(e.to_string())
            }
        };
        self.refresh()?;
        Ok(outcome)
    }
}
