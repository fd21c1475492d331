//! Request-tab store.
//!
//! `TabStore` is the single writer of a window's [`WorkspaceState`]. Every
//! user action goes through [`TabStore::dispatch`], which swaps in the
//! state produced by the pure transition. Readers get the current state
//! through [`TabStore::state`].

use rpcdesk_domain::{Outcome, TabAction, TabId, TabPatch, TabWrite, Transition, WorkspaceState};
use tracing::debug;

/// Holder of the current workspace state.
#[derive(Debug, Clone, Default)]
pub struct TabStore {
    state: WorkspaceState,
}

impl TabStore {
    /// Creates a store with a single fresh tab.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store starting from `state`.
    #[must_use]
    pub const fn from_state(state: WorkspaceState) -> Self {
        Self { state }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &WorkspaceState {
        &self.state
    }

    /// Returns an owned copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> WorkspaceState {
        self.state.clone()
    }

    /// Applies an action and returns what it did.
    pub fn dispatch(&mut self, action: TabAction) -> Outcome {
        let name = action.name();
        let Transition { state, outcome } = self.state.apply(action);
        match &outcome {
            Outcome::Ignored(reason) => debug!(action = name, %reason, "tab action ignored"),
            Outcome::Created(id) => {
                debug!(action = name, tab = %id, tabs = state.len(), "tab created");
            }
            Outcome::Applied => debug!(action = name, "tab action applied"),
        }
        debug_assert!(state.validate().is_ok(), "{:?}", state.validate());
        self.state = state;
        outcome
    }

    /// Opens a new tab at the front and returns its id.
    ///
    /// The new tab becomes active and enters rename mode.
    pub fn create(&mut self) -> TabId {
        self.dispatch(TabAction::Create);
        self.state.active_id().clone()
    }

    /// Inserts a copy of `id` right after it. Returns the copy's id.
    pub fn duplicate(&mut self, id: &TabId) -> Option<TabId> {
        match self.dispatch(TabAction::Duplicate(id.clone())) {
            Outcome::Created(copy) => Some(copy),
            _ => None,
        }
    }

    /// Closes a tab. Returns false if the tab is unknown or is the last one.
    pub fn delete(&mut self, id: &TabId) -> bool {
        !self.dispatch(TabAction::Delete(id.clone())).is_ignored()
    }

    /// Moves `from` to the position held by `to`.
    pub fn reorder(&mut self, from: &TabId, to: &TabId) -> bool {
        !self
            .dispatch(TabAction::Reorder {
                from: from.clone(),
                to: to.clone(),
            })
            .is_ignored()
    }

    /// Shows a tab.
    pub fn set_active(&mut self, id: &TabId) -> bool {
        !self.dispatch(TabAction::SetActive(id.clone())).is_ignored()
    }

    /// Patches the active tab.
    pub fn update_active(&mut self, patch: TabPatch) -> bool {
        !self.dispatch(TabAction::UpdateActive(patch)).is_ignored()
    }

    /// Patches a specific tab.
    pub fn update(&mut self, id: &TabId, patch: TabPatch) -> bool {
        !self.dispatch(TabAction::Update(id.clone(), patch)).is_ignored()
    }

    /// Enters rename mode for `id`, or leaves it with `None`.
    pub fn set_renaming(&mut self, id: Option<&TabId>) -> bool {
        !self
            .dispatch(TabAction::SetRenaming(id.cloned()))
            .is_ignored()
    }

    /// Stores an edited title and leaves rename mode.
    pub fn commit_rename(&mut self, id: &TabId, title: impl Into<String>) -> bool {
        !self
            .dispatch(TabAction::CommitRename {
                id: id.clone(),
                title: title.into(),
            })
            .is_ignored()
    }

    /// Writes the result of asynchronous work into its target tab.
    ///
    /// If the tab was closed while the work was in flight the result is
    /// dropped; a closed tab is never brought back. Returns whether the
    /// write landed.
    pub fn apply_result(&mut self, write: TabWrite) -> bool {
        if !self.state.contains(&write.tab_id) {
            debug!(tab = %write.tab_id, "discarding result for closed tab");
            return false;
        }
        self.update(&write.tab_id, write.patch)
    }
}
