//! Multi-tab workspace state.
//!
//! `WorkspaceState` is the aggregate behind the tab strip: the tab
//! records, their display order, the active tab and the tab currently in
//! inline-rename mode. It is only changed through [`WorkspaceState::apply`],
//! a pure transition from the old state and an action to a new state.
//!
//! Invariants held by every reachable state:
//! - `order` is a permutation of the keys of `tabs`
//! - `order` is never empty
//! - `active_id` is in `order`
//! - `renaming_id`, when set, is in `order`

use std::collections::{HashMap, HashSet};

use crate::action::{IgnoreReason, Outcome, TabAction};
use crate::error::{DomainError, DomainResult};
use crate::id::TabId;
use crate::tab::{Tab, TabPatch};

/// Result of applying an action: the next state and what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the action.
    pub state: WorkspaceState,
    /// What the action did.
    pub outcome: Outcome,
}

/// The tab workspace of one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceState {
    tabs: HashMap<TabId, Tab>,
    order: Vec<TabId>,
    active_id: TabId,
    renaming_id: Option<TabId>,
}

impl WorkspaceState {
    /// Creates the initial state: a single fresh tab, active, not renaming.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tab(Tab::new())
    }

    /// Creates a state holding only `tab`.
    #[must_use]
    pub fn with_tab(tab: Tab) -> Self {
        let id = tab.id.clone();
        Self {
            tabs: HashMap::from([(id.clone(), tab)]),
            order: vec![id.clone()],
            active_id: id,
            renaming_id: None,
        }
    }

    /// Builds a state from tabs listed in display order.
    ///
    /// The first tab is active when `active` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if `tabs` is empty, contains duplicate ids, or
    /// `active` does not name one of the tabs.
    pub fn from_tabs(tabs: Vec<Tab>, active: Option<TabId>) -> DomainResult<Self> {
        let order: Vec<TabId> = tabs.iter().map(|tab| tab.id.clone()).collect();
        let active_id = match active {
            Some(id) => id,
            None => order.first().cloned().ok_or(DomainError::EmptyWorkspace)?,
        };
        let mut map = HashMap::with_capacity(tabs.len());
        for tab in tabs {
            let id = tab.id.clone();
            if map.insert(id.clone(), tab).is_some() {
                return Err(DomainError::DuplicateTab(id.to_string()));
            }
        }
        let state = Self {
            tabs: map,
            order,
            active_id,
            renaming_id: None,
        };
        state.validate()?;
        Ok(state)
    }

    // ---------------------------------------------------------------------
    // Read access
    // ---------------------------------------------------------------------

    /// Returns the tab ids in display order.
    #[must_use]
    pub fn order(&self) -> &[TabId] {
        &self.order
    }

    /// Iterates the tabs in display order.
    pub fn tabs_in_order(&self) -> impl Iterator<Item = &Tab> {
        self.order.iter().filter_map(|id| self.tabs.get(id))
    }

    /// Looks up a tab by id.
    #[must_use]
    pub fn tab(&self, id: &TabId) -> Option<&Tab> {
        self.tabs.get(id)
    }

    /// Returns the tab at a display position.
    #[must_use]
    pub fn tab_at(&self, index: usize) -> Option<&Tab> {
        self.order.get(index).and_then(|id| self.tabs.get(id))
    }

    /// Returns the id of the active tab.
    #[must_use]
    pub const fn active_id(&self) -> &TabId {
        &self.active_id
    }

    /// Returns the active tab.
    #[must_use]
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.get(&self.active_id)
    }

    /// Returns the id of the tab in rename mode, if any.
    #[must_use]
    pub const fn renaming_id(&self) -> Option<&TabId> {
        self.renaming_id.as_ref()
    }

    /// Returns true if `id` is the tab in rename mode.
    #[must_use]
    pub fn is_renaming(&self, id: &TabId) -> bool {
        self.renaming_id.as_ref() == Some(id)
    }

    /// Returns the display position of a tab.
    #[must_use]
    pub fn position(&self, id: &TabId) -> Option<usize> {
        self.order.iter().position(|candidate| candidate == id)
    }

    /// Returns true if the tab exists.
    #[must_use]
    pub fn contains(&self, id: &TabId) -> bool {
        self.tabs.contains_key(id)
    }

    /// Returns the number of tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if there are no tabs. Never the case for reachable states.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Checks every invariant and reports the first one violated.
    ///
    /// # Errors
    ///
    /// Returns the `DomainError` describing the violation.
    pub fn validate(&self) -> DomainResult<()> {
        if self.order.is_empty() {
            return Err(DomainError::EmptyWorkspace);
        }

        let mut seen = HashSet::with_capacity(self.order.len());
        for id in &self.order {
            if !seen.insert(id) {
                return Err(DomainError::DuplicateTab(id.to_string()));
            }
            if !self.tabs.contains_key(id) {
                return Err(DomainError::UnknownTab(id.to_string()));
            }
        }

        for (key, tab) in &self.tabs {
            if key != &tab.id {
                return Err(DomainError::IdMismatch {
                    key: key.to_string(),
                    id: tab.id.to_string(),
                });
            }
            if !seen.contains(key) {
                return Err(DomainError::OrphanTab(key.to_string()));
            }
        }

        if !self.tabs.contains_key(&self.active_id) {
            return Err(DomainError::DanglingActive(self.active_id.to_string()));
        }

        if let Some(renaming) = &self.renaming_id
            && !self.tabs.contains_key(renaming)
        {
            return Err(DomainError::DanglingRenaming(renaming.to_string()));
        }

        Ok(())
    }

    // ---------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------

    /// Applies an action and returns the resulting state.
    ///
    /// `self` is left untouched. An action that references a missing tab
    /// yields an identical state and `Outcome::Ignored`.
    #[must_use]
    pub fn apply(&self, action: TabAction) -> Transition {
        let mut state = self.clone();
        let outcome = state.reduce(action);
        Transition { state, outcome }
    }

    /// Applies an action in place. Ignored actions must not mutate `self`.
    fn reduce(&mut self, action: TabAction) -> Outcome {
        match action {
            TabAction::Create => self.create(),
            TabAction::Duplicate(source) => self.duplicate(&source),
            TabAction::Delete(id) => self.delete(&id),
            TabAction::Reorder { from, to } => self.reorder(&from, &to),
            TabAction::SetActive(id) => self.set_active(id),
            TabAction::UpdateActive(patch) => {
                let id = self.active_id.clone();
                self.update(&id, &patch)
            }
            TabAction::Update(id, patch) => self.update(&id, &patch),
            TabAction::SetRenaming(id) => self.set_renaming(id),
            TabAction::CommitRename { id, title } => self.commit_rename(&id, title),
        }
    }

    fn create(&mut self) -> Outcome {
        let tab = Tab::new();
        let id = tab.id.clone();
        self.tabs.insert(id.clone(), tab);
        self.order.insert(0, id.clone());
        self.active_id = id.clone();
        self.renaming_id = Some(id.clone());
        Outcome::Created(id)
    }

    fn duplicate(&mut self, source: &TabId) -> Outcome {
        let (Some(index), Some(tab)) = (self.position(source), self.tabs.get(source)) else {
            return Outcome::Ignored(IgnoreReason::UnknownTab(source.clone()));
        };
        let copy = tab.duplicate(TabId::generate());
        let id = copy.id.clone();
        self.tabs.insert(id.clone(), copy);
        self.order.insert(index + 1, id.clone());
        Outcome::Created(id)
    }

    fn delete(&mut self, id: &TabId) -> Outcome {
        let Some(index) = self.position(id) else {
            return Outcome::Ignored(IgnoreReason::UnknownTab(id.clone()));
        };
        if self.order.len() <= 1 {
            return Outcome::Ignored(IgnoreReason::LastTab);
        }

        self.order.remove(index);
        self.tabs.remove(id);

        if &self.active_id == id {
            // The following tab slides into the vacated slot; at the end of
            // the strip fall back to the new last tab.
            let next = if index == self.order.len() {
                index - 1
            } else {
                index
            };
            self.active_id = self.order[next].clone();
        }
        if self.renaming_id.as_ref() == Some(id) {
            self.renaming_id = None;
        }
        Outcome::Applied
    }

    fn reorder(&mut self, from: &TabId, to: &TabId) -> Outcome {
        let Some(old_index) = self.position(from) else {
            return Outcome::Ignored(IgnoreReason::UnknownTab(from.clone()));
        };
        let Some(new_index) = self.position(to) else {
            return Outcome::Ignored(IgnoreReason::UnknownTab(to.clone()));
        };
        let moved = self.order.remove(old_index);
        self.order.insert(new_index, moved);
        Outcome::Applied
    }

    fn set_active(&mut self, id: TabId) -> Outcome {
        if !self.contains(&id) {
            return Outcome::Ignored(IgnoreReason::UnknownTab(id));
        }
        self.active_id = id;
        Outcome::Applied
    }

    fn update(&mut self, id: &TabId, patch: &TabPatch) -> Outcome {
        let Some(tab) = self.tabs.get_mut(id) else {
            return Outcome::Ignored(IgnoreReason::UnknownTab(id.clone()));
        };
        tab.apply(patch);
        Outcome::Applied
    }

    fn set_renaming(&mut self, id: Option<TabId>) -> Outcome {
        match id {
            None => self.renaming_id = None,
            Some(id) if self.contains(&id) => self.renaming_id = Some(id),
            Some(id) => return Outcome::Ignored(IgnoreReason::UnknownTab(id)),
        }
        Outcome::Applied
    }

    fn commit_rename(&mut self, id: &TabId, title: String) -> Outcome {
        let Some(tab) = self.tabs.get_mut(id) else {
            return Outcome::Ignored(IgnoreReason::UnknownTab(id.clone()));
        };
        tab.title = title;
        if self.renaming_id.as_ref() == Some(id) {
            self.renaming_id = None;
        }
        Outcome::Applied
    }
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self::new()
    }
}
