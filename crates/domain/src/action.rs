//! Tab workspace actions and their outcomes.

use std::fmt;

use crate::id::TabId;
use crate::tab::TabPatch;

/// A user-initiated mutation of the tab workspace.
///
/// Every action is applied as a single atomic transition by
/// [`WorkspaceState::apply`](crate::WorkspaceState::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabAction {
    /// Open a new empty tab at the front, make it active and start renaming it.
    Create,
    /// Insert a copy of the tab right after it.
    Duplicate(TabId),
    /// Close a tab. The last remaining tab is never closed.
    Delete(TabId),
    /// Move `from` to the position currently held by `to`.
    Reorder {
        /// Tab being moved.
        from: TabId,
        /// Tab whose position is taken.
        to: TabId,
    },
    /// Show a tab.
    SetActive(TabId),
    /// Patch the active tab.
    UpdateActive(TabPatch),
    /// Patch a specific tab.
    Update(TabId, TabPatch),
    /// Enter inline rename for a tab, or leave rename mode with `None`.
    SetRenaming(Option<TabId>),
    /// Store the edited title and leave rename mode.
    CommitRename {
        /// Tab being renamed.
        id: TabId,
        /// New title.
        title: String,
    },
}

impl TabAction {
    /// Short name used in log events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Duplicate(_) => "duplicate",
            Self::Delete(_) => "delete",
            Self::Reorder { .. } => "reorder",
            Self::SetActive(_) => "set_active",
            Self::UpdateActive(_) => "update_active",
            Self::Update(..) => "update",
            Self::SetRenaming(_) => "set_renaming",
            Self::CommitRename { .. } => "commit_rename",
        }
    }
}

/// Why an action left the workspace unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The action referenced a tab that does not exist (stale reference).
    UnknownTab(TabId),
    /// The action would have closed the only remaining tab.
    LastTab,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTab(id) => write!(f, "unknown tab {id}"),
            Self::LastTab => f.write_str("last remaining tab"),
        }
    }
}

/// What applying an action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new tab was added (create or duplicate).
    Created(TabId),
    /// The action was applied.
    Applied,
    /// The action was a no-op; the state is unchanged.
    Ignored(IgnoreReason),
}

impl Outcome {
    /// Returns the id of the tab added by this action, if any.
    #[must_use]
    pub const fn created_id(&self) -> Option<&TabId> {
        match self {
            Self::Created(id) => Some(id),
            _ => None,
        }
    }

    /// Returns true if the action left the state unchanged.
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}
