//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The workspace holds no tabs.
    #[error("workspace has no tabs")]
    EmptyWorkspace,

    /// The same tab id appears more than once in the display order.
    #[error("duplicate tab in order: {0}")]
    DuplicateTab(String),

    /// A tab id is present in the order but has no tab record.
    #[error("unknown tab in order: {0}")]
    UnknownTab(String),

    /// A tab record is not listed in the display order.
    #[error("tab missing from order: {0}")]
    OrphanTab(String),

    /// A tab record is stored under a key that differs from its own id.
    #[error("tab stored under {key} carries id {id}")]
    IdMismatch {
        /// Key the tab is stored under.
        key: String,
        /// Id recorded on the tab itself.
        id: String,
    },

    /// The active tab pointer references a tab that does not exist.
    #[error("active tab does not exist: {0}")]
    DanglingActive(String),

    /// The renaming pointer references a tab that does not exist.
    #[error("renaming tab does not exist: {0}")]
    DanglingRenaming(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
