//! Application error types

use std::time::Duration;

use rpcdesk_domain::DomainError;
use thiserror::Error;

use crate::ports::{CollaboratorError, ConfigStoreError};

/// Message written into a tab when a call or template is requested
/// before a method was chosen.
pub const MISSING_METHOD_MESSAGE: &str = "Please select a method first.";

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// No method is selected on the tab.
    #[error("Please select a method first.")]
    MissingMethod,

    /// An external collaborator (discovery, template, call) failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// Reading or writing configuration failed.
    #[error("config error: {0}")]
    Config(#[from] ConfigStoreError),

    /// A stored configuration value has an unexpected shape.
    #[error("invalid config value for {key}: {message}")]
    InvalidConfig {
        /// Config key.
        key: String,
        /// Parse failure.
        message: String,
    },

    /// The operation did not finish in time.
    #[error("operation timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
