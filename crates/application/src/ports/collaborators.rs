//! Remote-call collaborator ports.
//!
//! The workspace never talks to a server itself. These three services are
//! implemented by whatever transport the host application embeds; the use
//! cases in this crate call them and write their results back into tabs.

use async_trait::async_trait;
use rpcdesk_domain::{CallRequest, CallResult};

/// Errors reported by a collaborator.
///
/// The display text is what ends up in the tab, so variants carry the
/// collaborator's own message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// Could not connect to the address.
    #[error("failed to connect to {address}: {message}")]
    Connect {
        /// Address that was dialed.
        address: String,
        /// Underlying failure.
        message: String,
    },

    /// The method could not be resolved on the server or in the schema files.
    #[error("method not found: {0}")]
    UnknownMethod(String),

    /// Any other failure, with the collaborator's message.
    #[error("{0}")]
    Failed(String),
}

/// Lists the methods offered at an address.
#[async_trait]
pub trait MethodDiscovery: Send + Sync {
    /// Returns candidate method names for `address`.
    ///
    /// # Errors
    /// Returns an error if the address cannot be reached or queried.
    async fn list_methods(&self, address: &str) -> Result<Vec<String>, CollaboratorError>;
}

/// Produces a skeleton request body for a method.
#[async_trait]
pub trait TemplateGenerator: Send + Sync {
    /// Returns the request template for `method` at `address`.
    ///
    /// # Errors
    /// Returns an error if the method cannot be described.
    async fn template(&self, address: &str, method: &str) -> Result<String, CollaboratorError>;
}

/// Performs a call.
#[async_trait]
pub trait CallExecutor: Send + Sync {
    /// Executes `request` and collects headers, messages and trailers.
    ///
    /// # Errors
    /// Returns an error if the call cannot be made or the request is malformed.
    async fn call(&self, request: &CallRequest) -> Result<CallResult, CollaboratorError>;
}
