//! Generate request template use case.

use std::sync::Arc;
use std::time::Duration;

use rpcdesk_domain::{TabId, TabPatch, TabWrite, WorkspaceState};
use tracing::warn;

use super::{DEFAULT_COLLABORATOR_TIMEOUT, bounded};
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::TemplateGenerator;

/// Address and method captured from a tab when the template was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTarget {
    /// Tab that receives the template.
    pub tab_id: TabId,
    /// Endpoint address.
    pub address: String,
    /// Method to describe.
    pub method: String,
}

impl TemplateTarget {
    /// Captures the target from the current state. `None` if the tab is gone.
    #[must_use]
    pub fn capture(state: &WorkspaceState, tab_id: &TabId) -> Option<Self> {
        state.tab(tab_id).map(|tab| Self {
            tab_id: tab.id.clone(),
            address: tab.address.clone(),
            method: tab.method.clone(),
        })
    }
}

/// Use case for filling a tab's request text with a method template.
pub struct GenerateTemplate<G: TemplateGenerator> {
    generator: Arc<G>,
    timeout: Duration,
}

impl<G: TemplateGenerator> GenerateTemplate<G> {
    /// Creates a new `GenerateTemplate` use case.
    pub fn new(generator: Arc<G>) -> Self {
        Self {
            generator,
            timeout: DEFAULT_COLLABORATOR_TIMEOUT,
        }
    }

    /// Overrides the collaborator timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the template for `method` at `address`.
    ///
    /// # Errors
    /// Returns `ApplicationError::MissingMethod` for a blank method, or the
    /// collaborator failure.
    pub async fn generate(&self, address: &str, method: &str) -> ApplicationResult<String> {
        if method.trim().is_empty() {
            return Err(ApplicationError::MissingMethod);
        }
        bounded(self.timeout, self.generator.template(address, method)).await
    }

    /// Generates the template and returns the write for the tab's request
    /// text. Failures are written as their message.
    pub async fn execute(&self, target: TemplateTarget) -> TabWrite {
        let text = match self.generate(&target.address, &target.method).await {
            Ok(template) => template,
            Err(error) => {
                warn!(
                    tab = %target.tab_id,
                    method = %target.method,
                    %error,
                    "template generation failed"
                );
                error.to_string()
            }
        };
        TabWrite::new(target.tab_id, TabPatch::new().request_body(text))
    }
}
