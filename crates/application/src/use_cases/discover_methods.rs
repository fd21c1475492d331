//! Discover methods use case.

use std::sync::Arc;
use std::time::Duration;

use rpcdesk_domain::{TabId, TabPatch, TabWrite};
use tracing::warn;

use super::{DEFAULT_COLLABORATOR_TIMEOUT, bounded};
use crate::error::ApplicationResult;
use crate::ports::MethodDiscovery;

/// Methods offered at a tab's address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodOptions {
    /// Tab the lookup was made for.
    pub tab_id: TabId,
    /// Candidate methods; empty when discovery failed.
    pub methods: Vec<String>,
    /// Write clearing the tab's method, present when discovery failed.
    pub reset: Option<TabWrite>,
}

/// Use case for listing the methods available at an address.
pub struct DiscoverMethods<D: MethodDiscovery> {
    discovery: Arc<D>,
    timeout: Duration,
}

impl<D: MethodDiscovery> DiscoverMethods<D> {
    /// Creates a new `DiscoverMethods` use case.
    pub fn new(discovery: Arc<D>) -> Self {
        Self {
            discovery,
            timeout: DEFAULT_COLLABORATOR_TIMEOUT,
        }
    }

    /// Overrides the collaborator timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Lists the methods at `address`.
    ///
    /// A blank address yields an empty list without asking the collaborator.
    ///
    /// # Errors
    /// Returns an error if discovery fails or times out.
    pub async fn execute(&self, address: &str) -> ApplicationResult<Vec<String>> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(Vec::new());
        }
        bounded(self.timeout, self.discovery.list_methods(address)).await
    }

    /// Refreshes the method options of a tab.
    ///
    /// On failure the options are empty and the tab's method is cleared,
    /// since it can no longer be picked from the list.
    pub async fn refresh(&self, tab_id: TabId, address: &str) -> MethodOptions {
        match self.execute(address).await {
            Ok(methods) => MethodOptions {
                tab_id,
                methods,
                reset: None,
            },
            Err(error) => {
                warn!(tab = %tab_id, %address, %error, "method discovery failed");
                MethodOptions {
                    reset: Some(TabWrite::new(tab_id.clone(), TabPatch::new().method(""))),
                    tab_id,
                    methods: Vec::new(),
                }
            }
        }
    }
}
