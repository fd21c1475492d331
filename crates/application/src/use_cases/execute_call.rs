//! Execute Call Use Case
//!
//! Sends the request of a tab through the call executor and turns the
//! outcome into the text shown in the tab's response pane.

use std::sync::Arc;
use std::time::Duration;

use rpcdesk_domain::{
    CallRequest, CallResult, SchemaSources, TabId, TabPatch, TabWrite, WorkspaceState,
};
use tracing::{info, warn};

use super::{DEFAULT_COLLABORATOR_TIMEOUT, bounded};
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::CallExecutor;

/// A call captured from a tab at the moment it was sent.
///
/// Later edits to the tab do not affect the call in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTarget {
    /// Tab that receives the response.
    pub tab_id: TabId,
    /// Call input.
    pub request: CallRequest,
}

impl CallTarget {
    /// Captures the call from the current state. `None` if the tab is gone.
    #[must_use]
    pub fn capture(state: &WorkspaceState, tab_id: &TabId, schema: &SchemaSources) -> Option<Self> {
        state.tab(tab_id).map(|tab| Self {
            tab_id: tab.id.clone(),
            request: CallRequest::from_tab(tab, schema.clone()),
        })
    }
}

/// Use case for executing calls.
///
/// # Example
///
/// ```ignore
/// let use_case = ExecuteCall::new(Arc::new(executor));
///
/// let target = CallTarget::capture(store.state(), &tab_id, &schema).unwrap();
/// let write = use_case.execute(target).await;
/// store.apply_result(write);
/// ```
pub struct ExecuteCall<C: CallExecutor> {
    executor: Arc<C>,
    timeout: Duration,
}

impl<C: CallExecutor> ExecuteCall<C> {
    /// Creates a new `ExecuteCall` use case with the given executor.
    pub fn new(executor: Arc<C>) -> Self {
        Self {
            executor,
            timeout: DEFAULT_COLLABORATOR_TIMEOUT,
        }
    }

    /// Overrides the collaborator timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Executes the call and returns the raw result.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::MissingMethod` if no method is selected,
    /// `ApplicationError::Timeout` if the executor does not answer in time,
    /// or the executor's own failure.
    pub async fn call(&self, request: &CallRequest) -> ApplicationResult<CallResult> {
        if request.method.trim().is_empty() {
            return Err(ApplicationError::MissingMethod);
        }
        bounded(self.timeout, self.executor.call(request)).await
    }

    /// Executes the call and returns the write for the tab's response text.
    pub async fn execute(&self, target: CallTarget) -> TabWrite {
        let text = match self.call(&target.request).await {
            Ok(result) => {
                info!(
                    tab = %target.tab_id,
                    method = %target.request.method,
                    messages = result.messages.len(),
                    status = ?result.status_code(),
                    "call completed"
                );
                result.render()
            }
            Err(error) => {
                warn!(tab = %target.tab_id, method = %target.request.method, %error, "call failed");
                error.to_string()
            }
        };
        TabWrite::new(target.tab_id, TabPatch::new().response_body(text))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ports::CollaboratorError;
    use crate::store::TabStore;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Mock executor that records the requests it receives.
    struct MockExecutor {
        response: Result<CallResult, CollaboratorError>,
        seen: Mutex<Vec<CallRequest>>,
    }

    impl MockExecutor {
        fn success() -> Self {
            Self {
                response: Ok(CallResult {
                    headers: BTreeMap::from([(
                        "content-type".to_string(),
                        "application/grpc".to_string(),
                    )]),
                    messages: vec!["{\"message\": \"Hello x\"}".to_string()],
                    trailers: BTreeMap::from([("status-code".to_string(), "0".to_string())]),
                }),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn error(err: CollaboratorError) -> Self {
            Self {
                response: Err(err),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CallExecutor for MockExecutor {
        async fn call(&self, request: &CallRequest) -> Result<CallResult, CollaboratorError> {
            self.seen.lock().expect("Lock poisoned").push(request.clone());
            self.response.clone()
        }
    }

    struct HangingExecutor;

    #[async_trait]
    impl CallExecutor for HangingExecutor {
        async fn call(&self, _request: &CallRequest) -> Result<CallResult, CollaboratorError> {
            std::future::pending().await
        }
    }

    fn prepared_store() -> (TabStore, TabId) {
        let mut store = TabStore::new();
        let id = store.state().active_id().clone();
        store.update_active(
            TabPatch::new()
                .address("localhost:50051")
                .method("greet.Greeter/SayHello")
                .request_body("{\"name\": \"x\"}"),
        );
        (store, id)
    }

    #[tokio::test]
    async fn test_execute_success_renders_response() {
        let (mut store, id) = prepared_store();
        let executor = Arc::new(MockExecutor::success());
        let use_case = ExecuteCall::new(Arc::clone(&executor));

        let mut schema = SchemaSources::new();
        schema.add_schema_files(["/protos/greet.proto"]);
        let target = CallTarget::capture(store.state(), &id, &schema).unwrap();
        let write = use_case.execute(target).await;
        assert!(store.apply_result(write));

        assert_eq!(
            store.state().tab(&id).unwrap().response_body,
            "content-type: application/grpc\n\n{\"message\": \"Hello x\"}\n\nstatus-code: 0\n"
        );

        let seen = executor.seen.lock().expect("Lock poisoned");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].request_body, "{\"name\": \"x\"}");
        assert_eq!(
            seen[0].schema.schema_files,
            vec![PathBuf::from("/protos/greet.proto")]
        );
    }

    #[tokio::test]
    async fn test_execute_error_written_as_text() {
        let (mut store, id) = prepared_store();
        let use_case = ExecuteCall::new(Arc::new(MockExecutor::error(CollaboratorError::Connect {
            address: "localhost:50051".to_string(),
            message: "connection refused".to_string(),
        })));

        let target = CallTarget::capture(store.state(), &id, &SchemaSources::new()).unwrap();
        store.apply_result(use_case.execute(target).await);

        assert_eq!(
            store.state().tab(&id).unwrap().response_body,
            "failed to connect to localhost:50051: connection refused"
        );
    }

    #[tokio::test]
    async fn test_missing_method_skips_executor() {
        let mut store = TabStore::new();
        let id = store.state().active_id().clone();
        let executor = Arc::new(MockExecutor::success());
        let use_case = ExecuteCall::new(Arc::clone(&executor));

        let target = CallTarget::capture(store.state(), &id, &SchemaSources::new()).unwrap();
        store.apply_result(use_case.execute(target).await);

        assert_eq!(
            store.state().tab(&id).unwrap().response_body,
            "Please select a method first."
        );
        assert!(executor.seen.lock().expect("Lock poisoned").is_empty());
    }

    #[tokio::test]
    async fn test_response_for_closed_tab_is_dropped() {
        let (mut store, first) = prepared_store();
        let sent_from = store.duplicate(&first).unwrap();
        let use_case = ExecuteCall::new(Arc::new(MockExecutor::success()));

        let target = CallTarget::capture(store.state(), &sent_from, &SchemaSources::new()).unwrap();
        assert!(store.delete(&sent_from));

        let landed = store.apply_result(use_case.execute(target).await);

        assert!(!landed);
        assert_eq!(store.state().len(), 1);
        assert!(store.state().tab(&first).unwrap().response_body.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let (store, id) = prepared_store();
        let use_case =
            ExecuteCall::new(Arc::new(HangingExecutor)).with_timeout(Duration::from_secs(10));

        let target = CallTarget::capture(store.state(), &id, &SchemaSources::new()).unwrap();
        let write = use_case.execute(target).await;

        assert_eq!(
            write.patch.response_body.as_deref(),
            Some("operation timed out after 10s")
        );
    }
}
