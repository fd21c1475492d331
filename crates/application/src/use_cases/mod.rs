//! Application use cases (business logic orchestration).

mod discover_methods;
mod execute_call;
mod generate_template;
mod schema_sources;

use std::future::Future;
use std::time::Duration;

pub use discover_methods::*;
pub use execute_call::*;
pub use generate_template::*;
pub use schema_sources::*;

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::CollaboratorError;

/// Time a collaborator gets to answer before the use case gives up.
pub const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs a collaborator future with a deadline.
async fn bounded<T, F>(limit: Duration, future: F) -> ApplicationResult<T>
where
    F: Future<Output = Result<T, CollaboratorError>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result.map_err(ApplicationError::from),
        Err(_) => Err(ApplicationError::Timeout(limit)),
    }
}
