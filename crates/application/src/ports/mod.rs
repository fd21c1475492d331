//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer
//! or by the host application.

mod collaborators;
mod config_store;

pub use collaborators::{CallExecutor, CollaboratorError, MethodDiscovery, TemplateGenerator};
pub use config_store::{ChangeCallback, ConfigStore, ConfigStoreError, ConfigWatch};
