//! RpcDesk Application - Tab store, use cases and ports
//!
//! This crate defines the application layer with:
//! - The tab store, sole writer of the workspace state
//! - Port traits for the remote-call collaborators and the config store
//! - Use cases that run collaborators and write results back into tabs

pub mod error;
pub mod ports;
pub mod store;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult, MISSING_METHOD_MESSAGE};
pub use ports::{
    CallExecutor, ChangeCallback, CollaboratorError, ConfigStore, ConfigStoreError, ConfigWatch,
    MethodDiscovery, TemplateGenerator,
};
pub use store::TabStore;
pub use use_cases::{
    CallTarget, DEFAULT_COLLABORATOR_TIMEOUT, DiscoverMethods, ExecuteCall, GenerateTemplate,
    IMPORT_PATHS_KEY, LoadSchemaSources, MethodOptions, SCHEMA_FILES_KEY, SaveSchemaSources,
    TemplateTarget,
};
