//! RpcDesk Domain - Core workspace types
//!
//! This crate defines the domain model for the RpcDesk request workspace:
//! request tabs, the multi-tab workspace state and its transitions, and
//! the data exchanged with remote-call collaborators.
//! All types here are pure Rust with no I/O dependencies.

pub mod action;
pub mod call;
pub mod error;
pub mod id;
pub mod schema;
pub mod tab;
pub mod workspace;

pub use action::{IgnoreReason, Outcome, TabAction};
pub use call::{CallRequest, CallResult, STATUS_CODE_TRAILER};
pub use error::{DomainError, DomainResult};
pub use id::TabId;
pub use schema::SchemaSources;
pub use tab::{DEFAULT_TAB_TITLE, Tab, TabPatch, TabWrite, copy_title};
pub use workspace::{Transition, WorkspaceState};
