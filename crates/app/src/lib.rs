//! RpcDesk - console front-end for the request workspace
//!
//! Wires the tab store and the file-backed config store into a
//! line-oriented console.

pub mod config;
pub mod console;

pub use config::{AppConfig, ConfigError};
pub use console::{Command, CommandError, Console, Field, Reply, SchemaEdit, render_strip};
