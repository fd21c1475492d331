//! Persistence adapters.

mod config_store;

pub use config_store::{APP_DIR_NAME, FileConfigStore};
