//! Configuration store port.

use std::any::Any;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

/// Error type for configuration store operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigStoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The key cannot be used as a config entry name.
    #[error("Invalid config key: {0:?}")]
    InvalidKey(String),

    /// Could not determine config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// The store could not be watched for changes.
    #[error("Could not watch config: {0}")]
    Watch(String),
}

/// Callback receiving the key of every changed config entry.
pub type ChangeCallback = Box<dyn Fn(&str) + Send + Sync + 'static>;

/// Active subscription to config changes. Watching stops when it is dropped.
pub struct ConfigWatch {
    _handle: Box<dyn Any + Send>,
}

impl ConfigWatch {
    /// Wraps whatever keeps the underlying watcher alive.
    pub fn new(handle: impl Any + Send) -> Self {
        Self {
            _handle: Box::new(handle),
        }
    }
}

impl fmt::Debug for ConfigWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigWatch").finish_non_exhaustive()
    }
}

/// Key/value store for user configuration.
///
/// Values are JSON documents addressed by a short key.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored under the key.
    ///
    /// # Errors
    /// Returns an error if the value exists but cannot be read.
    async fn get_item(&self, key: &str) -> Result<Option<Value>, ConfigStoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the value cannot be written.
    async fn set_item(&self, key: &str, value: &Value) -> Result<(), ConfigStoreError>;

    /// Removes the value stored under `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    /// Returns an error if an existing value cannot be removed.
    async fn remove_item(&self, key: &str) -> Result<(), ConfigStoreError>;

    /// Calls `callback` with the key of every entry that is created,
    /// written or removed, until the returned watch is dropped.
    ///
    /// # Errors
    /// Returns an error if the store cannot be watched.
    fn on_change(&self, callback: ChangeCallback) -> Result<ConfigWatch, ConfigStoreError>;
}
