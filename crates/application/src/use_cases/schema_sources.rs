//! Load and save the schema source lists.
//!
//! Each list lives under its own config key as a JSON array of path
//! strings. A missing key is an empty list.

use std::path::PathBuf;

use rpcdesk_domain::SchemaSources;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::ConfigStore;

/// Config key holding the import paths.
pub const IMPORT_PATHS_KEY: &str = "import-paths";

/// Config key holding the schema files.
pub const SCHEMA_FILES_KEY: &str = "schema-files";

/// Use case for reading the persisted schema sources.
pub struct LoadSchemaSources<S: ConfigStore> {
    store: S,
}

impl<S: ConfigStore> LoadSchemaSources<S> {
    /// Creates a new `LoadSchemaSources` use case.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads both lists.
    ///
    /// # Errors
    /// Returns an error if the store fails or a stored value is not an
    /// array of strings.
    pub async fn execute(&self) -> ApplicationResult<SchemaSources> {
        let import_paths = self.read_list(IMPORT_PATHS_KEY).await?;
        let schema_files = self.read_list(SCHEMA_FILES_KEY).await?;
        debug!(
            import_paths = import_paths.len(),
            schema_files = schema_files.len(),
            "loaded schema sources"
        );

        let mut sources = SchemaSources::new();
        sources.add_import_paths(import_paths);
        sources.add_schema_files(schema_files);
        Ok(sources)
    }

    async fn read_list(&self, key: &str) -> ApplicationResult<Vec<PathBuf>> {
        match self.store.get_item(key).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value::<Vec<PathBuf>>(value).map_err(|e| {
                ApplicationError::InvalidConfig {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            }),
        }
    }
}

/// Use case for persisting the schema sources.
pub struct SaveSchemaSources<S: ConfigStore> {
    store: S,
}

impl<S: ConfigStore> SaveSchemaSources<S> {
    /// Creates a new `SaveSchemaSources` use case.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Writes both lists. An empty list removes its key.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub async fn execute(&self, sources: &SchemaSources) -> ApplicationResult<()> {
        self.write_list(IMPORT_PATHS_KEY, &sources.import_paths)
            .await?;
        self.write_list(SCHEMA_FILES_KEY, &sources.schema_files)
            .await?;
        Ok(())
    }

    async fn write_list(&self, key: &str, paths: &[PathBuf]) -> ApplicationResult<()> {
        if paths.is_empty() {
            self.store.remove_item(key).await?;
            return Ok(());
        }
        let value = Value::Array(
            paths
                .iter()
                .map(|p| Value::String(p.to_string_lossy().into_owned()))
                .collect(),
        );
        self.store.set_item(key, &value).await?;
        Ok(())
    }
}
