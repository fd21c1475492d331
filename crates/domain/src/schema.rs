//! Schema source hints.
//!
//! When a server does not expose reflection, the call executor resolves
//! methods from local schema files. The user maintains two lists: import
//! paths searched for dependencies, and explicit schema files to load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Import paths and schema files handed to the call executor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSources {
    /// Directories searched when resolving schema imports.
    #[serde(default)]
    pub import_paths: Vec<PathBuf>,
    /// Schema files to load.
    #[serde(default)]
    pub schema_files: Vec<PathBuf>,
}

impl SchemaSources {
    /// Creates empty schema sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if neither list has entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.import_paths.is_empty() && self.schema_files.is_empty()
    }

    /// Adds import paths, skipping ones already present.
    pub fn add_import_paths<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        extend_unique(&mut self.import_paths, paths);
    }

    /// Removes the given import paths.
    pub fn remove_import_paths<P: AsRef<Path>>(&mut self, paths: &[P]) {
        self.import_paths
            .retain(|existing| !paths.iter().any(|p| p.as_ref() == existing));
    }

    /// Adds schema files, skipping ones already present.
    pub fn add_schema_files<I, P>(&mut self, files: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        extend_unique(&mut self.schema_files, files);
    }

    /// Removes the given schema files.
    pub fn remove_schema_files<P: AsRef<Path>>(&mut self, files: &[P]) {
        self.schema_files
            .retain(|existing| !files.iter().any(|p| p.as_ref() == existing));
    }

    /// Returns the import paths extended with the directory of every
    /// schema file.
    ///
    /// Absolute schema files are only resolvable when their own directory
    /// is on the import path, so it is always added.
    #[must_use]
    pub fn effective_import_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.import_paths.clone();
        let parents = self
            .schema_files
            .iter()
            .filter_map(|file| file.parent())
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf);
        extend_unique(&mut paths, parents);
        paths
    }
}

fn extend_unique<I, P>(target: &mut Vec<PathBuf>, items: I)
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    for item in items {
        let item = item.into();
        if !target.contains(&item) {
            target.push(item);
        }
    }
}
