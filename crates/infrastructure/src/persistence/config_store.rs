//! File-backed configuration store.
//!
//! Every key is a JSON file in the config directory:
//! - Linux: ~/.config/rpcdesk/<key>.json
//! - macOS: ~/Library/Application Support/rpcdesk/<key>.json
//! - Windows: %APPDATA%/rpcdesk/<key>.json
//!
//! Changes made by other processes are picked up through a `notify`
//! watcher on the directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rpcdesk_application::ports::{ChangeCallback, ConfigStore, ConfigStoreError, ConfigWatch};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Name of the application directory inside the platform config dir.
pub const APP_DIR_NAME: &str = "rpcdesk";

/// Config store keeping one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    dir: PathBuf,
}

impl FileConfigStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store in the platform config directory.
    ///
    /// # Errors
    /// Returns `ConfigStoreError::NoConfigDir` if the platform has none.
    pub fn default_location() -> Result<Self, ConfigStoreError> {
        Self::default_dir()
            .map(Self::new)
            .ok_or(ConfigStoreError::NoConfigDir)
    }

    /// Returns the platform config directory for the application.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR_NAME))
    }

    /// Returns the directory holding the entries.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file backing `key`.
    ///
    /// # Errors
    /// Returns `ConfigStoreError::InvalidKey` if the key is empty or would
    /// escape the config directory.
    pub fn entry_path(&self, key: &str) -> Result<PathBuf, ConfigStoreError> {
        let valid = !key.trim().is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\'])
            && !key.contains('\0');
        if !valid {
            return Err(ConfigStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

/// Returns the key stored in `path`, if it is a config entry file.
fn entry_key(path: &Path) -> Option<String> {
    path.file_name()?
        .to_str()?
        .strip_suffix(".json")
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}

/// Creation, content writes, renames and removal count; metadata and
/// access events do not.
const fn is_entry_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(modify) => !matches!(modify, ModifyKind::Metadata(_)),
        _ => false,
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get_item(&self, key: &str) -> Result<Option<Value>, ConfigStoreError> {
        let path = self.entry_path(key)?;
        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value =
            from_json_bytes(&content).map_err(|e| ConfigStoreError::Serialization(e.to_string()))?;
        debug!(key, path = %path.display(), "config entry read");
        Ok(Some(value))
    }

    async fn set_item(&self, key: &str, value: &Value) -> Result<(), ConfigStoreError> {
        let path = self.entry_path(key)?;
        fs::create_dir_all(&self.dir).await?;

        let content = to_json_stable_bytes(value)
            .map_err(|e| ConfigStoreError::Serialization(e.to_string()))?;
        fs::write(&path, content).await?;
        info!(key, path = %path.display(), "config entry saved");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), ConfigStoreError> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(key, "config entry removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn on_change(&self, callback: ChangeCallback) -> Result<ConfigWatch, ConfigStoreError> {
        std::fs::create_dir_all(&self.dir)?;

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if is_entry_change(&event.kind) => {
                for key in event.paths.iter().filter_map(|p| entry_key(p)) {
                    debug!(key = %key, kind = ?event.kind, "config entry changed");
                    callback(&key);
                }
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "config watch error"),
        })
        .map_err(|e| ConfigStoreError::Watch(e.to_string()))?;

        watcher
            .watch(&self.dir, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigStoreError::Watch(e.to_string()))?;
        info!(dir = %self.dir.display(), "watching config directory");

        Ok(ConfigWatch::new(watcher))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    fn store() -> (TempDir, FileConfigStore) {
        let temp = TempDir::new().expect("temp dir");
        let store = FileConfigStore::new(temp.path().join("nested").join("rpcdesk"));
        (temp, store)
    }

    #[test]
    fn test_default_dir_ends_with_app_name() {
        if let Some(dir) = FileConfigStore::default_dir() {
            assert!(dir.ends_with(APP_DIR_NAME));
        }
    }

    #[test]
    fn test_entry_path_rejects_bad_keys() {
        let store = FileConfigStore::new("/cfg");
        assert_eq!(
            store.entry_path("import-paths").unwrap(),
            PathBuf::from("/cfg/import-paths.json")
        );
        for key in ["", "  ", "..", "a/b", "a\\b"] {
            assert!(
                matches!(store.entry_path(key), Err(ConfigStoreError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let (_temp, store) = store();
        assert_eq!(store.get_item("schema-files").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_creates_dir_and_writes_stable_json() {
        let (_temp, store) = store();
        store
            .set_item("import-paths", &json!(["/protos"]))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(store.dir().join("import-paths.json")).unwrap();
        assert_eq!(raw, "[\n  \"/protos\"\n]\n");
        assert_eq!(
            store.get_item("import-paths").await.unwrap(),
            Some(json!(["/protos"]))
        );
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let (_temp, store) = store();
        store.set_item("k", &json!(1)).await.unwrap();
        store.set_item("k", &json!(2)).await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_remove_item() {
        let (_temp, store) = store();
        store.remove_item("never-written").await.unwrap();

        store.set_item("k", &json!("v")).await.unwrap();
        store.remove_item("k").await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap(), None);
    }

    #[test]
    fn test_entry_key() {
        assert_eq!(
            entry_key(Path::new("/cfg/import-paths.json")),
            Some("import-paths".to_string())
        );
        assert_eq!(entry_key(Path::new("/cfg/notes.txt")), None);
        assert_eq!(entry_key(Path::new("/cfg/.json")), None);
    }

    #[test]
    fn test_metadata_changes_are_ignored() {
        use notify::event::{CreateKind, DataChange, MetadataKind};

        assert!(is_entry_change(&EventKind::Create(CreateKind::File)));
        assert!(is_entry_change(&EventKind::Modify(ModifyKind::Data(
            DataChange::Content
        ))));
        assert!(!is_entry_change(&EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::Any
        ))));
    }

    async fn next_key(rx: &mut mpsc::UnboundedReceiver<String>, wanted: &str) -> bool {
        let wait = async {
            while let Some(key) = rx.recv().await {
                if key == wanted {
                    return true;
                }
            }
            false
        };
        tokio::time::timeout(Duration::from_secs(10), wait)
            .await
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_on_change_reports_written_and_removed_keys() {
        let (_temp, store) = store();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _watch = store
            .on_change(Box::new(move |key| {
                let _ = tx.send(key.to_string());
            }))
            .unwrap();

        // A second store stands in for another process sharing the directory
        let other = FileConfigStore::new(store.dir());
        other
            .set_item("schema-files", &json!(["/protos/greet.proto"]))
            .await
            .unwrap();
        assert!(next_key(&mut rx, "schema-files").await);
        tokio::time::sleep(Duration::from_millis(200)).await;
        while rx.try_recv().is_ok() {}

        other.remove_item("schema-files").await.unwrap();
        assert!(next_key(&mut rx, "schema-files").await);

        std::fs::write(store.dir().join("notes.txt"), "x").unwrap();
        other.set_item("import-paths", &json!([])).await.unwrap();
        assert!(next_key(&mut rx, "import-paths").await);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_serialization_error() {
        let (_temp, store) = store();
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.dir().join("k.json"), "{oops").unwrap();

        let result = store.get_item("k").await;
        assert!(matches!(result, Err(ConfigStoreError::Serialization(_))));
    }
}
