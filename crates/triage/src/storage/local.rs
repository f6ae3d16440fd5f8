//! Local filesystem storage implementation.

use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{KeyValueStore, StorageResult, validate_key};

/// File extension used for stored documents.
const EXTENSION: &str = "json";

/// Local filesystem storage implementation.
///
/// Each key maps to `<base>/<key>.json`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Base directory for storage.
    base_path: PathBuf,
}

impl LocalStore {
    /// Create a new local store instance.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Base directory documents are written to.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the full path for a key.
    fn full_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{key}.{EXTENSION}")))
    }

    /// Ensure the base directory exists.
    async fn ensure_base_dir(&self) -> StorageResult<()> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path).await?;
        }
        Ok(())
    }
}

/// Recover the key from a stored file name.
fn key_from_file_name(name: &str) -> Option<&str> {
    name.strip_suffix(EXTENSION)?.strip_suffix('.')
}

#[async_trait]
impl KeyValueStore for LocalStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let full_path = self.full_path(key)?;
        match fs::read_to_string(&full_path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let full_path = self.full_path(key)?;
        self.ensure_base_dir().await?;
        fs::write(&full_path, value).await?;
        debug!("Wrote {} bytes to {}", value.len(), full_path.display());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let full_path = self.full_path(key)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!("Deleted {}", full_path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let mut keys = vec![];
        let mut read_dir = fs::read_dir(&self.base_path).await?;

        while let Some(entry) = read_dir.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(key) = key_from_file_name(name).filter(|key| key.starts_with(prefix)) {
                keys.push(key.to_string());
            }
        }

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (LocalStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path().join("sessions"));
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (store, _dir) = create_test_store();

        store.set("medical-chat-a", "{\"x\":1}").await.unwrap();
        let value = store.get("medical-chat-a").await.unwrap();

        assert_eq!(value.as_deref(), Some("{\"x\":1}"));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let (store, _dir) = create_test_store();
        assert!(store.get("missing").await.unwrap().is_none());
        assert!(!store.contains("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let (store, _dir) = create_test_store();

        store.set("k", "first").await.unwrap();
        store.set("k", "second").await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, _dir) = create_test_store();

        store.set("k", "v").await.unwrap();
        store.delete("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());

        // Deleting again is a no-op
        store.delete("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_keys_filters_prefix() {
        let (store, dir) = create_test_store();

        store.set("medical-chat-1", "a").await.unwrap();
        store.set("medical-chat-2", "b").await.unwrap();
        store.set("other-1", "c").await.unwrap();
        std::fs::write(dir.path().join("sessions").join("notes.txt"), "x").unwrap();

        let mut keys = store.list_keys("medical-chat-").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["medical-chat-1", "medical-chat-2"]);
    }

    #[tokio::test]
    async fn test_list_keys_without_base_dir() {
        let (store, _dir) = create_test_store();
        assert!(store.list_keys("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_path_keys() {
        let (store, _dir) = create_test_store();
        assert!(store.set("../escape", "v").await.is_err());
        assert!(store.get("a/b").await.is_err());
    }
}
