//! Storage trait definitions.

use async_trait::async_trait;

use super::{StorageError, StorageResult};

/// Key-value store holding string documents.
///
/// Writes overwrite wholesale; there are no partial updates and no
/// transactions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// List all keys starting with `prefix`, in no particular order.
    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Check if a key exists.
    async fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

/// Reject keys that cannot be used as a single path component.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty()
        || key == "."
        || key == ".."
        || key.contains('/')
        || key.contains('\\')
        || key.contains('\0')
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_accepts_session_keys() {
        assert!(validate_key("medical-chat-1718000000000-k3j2h1g0f").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_paths() {
        assert!(validate_key("").is_err());
        assert!(validate_key("..").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("a\\b").is_err());
    }
}
