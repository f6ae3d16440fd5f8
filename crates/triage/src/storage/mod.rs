//! Key-value storage abstraction.
//!
//! Sessions are persisted through an injected [`KeyValueStore`] rather than a
//! process-wide singleton. Implementations:
//! - Local filesystem storage (one JSON document per key)
//! - In-memory storage (tests, ephemeral runs)

mod error;
mod local;
mod memory;
mod traits;

use std::path::PathBuf;
use std::sync::Arc;

pub use error::{StorageError, StorageResult};
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use traits::{KeyValueStore, validate_key};

/// Create a key-value store based on configuration.
pub fn create_store(config: StorageConfig) -> Arc<dyn KeyValueStore> {
    match config {
        StorageConfig::Local(path) => Arc::new(LocalStore::new(path)),
        StorageConfig::Memory => Arc::new(MemoryStore::new()),
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Local filesystem storage rooted at the given directory.
    Local(PathBuf),
    /// Non-persistent in-memory storage.
    Memory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Local(std::env::temp_dir().join("triage-sessions"))
    }
}
