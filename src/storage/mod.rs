//! Key-value storage backends for the chat history blob
//!
//! The history store never touches a database directly. It talks to a
//! [`KeyValueStorage`], a minimal get/set/remove-by-key abstraction, so the
//! durable slot can be an embedded `sled` database, a directory of files,
//! or an in-memory map in tests.
//!
//! - [`memory::MemoryStorage`] -- process-local map, used as the test fake
//! - [`embedded::SledStorage`] -- embedded `sled` database on disk
//! - [`file::FileStorage`] -- one JSON file per key, atomic replace

use std::path::PathBuf;
use std::sync::Arc;

use directories::ProjectDirs;

use crate::config::StorageConfig;
use crate::error::{ChatStoreError, Result};

pub mod embedded;
pub mod file;
pub mod memory;
pub mod types;

pub use embedded::SledStorage;
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use types::StorageBackend;

/// Abstraction over a durable string slot addressed by key.
///
/// Implementations must make `set_item` a whole-value replace: a reader
/// either sees the previous value or the new one, never a mix.
///
/// # Examples
///
/// ```
/// use chatstore::storage::{KeyValueStorage, MemoryStorage};
///
/// # tokio_test::block_on(async {
/// let storage = MemoryStorage::new();
/// storage.set_item("chat_history", "[]").await.unwrap();
/// assert_eq!(storage.get_item("chat_history").await.unwrap().as_deref(), Some("[]"));
/// # });
/// ```
#[async_trait::async_trait]
pub trait KeyValueStorage: Send + Sync + std::fmt::Debug {
    /// Returns the value stored under `key`, or `None` if nothing was stored.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<()>;
}

/// Checks that a storage key is non-empty and limited to `[A-Za-z0-9_-]`.
///
/// Keys double as file names for [`FileStorage`], so anything that could
/// escape the storage directory is rejected.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ChatStoreError::InvalidKey("key cannot be empty".to_string()).into());
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ChatStoreError::InvalidKey(key.to_string()).into());
    }
    Ok(())
}

/// Returns the platform data directory for chatstore.
pub fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "chatstore", "chatstore").ok_or_else(|| {
        ChatStoreError::Storage("Could not determine data directory".to_string())
    })?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

/// Opens the backend described by `config`.
///
/// When no explicit path is configured, on-disk backends live under
/// [`default_data_dir`].
pub fn open_storage(config: &StorageConfig) -> Result<Arc<dyn KeyValueStorage>> {
    let resolve = |leaf: &str| -> Result<PathBuf> {
        match &config.path {
            Some(path) => Ok(path.clone()),
            None => Ok(default_data_dir()?.join(leaf)),
        }
    };

    let storage: Arc<dyn KeyValueStorage> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::Sled => Arc::new(SledStorage::open(resolve("history.db")?)?),
        StorageBackend::File => Arc::new(FileStorage::new(resolve("history")?)),
    };

    tracing::debug!("Opened {} storage backend", config.backend);
    Ok(storage)
}
