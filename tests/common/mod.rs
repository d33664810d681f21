use std::path::PathBuf;
use std::sync::Arc;

use chatstore::error::{ChatStoreError, Result};
use chatstore::history::{Message, Role, SessionStore};
use chatstore::storage::{FileStorage, KeyValueStorage, MemoryStorage, SledStorage};
use tempfile::TempDir;

#[allow(dead_code)]
pub fn memory_store() -> SessionStore {
    SessionStore::new(Arc::new(MemoryStorage::new()))
}

#[allow(dead_code)]
pub fn sled_store() -> (SessionStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let storage = SledStorage::open(tmp.path().join("history.db")).expect("failed to open sled");
    (SessionStore::new(Arc::new(storage)), tmp)
}

#[allow(dead_code)]
pub fn file_store() -> (SessionStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let storage = FileStorage::new(tmp.path().join("history"));
    (SessionStore::new(Arc::new(storage)), tmp)
}

#[allow(dead_code)]
pub fn msg(text: &str, role: Role, time: &str) -> Message {
    Message::new(text, role, time)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    std::fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Storage whose reads succeed but whose writes are always refused
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct ReadOnlyStorage {
    inner: MemoryStorage,
}

#[allow(dead_code)]
impl ReadOnlyStorage {
    pub fn with_item(key: &str, value: &str) -> Self {
        Self {
            inner: MemoryStorage::with_item(key, value),
        }
    }
}

#[async_trait::async_trait]
impl KeyValueStorage for ReadOnlyStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_item(key).await
    }

    async fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
        Err(ChatStoreError::Storage("storage is read-only".to_string()).into())
    }

    async fn remove_item(&self, _key: &str) -> Result<()> {
        Err(ChatStoreError::Storage("storage is read-only".to_string()).into())
    }
}
