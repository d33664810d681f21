//! Embedded `sled` storage backend
//!
//! Keeps each key as a single sled entry. Every write is flushed before
//! returning so a completed `set_item` survives a crash.

use std::path::Path;

use sled::Db;

use crate::error::{ChatStoreError, Result};
use crate::storage::KeyValueStorage;

/// [`KeyValueStorage`] backed by an embedded `sled` database.
#[derive(Debug)]
pub struct SledStorage {
    db: Db,
}

impl SledStorage {
    /// Open or create a sled database at `path`
    ///
    /// # Errors
    ///
    /// Returns `ChatStoreError::Storage` if the database cannot be opened
    ///
    /// # Examples
    ///
    /// ```
    /// use chatstore::storage::SledStorage;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let storage = SledStorage::open(dir.path().join("history.db")).unwrap();
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path.as_ref())
            .map_err(|e| ChatStoreError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self { db })
    }
}

#[async_trait::async_trait]
impl KeyValueStorage for SledStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .get(key.as_bytes())
            .map_err(|e| ChatStoreError::Storage(format!("Get failed: {}", e)))?;

        match value {
            Some(bytes) => {
                let text = String::from_utf8(bytes.to_vec())
                    .map_err(|e| ChatStoreError::Decode(format!("Value is not UTF-8: {}", e)))?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| ChatStoreError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| ChatStoreError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| ChatStoreError::Storage(format!("Remove failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| ChatStoreError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }
}
