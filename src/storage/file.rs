//! File-per-key storage backend
//!
//! Each key is stored as `<dir>/<key>.json`. Every write goes to its own
//! uniquely named temporary file in the same directory and is renamed
//! into place, so the stored value is always one writer's whole blob.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{ChatStoreError, Result};
use crate::storage::{validate_key, KeyValueStorage};

/// [`KeyValueStorage`] that keeps one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a storage rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

fn replace_file(dir: &Path, path: &Path, value: &str) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
        ChatStoreError::Storage(format!("Failed to create temp file in {}: {}", dir.display(), e))
    })?;
    tmp.write_all(value.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| {
            ChatStoreError::Storage(format!("Failed to write {}: {}", tmp.path().display(), e))
        })?;
    tmp.persist(path).map_err(|e| {
        ChatStoreError::Storage(format!("Failed to replace {}: {}", path.display(), e.error))
    })?;
    Ok(())
}

#[async_trait::async_trait]
impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ChatStoreError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))
            .into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ChatStoreError::Storage(format!(
                "Failed to create storage directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let dir = self.dir.clone();
        let value = value.to_string();
        tokio::task::spawn_blocking(move || replace_file(&dir, &path, &value))
            .await
            .map_err(|e| ChatStoreError::Storage(format!("Write task failed: {}", e)))??;

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ChatStoreError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))
            .into()),
        }
    }
}
