//! Test utilities for chatstore
//!
//! Shared builders and storage fakes for unit tests.

use crate::error::{ChatStoreError, Result};
use crate::history::{Message, Role};
use crate::storage::KeyValueStorage;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// Returns a TempDir that will be cleaned up when dropped
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Build a message with a fixed display time
pub fn message(text: &str, role: Role, time: &str) -> Message {
    Message::new(text, role, time)
}

/// Storage that reads as empty and rejects every write
#[derive(Debug)]
pub struct RejectingStorage;

#[async_trait::async_trait]
impl KeyValueStorage for RejectingStorage {
    async fn get_item(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
        Err(ChatStoreError::Storage("write denied".to_string()).into())
    }

    async fn remove_item(&self, _key: &str) -> Result<()> {
        Err(ChatStoreError::Storage("write denied".to_string()).into())
    }
}
