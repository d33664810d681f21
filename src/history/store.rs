//! Session store: the single source of truth for chat history
//!
//! All sessions live in one JSON blob under one key of a
//! [`KeyValueStorage`]. Every mutating operation is a read-modify-write of
//! the whole blob. A store-wide async mutex serializes those sequences
//! when `serialize_writes` is enabled; without it two racing writers
//! resolve last-writer-wins on the entire collection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tokio::sync::{Mutex, MutexGuard};

use crate::config::Config;
use crate::error::{ChatStoreError, Result};
use crate::history::types::{ChatSession, Message};
use crate::storage::{open_storage, KeyValueStorage};

/// Key the history blob is stored under unless configured otherwise
pub const DEFAULT_HISTORY_KEY: &str = "chat_history";

/// How the store reacts to storage and decode failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Unreadable history reads as empty; failed writes are logged and
    /// reported as [`SaveOutcome::NotPersisted`]
    #[default]
    Lenient,
    /// Every failure is returned to the caller
    Strict,
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(ErrorPolicy::Lenient),
            "strict" => Ok(ErrorPolicy::Strict),
            other => Err(format!("unknown error policy: {}", other)),
        }
    }
}

/// Result of a write under the lenient policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The blob was replaced
    Persisted,
    /// The write failed and was swallowed; durable state is unchanged
    NotPersisted,
}

impl SaveOutcome {
    /// `true` when the write reached storage.
    pub fn is_persisted(self) -> bool {
        matches!(self, SaveOutcome::Persisted)
    }
}

/// Durable store of all chat sessions
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chatstore::history::{Message, Role, SessionStore};
/// use chatstore::storage::MemoryStorage;
///
/// # tokio_test::block_on(async {
/// let store = SessionStore::new(Arc::new(MemoryStorage::new()));
/// store.append_message("100", Message::new("hi", Role::User, "10:00")).await.unwrap();
///
/// let sessions = store.read_all().await.unwrap();
/// assert_eq!(sessions.len(), 1);
/// assert_eq!(sessions[0].messages[0].text, "hi");
/// # });
/// ```
#[derive(Debug)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    error_policy: ErrorPolicy,
    serialize_writes: bool,
    write_lock: Mutex<()>,
}

impl SessionStore {
    /// Creates a lenient, write-serializing store over `storage` using
    /// [`DEFAULT_HISTORY_KEY`].
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            key: DEFAULT_HISTORY_KEY.to_string(),
            error_policy: ErrorPolicy::default(),
            serialize_writes: true,
            write_lock: Mutex::new(()),
        }
    }

    /// Opens the configured backend and applies the store settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = open_storage(&config.storage)?;
        Ok(Self::new(storage)
            .with_key(config.storage.key.clone())
            .with_error_policy(config.store.error_policy)
            .with_serialize_writes(config.store.serialize_writes))
    }

    /// Uses `key` for the history blob.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Sets the failure policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Enables or disables the store-wide write guard.
    pub fn with_serialize_writes(mut self, enabled: bool) -> Self {
        self.serialize_writes = enabled;
        self
    }

    /// Key the blob is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Active failure policy.
    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Returns every stored session, exactly as decoded.
    ///
    /// Nothing stored yet reads as an empty collection. Under the lenient
    /// policy an unreadable or malformed blob also reads as empty.
    ///
    /// # Errors
    ///
    /// Strict policy only: storage read failures and
    /// [`ChatStoreError::Decode`] for a malformed blob.
    pub async fn read_all(&self) -> Result<Vec<ChatSession>> {
        match self.load().await {
            Ok(history) => Ok(history),
            Err(e) if self.error_policy == ErrorPolicy::Lenient => {
                tracing::warn!(key = %self.key, error = %e, "Failed to load chat history, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Returns the session with `session_id`, if stored.
    pub async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>> {
        let history = self.read_all().await?;
        Ok(history.into_iter().find(|s| s.id == session_id))
    }

    /// Replaces the whole stored collection with `history`.
    pub async fn save_history(&self, history: &[ChatSession]) -> Result<SaveOutcome> {
        let _guard = self.guard().await;
        self.write(history).await
    }

    /// Appends `message` to the session `session_id`, creating the session
    /// at the end of the collection if it does not exist yet.
    ///
    /// # Returns
    ///
    /// Whether the updated collection reached storage. After
    /// [`SaveOutcome::Persisted`] the next [`read_all`](Self::read_all)
    /// contains the message exactly once.
    pub async fn append_message(&self, session_id: &str, message: Message) -> Result<SaveOutcome> {
        let _guard = self.guard().await;
        let mut history = self.read_all().await?;

        match history.iter_mut().find(|s| s.id == session_id) {
            Some(session) => session.messages.push(message),
            None => {
                tracing::debug!(session_id, "Creating chat session");
                history.push(ChatSession::with_first_message(session_id, message));
            }
        }

        self.write(&history).await
    }

    /// Removes the session `session_id`. Unknown ids leave the collection
    /// unchanged.
    pub async fn delete_session(&self, session_id: &str) -> Result<SaveOutcome> {
        let _guard = self.guard().await;
        let mut history = self.read_all().await?;

        let before = history.len();
        history.retain(|s| s.id != session_id);
        if history.len() == before {
            tracing::debug!(session_id, "No chat session to delete");
        }

        self.write(&history).await
    }

    /// Removes the stored blob entirely. The next
    /// [`read_all`](Self::read_all) returns an empty collection.
    pub async fn clear(&self) -> Result<SaveOutcome> {
        let _guard = self.guard().await;
        let removed = self.storage.remove_item(&self.key).await;
        self.settle(removed, "Failed to clear chat history")
    }

    async fn guard(&self) -> Option<MutexGuard<'_, ()>> {
        if self.serialize_writes {
            Some(self.write_lock.lock().await)
        } else {
            None
        }
    }

    async fn load(&self) -> Result<Vec<ChatSession>> {
        let Some(raw) = self.storage.get_item(&self.key).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| ChatStoreError::Decode(e.to_string()).into())
    }

    async fn write(&self, history: &[ChatSession]) -> Result<SaveOutcome> {
        let persisted = self.persist(history).await;
        self.settle(persisted, "Failed to save chat history")
    }

    fn settle(&self, result: Result<()>, failure: &str) -> Result<SaveOutcome> {
        match result {
            Ok(()) => Ok(SaveOutcome::Persisted),
            Err(e) => match self.error_policy {
                ErrorPolicy::Lenient => {
                    tracing::error!(key = %self.key, error = %e, "{}", failure);
                    Ok(SaveOutcome::NotPersisted)
                }
                ErrorPolicy::Strict => Err(e),
            },
        }
    }

    async fn persist(&self, history: &[ChatSession]) -> Result<()> {
        let json = serde_json::to_string(history).map_err(ChatStoreError::Serialization)?;
        self.storage.set_item(&self.key, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::types::Role;
    use crate::storage::MemoryStorage;
    use crate::test_utils::{message, RejectingStorage};

    fn memory_store() -> SessionStore {
        SessionStore::new(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_read_all_on_virgin_storage_is_empty() {
        let store = memory_store();
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_creates_session() {
        let store = memory_store();
        let outcome = store
            .append_message("100", message("hi", Role::User, "10:00"))
            .await
            .unwrap();
        assert_eq!(outcome, SaveOutcome::Persisted);

        let history = store.read_all().await.unwrap();
        assert_eq!(
            history,
            vec![ChatSession::with_first_message(
                "100",
                message("hi", Role::User, "10:00")
            )]
        );
    }

    #[tokio::test]
    async fn test_append_preserves_call_order() {
        let store = memory_store();
        for i in 0..5 {
            store
                .append_message("s", message(&format!("m{}", i), Role::User, "t"))
                .await
                .unwrap();
        }

        let history = store.read_all().await.unwrap();
        assert_eq!(history.len(), 1);
        let texts: Vec<_> = history[0].messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["m0", "m1", "m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn test_new_sessions_are_added_at_the_end() {
        let store = memory_store();
        store.append_message("a", message("1", Role::User, "t")).await.unwrap();
        store.append_message("b", message("2", Role::User, "t")).await.unwrap();
        store.append_message("a", message("3", Role::Bot, "t")).await.unwrap();

        let ids: Vec<_> = store
            .read_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_delete_removes_only_target() {
        let store = memory_store();
        store.append_message("a", message("1", Role::User, "t")).await.unwrap();
        store.append_message("b", message("2", Role::User, "t")).await.unwrap();

        store.delete_session("a").await.unwrap();

        let history = store.read_all().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, "b");
        assert_eq!(history[0].messages[0].text, "2");
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let store = memory_store();
        store.append_message("a", message("1", Role::User, "t")).await.unwrap();
        let before = store.read_all().await.unwrap();

        let outcome = store.delete_session("missing").await.unwrap();
        assert!(outcome.is_persisted());
        assert_eq!(store.read_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_get_session() {
        let store = memory_store();
        store.append_message("a", message("1", Role::User, "t")).await.unwrap();
        assert!(store.get_session("a").await.unwrap().is_some());
        assert!(store.get_session("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lenient_malformed_blob_reads_empty() {
        let storage = Arc::new(MemoryStorage::with_item(DEFAULT_HISTORY_KEY, "{not json"));
        let store = SessionStore::new(storage);
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lenient_append_overwrites_malformed_blob() {
        let storage = Arc::new(MemoryStorage::with_item(DEFAULT_HISTORY_KEY, "{not json"));
        let store = SessionStore::new(storage);
        store.append_message("a", message("1", Role::User, "t")).await.unwrap();
        assert_eq!(store.read_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_strict_malformed_blob_is_decode_error() {
        let storage = Arc::new(MemoryStorage::with_item(DEFAULT_HISTORY_KEY, "{not json"));
        let store = SessionStore::new(storage).with_error_policy(ErrorPolicy::Strict);

        let err = store.read_all().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChatStoreError>(),
            Some(ChatStoreError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_lenient_write_failure_is_not_persisted() {
        let store = SessionStore::new(Arc::new(RejectingStorage));
        let outcome = store
            .append_message("a", message("1", Role::User, "t"))
            .await
            .unwrap();
        assert_eq!(outcome, SaveOutcome::NotPersisted);
        assert!(!outcome.is_persisted());
    }

    #[tokio::test]
    async fn test_strict_write_failure_is_error() {
        let store =
            SessionStore::new(Arc::new(RejectingStorage)).with_error_policy(ErrorPolicy::Strict);
        let result = store.append_message("a", message("1", Role::User, "t")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_custom_key_is_used() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone()).with_key("other_history");
        store.append_message("a", message("1", Role::User, "t")).await.unwrap();

        assert!(storage.get_item(DEFAULT_HISTORY_KEY).await.unwrap().is_none());
        assert!(storage.get_item("other_history").await.unwrap().is_some());
    }

    #[test]
    fn test_error_policy_from_str() {
        assert_eq!("STRICT".parse::<ErrorPolicy>(), Ok(ErrorPolicy::Strict));
        assert_eq!("lenient".parse::<ErrorPolicy>(), Ok(ErrorPolicy::Lenient));
        assert!("loose".parse::<ErrorPolicy>().is_err());
    }

    #[tokio::test]
    async fn test_clear_removes_every_session() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        store.append_message("a", message("1", Role::User, "t")).await.unwrap();
        store.append_message("b", message("2", Role::Bot, "t")).await.unwrap();

        assert_eq!(store.clear().await.unwrap(), SaveOutcome::Persisted);
        assert!(store.read_all().await.unwrap().is_empty());
        assert!(storage.get_item(DEFAULT_HISTORY_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_on_empty_storage_is_persisted() {
        let store = memory_store();
        assert_eq!(store.clear().await.unwrap(), SaveOutcome::Persisted);
    }

    #[tokio::test]
    async fn test_clear_rejected_lenient_is_not_persisted() {
        let store = SessionStore::new(Arc::new(RejectingStorage));
        assert_eq!(store.clear().await.unwrap(), SaveOutcome::NotPersisted);
    }

    #[tokio::test]
    async fn test_clear_rejected_strict_is_storage_error() {
        let store =
            SessionStore::new(Arc::new(RejectingStorage)).with_error_policy(ErrorPolicy::Strict);
        let err = store.clear().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChatStoreError>(),
            Some(ChatStoreError::Storage(_))
        ));
    }
}
