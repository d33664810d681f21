//! Chat thread: one open conversation bound to the session store
//!
//! A thread keeps the in-memory transcript a chat view renders and
//! appends every new turn to the store as it happens. Opening an unknown
//! session creates it by storing a greeting from the bot.

use std::sync::Arc;

use crate::error::Result;
use crate::history::{Message, SaveOutcome, SessionStore};

/// Default greeting stored as the first message of a new session
pub const DEFAULT_GREETING: &str = "👋 Hi! All your messages will be sent to the webhook!";

/// An open conversation
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chatstore::chat::ChatThread;
/// use chatstore::history::SessionStore;
/// use chatstore::storage::MemoryStorage;
///
/// # tokio_test::block_on(async {
/// let store = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())));
/// let mut thread = ChatThread::open(store, "100", "hello").await.unwrap();
/// thread.record_user("hi there").await.unwrap();
/// assert_eq!(thread.messages().len(), 2);
/// # });
/// ```
#[derive(Debug)]
pub struct ChatThread {
    store: Arc<SessionStore>,
    session_id: String,
    messages: Vec<Message>,
}

impl ChatThread {
    /// Opens `session_id`, loading its transcript.
    ///
    /// If the store has no such session, a bot message with `greeting` is
    /// appended, which creates it.
    pub async fn open(
        store: Arc<SessionStore>,
        session_id: impl Into<String>,
        greeting: &str,
    ) -> Result<Self> {
        let session_id = session_id.into();

        let messages = match store.get_session(&session_id).await? {
            Some(session) => {
                tracing::debug!(
                    session_id = %session_id,
                    messages = session.messages.len(),
                    "Resuming chat session"
                );
                session.messages
            }
            None => {
                let greeting = Message::bot(greeting);
                let outcome = store.append_message(&session_id, greeting.clone()).await?;
                if !outcome.is_persisted() {
                    tracing::warn!(session_id = %session_id, "Greeting was not persisted");
                }
                vec![greeting]
            }
        };

        Ok(Self {
            store,
            session_id,
            messages,
        })
    }

    /// Id of the open session.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Transcript as shown to the user, including turns whose write was
    /// not persisted.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Records text typed by the user.
    ///
    /// Blank input is ignored and yields `None`.
    pub async fn record_user(&mut self, text: &str) -> Result<Option<SaveOutcome>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        self.record(Message::user(text)).await.map(Some)
    }

    /// Records a reply (or an error note) from the bot.
    pub async fn record_bot(&mut self, text: &str) -> Result<SaveOutcome> {
        self.record(Message::bot(text)).await
    }

    async fn record(&mut self, message: Message) -> Result<SaveOutcome> {
        self.messages.push(message.clone());
        self.store.append_message(&self.session_id, message).await
    }
}
