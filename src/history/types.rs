//! Chat history data model
//!
//! The serialized form of these types is the persisted blob layout:
//! `[{"id": "...", "messages": [{"text": "...", "role": "user"|"bot", "time": "..."}]}]`.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format used to stamp [`Message::time`]
pub const MESSAGE_TIME_FORMAT: &str = "%-I:%M:%S %p";

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the person using the app
    User,
    /// Produced by the remote endpoint (including greetings and error notes)
    Bot,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Bot => f.write_str("bot"),
        }
    }
}

/// A single chat turn
///
/// # Examples
///
/// ```
/// use chatstore::history::{Message, Role};
///
/// let msg = Message::new("hi", Role::User, "10:00");
/// assert_eq!(msg.text, "hi");
/// assert_eq!(msg.role, Role::User);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message body
    pub text: String,
    /// Author of the message
    pub role: Role,
    /// Display-formatted timestamp
    pub time: String,
}

impl Message {
    /// Builds a message with an explicit display time.
    pub fn new(text: impl Into<String>, role: Role, time: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            role,
            time: time.into(),
        }
    }

    /// Builds a user message stamped with the current local time.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Role::User, display_time_now())
    }

    /// Builds a bot message stamped with the current local time.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Role::Bot, display_time_now())
    }
}

/// One conversation: an id plus its messages in transcript order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Opaque identity; conventionally epoch milliseconds
    pub id: String,
    /// Messages in the order they were appended
    pub messages: Vec<Message>,
}

impl ChatSession {
    /// Creates a session holding a single first message.
    pub fn with_first_message(id: impl Into<String>, message: Message) -> Self {
        Self {
            id: id.into(),
            messages: vec![message],
        }
    }

    /// Most recent message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Returns a fresh session id: the current epoch milliseconds as a string.
///
/// # Examples
///
/// ```
/// use chatstore::history::new_session_id;
///
/// let id = new_session_id();
/// assert!(id.parse::<i64>().is_ok());
/// ```
pub fn new_session_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// Current local time formatted with [`MESSAGE_TIME_FORMAT`].
pub fn display_time_now() -> String {
    Local::now().format(MESSAGE_TIME_FORMAT).to_string()
}
