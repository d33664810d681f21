//! chatstore - durable chat-session history library
//!
//! Stores chat conversations as one JSON blob in an app-local key-value
//! slot and keeps them consistent across read, append, and delete calls.
//!
//! # Architecture
//!
//! - `history`: data model, [`SessionStore`], and history listing helpers
//! - `storage`: key-value backends (sled, file, in-memory)
//! - `chat`: [`ChatThread`], an open conversation bound to the store
//! - `config`: configuration loading and validation
//! - `error`: error types and result aliases
//! - `cli` / `commands`: the command-line front end
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chatstore::{Message, Role, SessionStore};
//! use chatstore::storage::MemoryStorage;
//!
//! # tokio_test::block_on(async {
//! let store = SessionStore::new(Arc::new(MemoryStorage::new()));
//! store.append_message("100", Message::new("hi", Role::User, "10:00")).await?;
//! store.delete_session("100").await?;
//! assert!(store.read_all().await?.is_empty());
//! # Ok::<(), anyhow::Error>(())
//! # }).unwrap();
//! ```

pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod history;
pub mod storage;

// Re-export commonly used types
pub use chat::ChatThread;
pub use config::Config;
pub use error::{ChatStoreError, Result};
pub use history::{ChatSession, ErrorPolicy, Message, Role, SaveOutcome, SessionStore};

#[cfg(test)]
pub mod test_utils;
