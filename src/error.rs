//! Error types for chatstore
//!
//! This module defines the error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for chatstore operations
///
/// Covers configuration loading, storage backend failures, and decoding
/// of the persisted chat history blob.
#[derive(Error, Debug)]
pub enum ChatStoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage backend errors (open, read, write, flush)
    #[error("Storage error: {0}")]
    Storage(String),

    /// The persisted history blob could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// A storage key contains characters the backend cannot address
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for chatstore operations
///
/// Uses `anyhow::Error` as the error type so callers get rich context
/// while still being able to downcast to [`ChatStoreError`].
pub type Result<T> = anyhow::Result<T>;
