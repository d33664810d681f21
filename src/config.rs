//! Configuration management for chatstore
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::chat::DEFAULT_GREETING;
use crate::error::{ChatStoreError, Result};
use crate::history::{ErrorPolicy, DEFAULT_HISTORY_KEY};
use crate::storage::{validate_key, StorageBackend};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for chatstore
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where the history blob lives
    #[serde(default)]
    pub storage: StorageConfig,
    /// Session store behavior
    #[serde(default)]
    pub store: StoreConfig,
    /// Chat thread settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend type: sled, file, or memory
    #[serde(default)]
    pub backend: StorageBackend,

    /// Database path (sled) or directory (file). Defaults to the platform
    /// data directory when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Key the history blob is stored under
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_key() -> String {
    DEFAULT_HISTORY_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            key: default_key(),
        }
    }
}

/// Session store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `lenient` swallows failures, `strict` returns them
    #[serde(default)]
    pub error_policy: ErrorPolicy,

    /// Serialize read-modify-write sequences behind one store-wide lock
    #[serde(default = "default_serialize_writes")]
    pub serialize_writes: bool,
}

fn default_serialize_writes() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::default(),
            serialize_writes: default_serialize_writes(),
        }
    }
}

/// Chat thread configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// First bot message stored in every new session
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatStoreError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ChatStoreError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(backend) = std::env::var("CHATSTORE_BACKEND") {
            match backend.parse() {
                Ok(value) => self.storage.backend = value,
                Err(e) => tracing::warn!("Invalid CHATSTORE_BACKEND: {}", e),
            }
        }

        if let Ok(path) = std::env::var("CHATSTORE_PATH") {
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Ok(key) = std::env::var("CHATSTORE_KEY") {
            self.storage.key = key;
        }

        if let Ok(policy) = std::env::var("CHATSTORE_ERROR_POLICY") {
            match policy.parse() {
                Ok(value) => self.store.error_policy = value,
                Err(e) => tracing::warn!("Invalid CHATSTORE_ERROR_POLICY: {}", e),
            }
        }

        if let Ok(serialize) = std::env::var("CHATSTORE_SERIALIZE_WRITES") {
            if let Ok(value) = serialize.parse() {
                self.store.serialize_writes = value;
            } else {
                tracing::warn!("Invalid CHATSTORE_SERIALIZE_WRITES: {}", serialize);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(path) = &cli.storage_path {
            self.storage.path = Some(path.clone());
        }
        if cli.strict {
            self.store.error_policy = ErrorPolicy::Strict;
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the storage key is unusable or the greeting is empty
    pub fn validate(&self) -> Result<()> {
        validate_key(&self.storage.key).map_err(|e| {
            ChatStoreError::Config(format!("storage.key is invalid: {}", e))
        })?;

        if self.chat.greeting.trim().is_empty() {
            return Err(
                ChatStoreError::Config("chat.greeting cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}
