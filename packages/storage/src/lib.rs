// ABOUTME: Persistence layer for Taskforge task collections
// ABOUTME: Storage trait, error types, and the file/local/memory/API adapters

use async_trait::async_trait;
use std::path::PathBuf;
use taskforge_config::ConfigError;
use taskforge_core::Task;
use thiserror::Error;

pub mod api;
pub mod factory;
pub mod file;
pub mod local;
pub mod memory;

pub use api::ApiStorage;
pub use factory::{StorageConfig, StorageFactory, StorageProvider};
pub use file::FileStorage;
pub use local::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, LocalStorage};
pub use memory::MemoryStorage;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        status: u16,
        url: String,
        message: String,
    },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Check if this is a network-related error
    pub fn is_network_error(&self) -> bool {
        matches!(self, StorageError::Network(_) | StorageError::Http { .. })
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<ConfigError> for StorageError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A single named task collection persisted as a whole.
///
/// `save` always replaces the stored collection. There is no partial update
/// and no concurrency token: concurrent saves race and the last write wins.
#[async_trait]
pub trait TaskStorage: Send + Sync {
    /// Load every stored task. A collection that was never written loads as empty.
    async fn load(&self) -> StorageResult<Vec<Task>>;

    /// Replace the stored collection
    async fn save(&self, tasks: &[Task]) -> StorageResult<()>;

    /// Remove the stored collection
    async fn clear(&self) -> StorageResult<()>;

    /// Short adapter name for logs
    fn name(&self) -> &'static str;
}
