// ABOUTME: Storage configuration and adapter construction
// ABOUTME: Selects a task storage backend from explicit settings or the environment

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use taskforge_config::{
    default_data_file, env_string, env_u64, taskforge_dir, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_STORAGE, DEFAULT_STORAGE_KEY, TASKFORGE_API_TOKEN, TASKFORGE_API_URL,
    TASKFORGE_DATA_FILE, TASKFORGE_HTTP_TIMEOUT_SECS, TASKFORGE_STORAGE, TASKFORGE_STORAGE_KEY,
};
use tracing::{debug, info};

use crate::{
    ApiStorage, FileKeyValueStore, FileStorage, LocalStorage, MemoryStorage, StorageError,
    StorageResult, TaskStorage,
};

/// File name of the on-disk key-value store used by the local provider
const LOCAL_STORE_FILE_NAME: &str = "local-storage.json";

#[derive(Debug, Clone, PartialEq)]
pub enum StorageProvider {
    File {
        path: PathBuf,
    },
    Local {
        store_path: PathBuf,
        key: String,
    },
    Memory,
    Api {
        base_url: String,
        token: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub http_timeout_secs: u64,
}

impl StorageConfig {
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }

    /// Build the configuration from `TASKFORGE_*` environment variables
    pub fn from_env() -> StorageResult<Self> {
        let kind = env_string(TASKFORGE_STORAGE).unwrap_or_else(|| DEFAULT_STORAGE.to_string());
        let http_timeout_secs = env_u64(TASKFORGE_HTTP_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS)?;

        let provider = match kind.to_lowercase().as_str() {
            "file" => {
                let path = match env_string(TASKFORGE_DATA_FILE) {
                    Some(path) => PathBuf::from(path),
                    None => default_data_file()?,
                };
                StorageProvider::File { path }
            }
            "local" => StorageProvider::Local {
                store_path: taskforge_dir()?.join(LOCAL_STORE_FILE_NAME),
                key: env_string(TASKFORGE_STORAGE_KEY)
                    .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            },
            "memory" => StorageProvider::Memory,
            "api" => {
                let base_url = env_string(TASKFORGE_API_URL).ok_or_else(|| {
                    StorageError::Configuration(format!(
                        "{} is required for api storage",
                        TASKFORGE_API_URL
                    ))
                })?;
                StorageProvider::Api {
                    base_url,
                    token: env_string(TASKFORGE_API_TOKEN),
                }
            }
            other => {
                return Err(StorageError::Configuration(format!(
                    "Unsupported storage provider: {}",
                    other
                )))
            }
        };

        Ok(Self {
            provider,
            http_timeout_secs,
        })
    }
}

/// Factory for creating storage instances
pub struct StorageFactory;

impl StorageFactory {
    pub fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn TaskStorage>> {
        debug!("Creating storage with provider: {:?}", config.provider);

        let storage: Arc<dyn TaskStorage> = match &config.provider {
            StorageProvider::File { path } => {
                info!("Using file storage at: {:?}", path);
                Arc::new(FileStorage::new(path.clone()))
            }
            StorageProvider::Local { store_path, key } => {
                info!("Using local storage key '{}' in {:?}", key, store_path);
                let store = Arc::new(FileKeyValueStore::new(store_path.clone()));
                Arc::new(LocalStorage::new(store, key.clone()))
            }
            StorageProvider::Memory => {
                info!("Using in-memory storage");
                Arc::new(MemoryStorage::new())
            }
            StorageProvider::Api { base_url, token } => {
                info!("Using API storage at: {}", base_url);
                Arc::new(ApiStorage::with_timeout(
                    base_url,
                    token.clone(),
                    Duration::from_secs(config.http_timeout_secs),
                )?)
            }
        };

        Ok(storage)
    }

    /// Create a storage instance from the environment
    pub fn from_env() -> StorageResult<Arc<dyn TaskStorage>> {
        Self::create_storage(&StorageConfig::from_env()?)
    }
}
