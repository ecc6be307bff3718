// ABOUTME: Browser-localStorage style persistence for task collections
// ABOUTME: Tasks live as one JSON string under a single key of a string key-value store

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use taskforge_core::Task;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::{StorageError, StorageResult, TaskStorage};

/// String key-value store with localStorage semantics
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    async fn set_item(&self, key: &str, value: String) -> StorageResult<()>;
    async fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Process-local key-value store
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    items: RwLock<BTreeMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> StorageResult<()> {
        self.items.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items.write().await.remove(key);
        Ok(())
    }
}

/// Key-value store persisted as a single JSON object on disk.
///
/// Every write reads, modifies and rewrites the whole object. The internal
/// lock only serializes writers within this process.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(StorageError::io("read key-value store", &self.path, e)),
        }
    }

    async fn write_all(&self, items: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::io("create directory", parent, e))?;
            }
        }

        let content = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| StorageError::io("write key-value store", &self.path, e))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set_item(&self, key: &str, value: String) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read_all().await?;
        items.insert(key.to_string(), value);
        self.write_all(&items).await
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read_all().await?;
        if items.remove(key).is_some() {
            self.write_all(&items).await?;
        }
        Ok(())
    }
}

/// Task storage backed by one key of a [`KeyValueStore`]
#[derive(Clone)]
pub struct LocalStorage {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl LocalStorage {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Local storage over a fresh in-memory key-value store
    pub fn in_memory(key: impl Into<String>) -> Self {
        Self::new(Arc::new(InMemoryKeyValueStore::new()), key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl TaskStorage for LocalStorage {
    async fn load(&self) -> StorageResult<Vec<Task>> {
        match self.store.get_item(&self.key).await? {
            Some(raw) => {
                let tasks: Vec<Task> = serde_json::from_str(&raw)?;
                debug!("Loaded {} tasks from key '{}'", tasks.len(), self.key);
                Ok(tasks)
            }
            None => {
                debug!("No tasks stored under key '{}'", self.key);
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, tasks: &[Task]) -> StorageResult<()> {
        let raw = serde_json::to_string(tasks)?;
        self.store.set_item(&self.key, raw).await?;
        debug!("Stored {} tasks under key '{}'", tasks.len(), self.key);
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        self.store.remove_item(&self.key).await
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
