// ABOUTME: JSON file storage for task collections
// ABOUTME: Rewrites the whole file on every save; a missing file loads as an empty list

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use taskforge_core::Task;
use tokio::fs;
use tracing::debug;

use crate::{StorageError, StorageResult, TaskStorage};

/// Stores tasks as a pretty-printed JSON array at a fixed path
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TaskStorage for FileStorage {
    async fn load(&self) -> StorageResult<Vec<Task>> {
        debug!("Reading tasks from: {:?}", self.path);

        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Task file {:?} does not exist yet", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::io("read task file", &self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let tasks: Vec<Task> = serde_json::from_str(&content)?;
        debug!("Successfully loaded {} tasks", tasks.len());
        Ok(tasks)
    }

    async fn save(&self, tasks: &[Task]) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::io("create directory", parent, e))?;
            }
        }

        let json_content = serde_json::to_string_pretty(tasks)?;
        fs::write(&self.path, json_content)
            .await
            .map_err(|e| StorageError::io("write task file", &self.path, e))?;

        debug!("Successfully wrote {} tasks to {:?}", tasks.len(), self.path);
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Removed task file {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io("remove task file", &self.path, e)),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.json"));

        assert!(storage.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("tasks.json");
        let storage = FileStorage::new(&path);

        storage.save(&[Task::new("a", "First")]).await.unwrap();

        assert!(path.exists());
        assert_eq!(storage.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{ not json").await.unwrap();

        let err = FileStorage::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }

    #[tokio::test]
    async fn test_read_error_mentions_path() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a file
        let err = FileStorage::new(dir.path()).load().await.unwrap_err();

        assert!(matches!(err, StorageError::Io { .. }));
        assert!(err.to_string().contains(&dir.path().display().to_string()));
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("tasks.json"));

        storage.save(&[Task::new("a", "First")]).await.unwrap();
        storage.clear().await.unwrap();
        storage.clear().await.unwrap();

        assert!(storage.load().await.unwrap().is_empty());
    }
}
