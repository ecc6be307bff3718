// ABOUTME: In-memory task storage
// ABOUTME: Process-local collection, mostly useful for tests and ephemeral sessions

use async_trait::async_trait;
use taskforge_core::Task;
use tokio::sync::RwLock;

use crate::{StorageResult, TaskStorage};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that starts out holding `tasks`
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
        }
    }
}

#[async_trait]
impl TaskStorage for MemoryStorage {
    async fn load(&self) -> StorageResult<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn save(&self, tasks: &[Task]) -> StorageResult<()> {
        *self.tasks.write().await = tasks.to_vec();
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        self.tasks.write().await.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
