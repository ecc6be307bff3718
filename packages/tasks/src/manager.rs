// ABOUTME: Storage-backed in-memory task list
// ABOUTME: Create/update/remove operations that persist the whole list before committing it

use std::sync::Arc;
use taskforge_core::{
    can_transition, generate_unique_task_id, truncate, Subtask, SubtaskCreateInput, Task,
    TaskCreateInput, TaskStatus, TaskUpdateInput,
};
use taskforge_storage::TaskStorage;
use tracing::{debug, info, warn};

use crate::error::{TaskError, TaskResult};
use crate::graph::{format_cycle, DependencyGraph};
use crate::query::{
    filter_tasks, next_task, sort_tasks, task_stats, SortOrder, TaskFilter, TaskSortKey,
    TaskStats,
};
use crate::validation::{BatchValidationResult, TaskValidator, ValidationRules};

/// Holds the current task list and writes it back to storage on every change.
///
/// Every mutation builds the next list, saves it, and only then replaces the
/// in-memory list, so a failed save leaves the manager unchanged.
pub struct TaskManager {
    storage: Arc<dyn TaskStorage>,
    validator: TaskValidator,
    tasks: Vec<Task>,
}

impl TaskManager {
    pub fn new(storage: Arc<dyn TaskStorage>) -> Self {
        Self::with_rules(storage, ValidationRules::default())
    }

    pub fn with_rules(storage: Arc<dyn TaskStorage>, rules: ValidationRules) -> Self {
        Self {
            storage,
            validator: TaskValidator::new(rules),
            tasks: Vec::new(),
        }
    }

    /// Create a manager and load the stored tasks
    pub async fn open(storage: Arc<dyn TaskStorage>) -> TaskResult<Self> {
        let mut manager = Self::new(storage);
        manager.load().await?;
        Ok(manager)
    }

    /// Replace the in-memory list with the stored collection
    pub async fn load(&mut self) -> TaskResult<&[Task]> {
        let tasks = self.storage.load().await?;
        debug!(
            "Loaded {} tasks from {} storage",
            tasks.len(),
            self.storage.name()
        );
        self.tasks = tasks;
        Ok(&self.tasks)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub async fn create_task(&mut self, input: TaskCreateInput) -> TaskResult<Task> {
        let id = generate_unique_task_id(|candidate| self.get(candidate).is_some());

        let mut task = Task::new(id, input.title);
        task.description = non_empty(input.description);
        task.status = input.status.unwrap_or_default();
        task.priority = input.priority.unwrap_or_default();
        task.details = non_empty(input.details);
        task.test_strategy = non_empty(input.test_strategy);
        task.dependencies = input.dependencies.unwrap_or_default();
        task.complexity_score = input.complexity_score;
        task.subtasks = input
            .subtasks
            .unwrap_or_default()
            .into_iter()
            .zip(1..)
            .map(|(subtask, id)| build_subtask(id, subtask))
            .collect();

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.validate_against(&task, &next, None)?;
        self.commit(next).await?;

        info!("Created task {} ({})", task.id, truncate(&task.title, 60));
        Ok(task)
    }

    pub async fn update_task(&mut self, id: &str, input: TaskUpdateInput) -> TaskResult<Task> {
        let position = self.position(id)?;
        let mut task = self.tasks[position].clone();

        if let Some(status) = input.status {
            check_transition(task.status, status)?;
            task.status = status;
        }
        if let Some(title) = input.title {
            task.title = title;
        }
        if let Some(description) = input.description {
            task.description = non_empty(Some(description));
        }
        if let Some(priority) = input.priority {
            task.priority = priority;
        }
        if let Some(details) = input.details {
            task.details = non_empty(Some(details));
        }
        if let Some(test_strategy) = input.test_strategy {
            task.test_strategy = non_empty(Some(test_strategy));
        }
        if let Some(dependencies) = input.dependencies {
            task.dependencies = dependencies;
        }
        if let Some(score) = input.complexity_score {
            task.complexity_score = Some(score);
        }
        task.touch();

        self.replace(position, task).await
    }

    /// Move a task to `status`, enforcing the status transition table
    pub async fn set_status(&mut self, id: &str, status: TaskStatus) -> TaskResult<Task> {
        let position = self.position(id)?;
        let mut task = self.tasks[position].clone();

        check_transition(task.status, status)?;
        task.status = status;
        task.touch();

        self.replace(position, task).await
    }

    /// Remove one task. Other tasks, including ones that depended on it, are untouched.
    pub async fn remove_task(&mut self, id: &str) -> TaskResult<Task> {
        let position = self.position(id)?;

        let mut next = self.tasks.clone();
        let removed = next.remove(position);
        self.commit(next).await?;

        info!("Removed task {}", removed.id);
        Ok(removed)
    }

    pub async fn add_subtask(
        &mut self,
        task_id: &str,
        input: SubtaskCreateInput,
    ) -> TaskResult<Subtask> {
        let position = self.position(task_id)?;
        let mut task = self.tasks[position].clone();

        let subtask_id = task
            .next_subtask_id()
            .ok_or_else(|| TaskError::SubtaskIdsExhausted(task_id.to_string()))?;
        let subtask = build_subtask(subtask_id, input);
        task.subtasks.push(subtask.clone());
        task.touch();

        self.replace(position, task).await?;
        Ok(subtask)
    }

    pub async fn set_subtask_status(
        &mut self,
        task_id: &str,
        subtask_id: u32,
        status: TaskStatus,
    ) -> TaskResult<Subtask> {
        let position = self.position(task_id)?;
        let mut task = self.tasks[position].clone();

        let subtask = task
            .subtask_mut(subtask_id)
            .ok_or_else(|| TaskError::SubtaskNotFound {
                task_id: task_id.to_string(),
                subtask_id,
            })?;
        subtask.status = status;
        let updated = subtask.clone();
        task.touch();

        self.replace(position, task).await?;
        Ok(updated)
    }

    pub async fn remove_subtask(&mut self, task_id: &str, subtask_id: u32) -> TaskResult<Subtask> {
        let position = self.position(task_id)?;
        let mut task = self.tasks[position].clone();

        let index = task
            .subtasks
            .iter()
            .position(|subtask| subtask.id == subtask_id)
            .ok_or_else(|| TaskError::SubtaskNotFound {
                task_id: task_id.to_string(),
                subtask_id,
            })?;
        let removed = task.subtasks.remove(index);
        // Drop sibling references to the removed subtask
        for sibling in &mut task.subtasks {
            sibling.dependencies.retain(|dep| *dep != subtask_id);
        }
        task.touch();

        self.replace(position, task).await?;
        Ok(removed)
    }

    /// Clear stored tasks and the in-memory list
    pub async fn clear(&mut self) -> TaskResult<()> {
        self.storage.clear().await?;
        self.tasks.clear();
        info!("Cleared all tasks from {} storage", self.storage.name());
        Ok(())
    }

    pub fn filter(&self, filter: &TaskFilter) -> Vec<&Task> {
        filter_tasks(&self.tasks, filter)
    }

    pub fn sorted(&self, key: TaskSortKey, order: SortOrder) -> Vec<&Task> {
        sort_tasks(&self.tasks, key, order)
    }

    pub fn stats(&self) -> TaskStats {
        task_stats(&self.tasks)
    }

    pub fn next_task(&self) -> Option<&Task> {
        next_task(&self.tasks)
    }

    pub fn validate(&self) -> BatchValidationResult {
        self.validator.validate_tasks(&self.tasks)
    }

    fn position(&self, id: &str) -> TaskResult<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }

    /// Reject `task` when the change introduces a validation error.
    ///
    /// Dependencies on missing tasks that `previous` already carried are left
    /// alone, so tasks stay editable after one of their dependencies is removed.
    /// Dependency loops are checked whenever the dependency list changes.
    fn validate_against(
        &self,
        task: &Task,
        tasks: &[Task],
        previous: Option<&Task>,
    ) -> TaskResult<()> {
        let mut result = match previous {
            Some(previous) => {
                let mut checked = task.clone();
                checked.dependencies.retain(|dep| {
                    !previous.dependencies.contains(dep) || tasks.iter().any(|t| &t.id == dep)
                });
                self.validator.validate_task(&checked, tasks)
            }
            None => self.validator.validate_task(task, tasks),
        };

        let dependencies_changed =
            previous.map_or(true, |previous| previous.dependencies != task.dependencies);
        if dependencies_changed {
            // Self-dependencies are already reported by the field checks
            if let Some(cycle) = DependencyGraph::new(tasks)
                .cycle_through(&task.id)
                .filter(|cycle| cycle.len() > 1)
            {
                result.error(
                    "dependencies",
                    format!("Circular dependency: {}", format_cycle(&cycle)),
                );
            }
        }

        for warning in &result.warnings {
            debug!("Task {} warning: {}", task.id, warning);
        }
        if result.is_valid() {
            Ok(())
        } else {
            warn!("Rejected task {}: {}", task.id, result.summary());
            Err(TaskError::Validation(result))
        }
    }

    async fn replace(&mut self, position: usize, task: Task) -> TaskResult<Task> {
        let mut next = self.tasks.clone();
        next[position] = task.clone();
        self.validate_against(&task, &next, Some(&self.tasks[position]))?;
        self.commit(next).await?;

        debug!("Updated task {}", task.id);
        Ok(task)
    }

    async fn commit(&mut self, next: Vec<Task>) -> TaskResult<()> {
        if let Err(e) = self.storage.save(&next).await {
            warn!(
                "Failed to save tasks to {} storage: {}",
                self.storage.name(),
                e
            );
            return Err(e.into());
        }
        self.tasks = next;
        Ok(())
    }
}

fn check_transition(from: TaskStatus, to: TaskStatus) -> TaskResult<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(TaskError::InvalidTransition { from, to })
    }
}

fn build_subtask(id: u32, input: SubtaskCreateInput) -> Subtask {
    Subtask {
        id,
        title: input.title,
        description: non_empty(input.description),
        status: input.status.unwrap_or_default(),
        dependencies: input.dependencies.unwrap_or_default(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskforge_core::TaskPriority;
    use taskforge_storage::MemoryStorage;

    fn input(title: &str) -> TaskCreateInput {
        TaskCreateInput {
            title: title.to_string(),
            ..TaskCreateInput::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids_and_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = TaskManager::new(storage.clone());

        for i in 0..25 {
            manager.create_task(input(&format!("Task {}", i))).await.unwrap();
        }

        let mut ids: Vec<&str> = manager.tasks().iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 25);
        assert_eq!(storage.load().await.unwrap().len(), 25);
    }

    #[tokio::test]
    async fn test_create_numbers_subtasks() {
        let mut manager = TaskManager::new(Arc::new(MemoryStorage::new()));
        let task = manager
            .create_task(TaskCreateInput {
                subtasks: Some(vec![
                    SubtaskCreateInput {
                        title: "One".to_string(),
                        ..SubtaskCreateInput::default()
                    },
                    SubtaskCreateInput {
                        title: "Two".to_string(),
                        dependencies: Some(vec![1]),
                        ..SubtaskCreateInput::default()
                    },
                ]),
                ..input("Parent")
            })
            .await
            .unwrap();

        let ids: Vec<u32> = task.subtasks.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(task.subtasks[1].dependencies, vec![1]);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let mut manager = TaskManager::new(Arc::new(MemoryStorage::new()));
        let err = manager
            .create_task(TaskCreateInput {
                priority: Some(TaskPriority::High),
                description: Some("  ".to_string()),
                ..input("Urgent")
            })
            .await
            .unwrap_err();

        let result = err.validation().unwrap();
        assert!(result.has_error_for("description"));
        assert!(manager.is_empty());
    }

    #[tokio::test]
    async fn test_update_clears_text_with_empty_string() {
        let mut manager = TaskManager::new(Arc::new(MemoryStorage::new()));
        let task = manager
            .create_task(TaskCreateInput {
                details: Some("Old details".to_string()),
                ..input("Edit me")
            })
            .await
            .unwrap();

        let updated = manager
            .update_task(
                &task.id,
                TaskUpdateInput {
                    title: Some("Edited".to_string()),
                    details: Some(String::new()),
                    ..TaskUpdateInput::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Edited");
        assert_eq!(updated.details, None);
        assert!(updated.updated_at >= task.updated_at);
        assert_eq!(updated.created_at, task.created_at);
    }

    #[tokio::test]
    async fn test_remove_subtask_drops_sibling_references() {
        let mut manager = TaskManager::new(Arc::new(MemoryStorage::new()));
        let task = manager.create_task(input("Parent")).await.unwrap();
        manager
            .add_subtask(&task.id, SubtaskCreateInput {
                title: "First".to_string(),
                ..SubtaskCreateInput::default()
            })
            .await
            .unwrap();
        let second = manager
            .add_subtask(&task.id, SubtaskCreateInput {
                title: "Second".to_string(),
                dependencies: Some(vec![1]),
                ..SubtaskCreateInput::default()
            })
            .await
            .unwrap();
        assert_eq!(second.id, 2);

        manager.remove_subtask(&task.id, 1).await.unwrap();

        let parent = manager.get(&task.id).unwrap();
        assert_eq!(parent.subtasks.len(), 1);
        assert!(parent.subtasks[0].dependencies.is_empty());
    }

    #[tokio::test]
    async fn test_add_subtask_when_ids_are_exhausted() {
        let parent = Task::new("p", "Parent").with_subtasks(vec![Subtask::new(u32::MAX, "Last")]);
        let storage = Arc::new(MemoryStorage::with_tasks(vec![parent.clone()]));
        let mut manager = TaskManager::open(storage).await.unwrap();

        let err = manager
            .add_subtask("p", SubtaskCreateInput {
                title: "One more".to_string(),
                ..SubtaskCreateInput::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TaskError::SubtaskIdsExhausted(id) if id == "p"));
        assert_eq!(manager.get("p"), Some(&parent));
    }

    #[tokio::test]
    async fn test_missing_subtask() {
        let mut manager = TaskManager::new(Arc::new(MemoryStorage::new()));
        let task = manager.create_task(input("Parent")).await.unwrap();

        let err = manager
            .set_subtask_status(&task.id, 7, TaskStatus::Done)
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::SubtaskNotFound { subtask_id: 7, .. }));
    }
}
