// ABOUTME: Error types for task list operations
// ABOUTME: Validation rejections, lookups, transitions, and wrapped storage failures

use taskforge_core::TaskStatus;
use taskforge_storage::StorageError;
use thiserror::Error;

use crate::validation::ValidationResult;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Validation failed: {}", .0.summary())]
    Validation(ValidationResult),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Subtask {subtask_id} not found in task {task_id}")]
    SubtaskNotFound { task_id: String, subtask_id: u32 },

    #[error("No subtask ids left in task {0}")]
    SubtaskIdsExhausted(String),

    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl TaskError {
    /// Validation details when the operation was rejected by validation
    pub fn validation(&self) -> Option<&ValidationResult> {
        match self {
            TaskError::Validation(result) => Some(result),
            _ => None,
        }
    }
}

pub type TaskResult<T> = Result<T, TaskError>;
