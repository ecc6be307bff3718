// ABOUTME: Task validation, dependency analysis, and task list management
// ABOUTME: Pure checks over task slices plus a storage-backed in-memory task list

pub mod error;
pub mod graph;
pub mod manager;
pub mod query;
pub mod validation;

pub use error::{TaskError, TaskResult};
pub use graph::{format_cycle, unmet_dependencies, DependencyGraph};
pub use manager::TaskManager;
pub use query::{
    filter_tasks, next_task, sort_tasks, task_stats, SortOrder, TaskFilter, TaskSortKey,
    TaskStats,
};
pub use validation::{
    validate_priority_value, validate_status_transition, validate_status_value, validate_task,
    validate_tasks, BatchValidationResult, TaskValidator, ValidationIssue, ValidationResult,
    ValidationRules,
};
