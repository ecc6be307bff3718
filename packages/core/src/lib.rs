// ABOUTME: Core types, configuration tables, and utilities for Taskforge
// ABOUTME: Foundational package providing the task model shared across all Taskforge packages

pub mod config;
pub mod types;
pub mod utils;

// Re-export main types
pub use types::{
    Subtask, SubtaskCreateInput, Task, TaskCreateInput, TaskPriority, TaskStatus,
    TaskUpdateInput,
};

// Re-export configuration tables
pub use config::{
    can_transition, compare_priority, compare_status, priority_color, priority_config,
    priority_icon, status_color, status_config, status_icon, PriorityConfig, StatusConfig,
    DEFAULT_COLOR, DEFAULT_ICON,
};

// Re-export utilities
pub use utils::{generate_task_id, generate_unique_task_id, truncate};
