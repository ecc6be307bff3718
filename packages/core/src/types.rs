// ABOUTME: Task type definitions
// ABOUTME: Structures for tasks, subtasks, dependencies, and create/update inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Review,
    Done,
    Deferred,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
        TaskStatus::Deferred,
        TaskStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
            TaskStatus::Deferred => "deferred",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a wire value. Unknown values yield `None` rather than an error.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    /// Done and cancelled tasks no longer need work
    pub fn is_closed(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Cancelled)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == value)
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A child unit of work. Ids are only unique within the parent task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    /// Sibling subtask ids
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<u32>,
}

impl Subtask {
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            status: TaskStatus::Pending,
            dependencies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,

    // Rich content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_strategy: Option<String>,

    // Relations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a pending, medium priority task stamped with the current time
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            details: None,
            test_strategy: None,
            dependencies: Vec::new(),
            complexity_score: None,
            subtasks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subtasks(mut self, subtasks: Vec<Subtask>) -> Self {
        self.subtasks = subtasks;
        self
    }

    pub fn subtask(&self, id: u32) -> Option<&Subtask> {
        self.subtasks.iter().find(|subtask| subtask.id == id)
    }

    pub fn subtask_mut(&mut self, id: u32) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|subtask| subtask.id == id)
    }

    /// Next free subtask id (max + 1, starting at 1), `None` once `u32::MAX` is taken
    pub fn next_subtask_id(&self) -> Option<u32> {
        match self.subtasks.iter().map(|subtask| subtask.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    pub fn incomplete_subtasks(&self) -> impl Iterator<Item = &Subtask> {
        self.subtasks
            .iter()
            .filter(|subtask| subtask.status != TaskStatus::Done)
    }

    pub fn has_description(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|description| !description.trim().is_empty())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskCreateInput {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub dependencies: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreateInput {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub details: Option<String>,
    pub test_strategy: Option<String>,
    pub dependencies: Option<Vec<String>>,
    pub complexity_score: Option<u8>,
    pub subtasks: Option<Vec<SubtaskCreateInput>>,
}

/// Partial update. Present fields replace the stored value; an empty string
/// clears an optional text field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub details: Option<String>,
    pub test_strategy: Option<String>,
    pub dependencies: Option<Vec<String>>,
    pub complexity_score: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        assert_eq!(TaskStatus::parse("in-progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("blocked"), None);
    }

    #[test]
    fn test_priority_parse_unknown() {
        assert_eq!(TaskPriority::parse("high"), Some(TaskPriority::High));
        assert_eq!(TaskPriority::parse("urgent"), None);
    }

    #[test]
    fn test_task_json_uses_camel_case_and_iso_dates() {
        let task = Task::new("t1", "Write docs").with_dependencies(["t0"]);
        let value = serde_json::to_value(&task).unwrap();

        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["dependencies"], serde_json::json!(["t0"]));
        // Empty collections and unset options are omitted
        assert!(value.get("subtasks").is_none());
        assert!(value.get("description").is_none());

        let created = value["createdAt"].as_str().unwrap();
        let parsed = DateTime::parse_from_rfc3339(created).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), task.created_at);
    }

    #[test]
    fn test_task_deserializes_minimal_record() {
        let json = r#"{
            "id": "abc",
            "title": "Minimal",
            "createdAt": "2024-01-02T03:04:05Z",
            "updatedAt": "2024-01-02T03:04:05Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.dependencies.is_empty());
        assert!(task.subtasks.is_empty());
        assert_eq!(task.created_at.to_rfc3339(), "2024-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_next_subtask_id() {
        let mut task = Task::new("t1", "Parent");
        assert_eq!(task.next_subtask_id(), Some(1));

        task.subtasks = vec![Subtask::new(1, "a"), Subtask::new(4, "b")];
        assert_eq!(task.next_subtask_id(), Some(5));

        task.subtasks.push(Subtask::new(u32::MAX, "last"));
        assert_eq!(task.next_subtask_id(), None);
    }

    #[test]
    fn test_incomplete_subtasks() {
        let mut done = Subtask::new(1, "done");
        done.status = TaskStatus::Done;
        let task = Task::new("t1", "Parent").with_subtasks(vec![done, Subtask::new(2, "open")]);

        let ids: Vec<u32> = task.incomplete_subtasks().map(|s| s.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_has_description_ignores_whitespace() {
        assert!(!Task::new("t1", "x").has_description());
        assert!(!Task::new("t1", "x").with_description("   ").has_description());
        assert!(Task::new("t1", "x").with_description("why").has_description());
    }
}
