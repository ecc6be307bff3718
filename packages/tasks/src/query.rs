// ABOUTME: Client-side queries over task lists
// ABOUTME: Filtering, stable sorting, summary statistics, and next-task selection

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use taskforge_core::{compare_priority, compare_status, priority_config, Task, TaskPriority, TaskStatus};

use crate::graph::unmet_dependencies;

/// Filter for querying tasks. Unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    pub statuses: Option<Vec<TaskStatus>>,
    pub priorities: Option<Vec<TaskPriority>>,
    /// Case-insensitive match against title, description, and details
    pub search: Option<String>,
    pub has_subtasks: Option<bool>,
}

impl TaskFilter {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            statuses: Some(vec![status]),
            ..Self::default()
        }
    }

    pub fn priority(priority: TaskPriority) -> Self {
        Self {
            priorities: Some(vec![priority]),
            ..Self::default()
        }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&task.status) {
                return false;
            }
        }

        if let Some(priorities) = &self.priorities {
            if !priorities.contains(&task.priority) {
                return false;
            }
        }

        if let Some(has_subtasks) = self.has_subtasks {
            if task.subtasks.is_empty() == has_subtasks {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => {
                let query = query.to_lowercase();
                [
                    Some(task.title.as_str()),
                    task.description.as_deref(),
                    task.details.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|text| text.to_lowercase().contains(&query))
            }
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskSortKey {
    Priority,
    Status,
    CreatedAt,
    UpdatedAt,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl TaskSortKey {
    /// Ascending comparison: lowest weight, oldest, or alphabetically first
    fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            // The config comparators order by descending weight
            TaskSortKey::Priority => compare_priority(b.priority, a.priority),
            TaskSortKey::Status => compare_status(b.status, a.status),
            TaskSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            TaskSortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            TaskSortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
    }
}

pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

/// Stable sort: tasks that compare equal keep their relative order
pub fn sort_tasks<'a, I>(tasks: I, key: TaskSortKey, order: SortOrder) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut sorted: Vec<&Task> = tasks.into_iter().collect();
    sorted.sort_by(|a, b| {
        let ordering = key.compare(a, b);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
    sorted
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub by_status: HashMap<TaskStatus, usize>,
    pub by_priority: HashMap<TaskPriority, usize>,
    pub subtasks_total: usize,
    pub subtasks_done: usize,
    /// Done tasks as a percentage of all tasks, 0 for an empty list
    pub completion_percentage: f64,
}

impl TaskStats {
    pub fn count(&self, status: TaskStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn count_priority(&self, priority: TaskPriority) -> usize {
        self.by_priority.get(&priority).copied().unwrap_or(0)
    }
}

pub fn task_stats(tasks: &[Task]) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..TaskStats::default()
    };

    for task in tasks {
        *stats.by_status.entry(task.status).or_insert(0) += 1;
        *stats.by_priority.entry(task.priority).or_insert(0) += 1;
        stats.subtasks_total += task.subtasks.len();
        stats.subtasks_done += task
            .subtasks
            .iter()
            .filter(|subtask| subtask.status == TaskStatus::Done)
            .count();
    }

    if stats.total > 0 {
        stats.completion_percentage =
            stats.count(TaskStatus::Done) as f64 / stats.total as f64 * 100.0;
    }

    stats
}

/// Highest-priority pending or in-progress task whose dependencies are all done.
/// Ties go to the task that comes first in the list.
pub fn next_task(tasks: &[Task]) -> Option<&Task> {
    tasks
        .iter()
        .filter(|task| matches!(task.status, TaskStatus::Pending | TaskStatus::InProgress))
        .filter(|task| unmet_dependencies(task, tasks).is_empty())
        .fold(None, |best: Option<&Task>, task| match best {
            Some(current)
                if priority_config(current.priority).weight
                    >= priority_config(task.priority).weight =>
            {
                Some(current)
            }
            _ => Some(task),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;
    use taskforge_core::Subtask;

    fn ids<'a>(tasks: &[&'a Task]) -> Vec<&'a str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    fn sample() -> Vec<Task> {
        vec![
            Task::new("1", "Write parser").with_priority(TaskPriority::Low),
            Task::new("2", "Fix login bug")
                .with_priority(TaskPriority::High)
                .with_status(TaskStatus::InProgress)
                .with_description("Users cannot log in with SSO"),
            Task::new("3", "Update docs")
                .with_status(TaskStatus::Done)
                .with_subtasks(vec![Subtask::new(1, "README")]),
        ]
    }

    #[test]
    fn test_sort_by_priority_descending() {
        let tasks = sample();
        let sorted = sort_tasks(&tasks, TaskSortKey::Priority, SortOrder::Descending);

        // low, high, medium -> high, medium, low
        assert_eq!(ids(&sorted), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_priority_sort_is_stable() {
        let tasks = vec![
            Task::new("a", "A").with_priority(TaskPriority::Medium),
            Task::new("b", "B").with_priority(TaskPriority::High),
            Task::new("c", "C").with_priority(TaskPriority::Medium),
            Task::new("d", "D").with_priority(TaskPriority::High),
        ];

        let descending = sort_tasks(&tasks, TaskSortKey::Priority, SortOrder::Descending);
        assert_eq!(ids(&descending), vec!["b", "d", "a", "c"]);

        let ascending = sort_tasks(&tasks, TaskSortKey::Priority, SortOrder::Ascending);
        assert_eq!(ids(&ascending), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_sort_by_title_and_dates() {
        let mut tasks = sample();
        let base = Utc::now();
        tasks[0].created_at = base;
        tasks[1].created_at = base - Duration::hours(2);
        tasks[2].created_at = base - Duration::hours(1);

        let by_title = sort_tasks(&tasks, TaskSortKey::Title, SortOrder::Ascending);
        assert_eq!(ids(&by_title), vec!["2", "3", "1"]);

        let oldest_first = sort_tasks(&tasks, TaskSortKey::CreatedAt, SortOrder::Ascending);
        assert_eq!(ids(&oldest_first), vec!["2", "3", "1"]);

        let by_status = sort_tasks(&tasks, TaskSortKey::Status, SortOrder::Descending);
        assert_eq!(ids(&by_status), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_filter() {
        let tasks = sample();

        let done = filter_tasks(&tasks, &TaskFilter::status(TaskStatus::Done));
        assert_eq!(ids(&done), vec!["3"]);

        let sso = filter_tasks(&tasks, &TaskFilter::search("sso"));
        assert_eq!(ids(&sso), vec!["2"]);

        let with_subtasks = TaskFilter {
            has_subtasks: Some(true),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&filter_tasks(&tasks, &with_subtasks)), vec!["3"]);

        let combined = TaskFilter {
            statuses: Some(vec![TaskStatus::Pending, TaskStatus::InProgress]),
            priorities: Some(vec![TaskPriority::Low]),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&filter_tasks(&tasks, &combined)), vec!["1"]);

        assert_eq!(filter_tasks(&tasks, &TaskFilter::search("  ")).len(), 3);
    }

    #[test]
    fn test_stats() {
        let stats = task_stats(&sample());

        assert_eq!(stats.total, 3);
        assert_eq!(stats.count(TaskStatus::Done), 1);
        assert_eq!(stats.count(TaskStatus::Review), 0);
        assert_eq!(stats.count_priority(TaskPriority::High), 1);
        assert_eq!(stats.subtasks_total, 1);
        assert_eq!(stats.subtasks_done, 0);
        assert!((stats.completion_percentage - 100.0 / 3.0).abs() < f64::EPSILON * 100.0);
    }

    #[test]
    fn test_stats_empty() {
        let stats = task_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_percentage, 0.0);
    }

    #[test]
    fn test_next_task_skips_blocked_and_prefers_priority() {
        let tasks = vec![
            Task::new("a", "Low first").with_priority(TaskPriority::Low),
            Task::new("b", "Blocked high")
                .with_priority(TaskPriority::High)
                .with_dependencies(["c"]),
            Task::new("c", "Medium").with_priority(TaskPriority::Medium),
            Task::new("d", "Another medium").with_priority(TaskPriority::Medium),
        ];

        assert_eq!(next_task(&tasks).map(|t| t.id.as_str()), Some("c"));
    }

    #[test]
    fn test_next_task_none_when_all_closed() {
        let tasks = vec![
            Task::new("a", "Done").with_status(TaskStatus::Done),
            Task::new("b", "Cancelled").with_status(TaskStatus::Cancelled),
        ];
        assert!(next_task(&tasks).is_none());
    }
}
