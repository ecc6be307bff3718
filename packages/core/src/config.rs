// ABOUTME: Static display and workflow tables for task statuses and priorities
// ABOUTME: Labels, icons, colors, sort weights, and the status transition table

use crate::types::{TaskPriority, TaskStatus};
use std::cmp::Ordering;

/// Icon returned for values that have no table entry
pub const DEFAULT_ICON: &str = "circle";
/// Color returned for values that have no table entry
pub const DEFAULT_COLOR: &str = "#9CA3AF";

#[derive(Debug, PartialEq, Eq)]
pub struct StatusConfig {
    pub status: TaskStatus,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    /// Higher weights sort first (active work before closed work)
    pub weight: u8,
    /// Statuses this status may move to
    pub transitions: &'static [TaskStatus],
}

#[derive(Debug, PartialEq, Eq)]
pub struct PriorityConfig {
    pub priority: TaskPriority,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub weight: u8,
}

static PENDING: StatusConfig = StatusConfig {
    status: TaskStatus::Pending,
    label: "Pending",
    icon: "circle",
    color: "#9CA3AF",
    weight: 3,
    transitions: &[
        TaskStatus::InProgress,
        TaskStatus::Deferred,
        TaskStatus::Cancelled,
    ],
};

static IN_PROGRESS: StatusConfig = StatusConfig {
    status: TaskStatus::InProgress,
    label: "In Progress",
    icon: "circle-progress-50",
    color: "#3B82F6",
    weight: 5,
    transitions: &[
        TaskStatus::Pending,
        TaskStatus::Review,
        TaskStatus::Done,
        TaskStatus::Deferred,
        TaskStatus::Cancelled,
    ],
};

static REVIEW: StatusConfig = StatusConfig {
    status: TaskStatus::Review,
    label: "Review",
    icon: "eye",
    color: "#A855F7",
    weight: 4,
    transitions: &[
        TaskStatus::InProgress,
        TaskStatus::Done,
        TaskStatus::Cancelled,
    ],
};

static DONE: StatusConfig = StatusConfig {
    status: TaskStatus::Done,
    label: "Done",
    icon: "check-circle",
    color: "#22C55E",
    weight: 1,
    transitions: &[TaskStatus::InProgress, TaskStatus::Review],
};

static DEFERRED: StatusConfig = StatusConfig {
    status: TaskStatus::Deferred,
    label: "Deferred",
    icon: "clock",
    color: "#F59E0B",
    weight: 2,
    transitions: &[
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Cancelled,
    ],
};

static CANCELLED: StatusConfig = StatusConfig {
    status: TaskStatus::Cancelled,
    label: "Cancelled",
    icon: "x-mark-circle",
    color: "#EF4444",
    weight: 0,
    transitions: &[TaskStatus::Pending],
};

static LOW: PriorityConfig = PriorityConfig {
    priority: TaskPriority::Low,
    label: "Low",
    icon: "arrow-down",
    color: "#22C55E",
    weight: 1,
};

static MEDIUM: PriorityConfig = PriorityConfig {
    priority: TaskPriority::Medium,
    label: "Medium",
    icon: "minus",
    color: "#F59E0B",
    weight: 2,
};

static HIGH: PriorityConfig = PriorityConfig {
    priority: TaskPriority::High,
    label: "High",
    icon: "arrow-up",
    color: "#EF4444",
    weight: 3,
};

pub fn status_config(status: TaskStatus) -> &'static StatusConfig {
    match status {
        TaskStatus::Pending => &PENDING,
        TaskStatus::InProgress => &IN_PROGRESS,
        TaskStatus::Review => &REVIEW,
        TaskStatus::Done => &DONE,
        TaskStatus::Deferred => &DEFERRED,
        TaskStatus::Cancelled => &CANCELLED,
    }
}

pub fn priority_config(priority: TaskPriority) -> &'static PriorityConfig {
    match priority {
        TaskPriority::Low => &LOW,
        TaskPriority::Medium => &MEDIUM,
        TaskPriority::High => &HIGH,
    }
}

pub fn status_icon(value: &str) -> &'static str {
    TaskStatus::parse(value).map_or(DEFAULT_ICON, |status| status_config(status).icon)
}

pub fn status_color(value: &str) -> &'static str {
    TaskStatus::parse(value).map_or(DEFAULT_COLOR, |status| status_config(status).color)
}

pub fn priority_icon(value: &str) -> &'static str {
    TaskPriority::parse(value).map_or(DEFAULT_ICON, |priority| priority_config(priority).icon)
}

pub fn priority_color(value: &str) -> &'static str {
    TaskPriority::parse(value).map_or(DEFAULT_COLOR, |priority| priority_config(priority).color)
}

/// Whether `from` may move to `to`. Staying in the same status is always allowed.
pub fn can_transition(from: TaskStatus, to: TaskStatus) -> bool {
    from == to || status_config(from).transitions.contains(&to)
}

/// Comparator ordering higher priorities first
pub fn compare_priority(a: TaskPriority, b: TaskPriority) -> Ordering {
    priority_config(b)
        .weight
        .cmp(&priority_config(a).weight)
}

/// Comparator ordering higher status weights first
pub fn compare_status(a: TaskStatus, b: TaskStatus) -> Ordering {
    status_config(b).weight.cmp(&status_config(a).weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_every_status_has_matching_entry() {
        for status in TaskStatus::ALL {
            assert_eq!(status_config(status).status, status);
        }
        for priority in TaskPriority::ALL {
            assert_eq!(priority_config(priority).priority, priority);
        }
    }

    #[test]
    fn test_unknown_values_fall_back() {
        assert_eq!(status_icon("blocked"), DEFAULT_ICON);
        assert_eq!(status_color("blocked"), DEFAULT_COLOR);
        assert_eq!(priority_icon("urgent"), DEFAULT_ICON);
        assert_eq!(priority_color(""), DEFAULT_COLOR);
    }

    #[test]
    fn test_known_values_resolve() {
        assert_eq!(status_icon("done"), "check-circle");
        assert_eq!(priority_color("high"), "#EF4444");
    }

    #[rstest]
    #[case(TaskStatus::Pending, TaskStatus::InProgress, true)]
    #[case(TaskStatus::Pending, TaskStatus::Done, false)]
    #[case(TaskStatus::InProgress, TaskStatus::Done, true)]
    #[case(TaskStatus::Review, TaskStatus::Pending, false)]
    #[case(TaskStatus::Done, TaskStatus::Review, true)]
    #[case(TaskStatus::Done, TaskStatus::Cancelled, false)]
    #[case(TaskStatus::Cancelled, TaskStatus::Pending, true)]
    #[case(TaskStatus::Cancelled, TaskStatus::InProgress, false)]
    #[case(TaskStatus::Deferred, TaskStatus::Deferred, true)]
    fn test_transitions(#[case] from: TaskStatus, #[case] to: TaskStatus, #[case] allowed: bool) {
        assert_eq!(can_transition(from, to), allowed);
    }

    #[test]
    fn test_priority_sort_is_descending_and_stable() {
        let mut priorities = vec![
            (TaskPriority::Low, 0),
            (TaskPriority::High, 1),
            (TaskPriority::Medium, 2),
            (TaskPriority::High, 3),
        ];
        priorities.sort_by(|a, b| compare_priority(a.0, b.0));

        assert_eq!(
            priorities,
            vec![
                (TaskPriority::High, 1),
                (TaskPriority::High, 3),
                (TaskPriority::Medium, 2),
                (TaskPriority::Low, 0),
            ]
        );
    }

    #[test]
    fn test_active_statuses_sort_first() {
        assert_eq!(
            compare_status(TaskStatus::InProgress, TaskStatus::Done),
            Ordering::Less
        );
    }
}
