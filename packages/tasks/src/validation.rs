// ABOUTME: Task validation rules
// ABOUTME: Field, record, and batch checks producing errors and warnings instead of failures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use taskforge_core::{can_transition, Task, TaskPriority, TaskStatus};

use crate::graph::{duplicate_ids, format_cycle, DependencyGraph};

/// A single problem found while validating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors invalidate the record; warnings are informational only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(field, message));
    }

    pub fn warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue::new(field, message));
    }

    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|issue| issue.field == field)
    }

    /// All error messages joined for display
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchValidationResult {
    /// Per-task results keyed by task id, in list order
    pub results: Vec<(String, ValidationResult)>,
    /// Problems spanning several tasks (duplicate ids, dependency cycles)
    pub global_errors: Vec<ValidationIssue>,
    pub cycles: Vec<Vec<String>>,
}

impl BatchValidationResult {
    pub fn is_valid(&self) -> bool {
        self.global_errors.is_empty() && self.results.iter().all(|(_, result)| result.is_valid())
    }

    pub fn error_count(&self) -> usize {
        self.global_errors.len()
            + self
                .results
                .iter()
                .map(|(_, result)| result.errors.len())
                .sum::<usize>()
    }

    pub fn warning_count(&self) -> usize {
        self.results
            .iter()
            .map(|(_, result)| result.warnings.len())
            .sum()
    }

    pub fn invalid_task_ids(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|(_, result)| !result.is_valid())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn result_for(&self, id: &str) -> Option<&ValidationResult> {
        self.results
            .iter()
            .find(|(task_id, _)| task_id == id)
            .map(|(_, result)| result)
    }
}

/// Limits and policies applied by [`TaskValidator`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    pub title_max_length: usize,
    pub description_max_length: usize,
    pub details_max_length: usize,
    pub complexity_min: u8,
    pub complexity_max: u8,
    /// Complexity at or above which a task without subtasks draws a warning
    pub complexity_warning_threshold: u8,
    pub require_description_for_high_priority: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            title_max_length: 200,
            description_max_length: 2_000,
            details_max_length: 10_000,
            complexity_min: 1,
            complexity_max: 10,
            complexity_warning_threshold: 8,
            require_description_for_high_priority: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskValidator {
    rules: ValidationRules,
}

impl TaskValidator {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Validate one task against the list it belongs to.
    ///
    /// `context` supplies the ids that dependencies may reference and their
    /// statuses; it may or may not contain `task` itself.
    pub fn validate_task(&self, task: &Task, context: &[Task]) -> ValidationResult {
        self.check(task, &index_by_id(context))
    }

    /// Validate every task plus the checks that span the whole list
    pub fn validate_tasks(&self, tasks: &[Task]) -> BatchValidationResult {
        let index = index_by_id(tasks);
        let results = tasks
            .iter()
            .map(|task| (task.id.clone(), self.check(task, &index)))
            .collect();

        let mut global_errors = Vec::new();
        for id in duplicate_ids(tasks.iter().map(|task| task.id.as_str())) {
            global_errors.push(ValidationIssue::new(
                "id",
                format!("Duplicate task id: {}", id),
            ));
        }

        let cycles = DependencyGraph::new(tasks).detect_cycles();
        for cycle in &cycles {
            global_errors.push(ValidationIssue::new(
                "dependencies",
                format!("Circular dependency: {}", format_cycle(cycle)),
            ));
        }

        BatchValidationResult {
            results,
            global_errors,
            cycles,
        }
    }

    fn check(&self, task: &Task, index: &HashMap<&str, &Task>) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.check_fields(task, &mut result);
        self.check_dependencies(task, index, &mut result);
        self.check_subtasks(task, &mut result);
        self.check_policies(task, index, &mut result);

        result
    }

    fn check_fields(&self, task: &Task, result: &mut ValidationResult) {
        let rules = &self.rules;

        if task.id.trim().is_empty() {
            result.error("id", "Task id is required");
        }

        if task.title.trim().is_empty() {
            result.error("title", "Title is required");
        } else if task.title.chars().count() > rules.title_max_length {
            result.error(
                "title",
                format!("Title must be at most {} characters", rules.title_max_length),
            );
        }

        check_length(
            result,
            "description",
            task.description.as_deref(),
            rules.description_max_length,
        );
        check_length(result, "details", task.details.as_deref(), rules.details_max_length);
        check_length(
            result,
            "testStrategy",
            task.test_strategy.as_deref(),
            rules.details_max_length,
        );

        if let Some(score) = task.complexity_score {
            if score < rules.complexity_min || score > rules.complexity_max {
                result.error(
                    "complexityScore",
                    format!(
                        "Complexity score must be between {} and {}",
                        rules.complexity_min, rules.complexity_max
                    ),
                );
            }
        }
    }

    fn check_dependencies(
        &self,
        task: &Task,
        index: &HashMap<&str, &Task>,
        result: &mut ValidationResult,
    ) {
        for dep in &task.dependencies {
            if dep == &task.id {
                result.error("dependencies", "Task cannot depend on itself");
            } else if !index.contains_key(dep.as_str()) {
                result.error(
                    "dependencies",
                    format!("Missing dependency: task '{}' does not exist", dep),
                );
            }
        }

        for dep in duplicate_ids(task.dependencies.iter().map(String::as_str)) {
            result.error("dependencies", format!("Duplicate dependency: {}", dep));
        }
    }

    fn check_subtasks(&self, task: &Task, result: &mut ValidationResult) {
        let mut ids: Vec<u32> = Vec::with_capacity(task.subtasks.len());
        for subtask in &task.subtasks {
            if ids.contains(&subtask.id) {
                result.error("subtasks", format!("Duplicate subtask id: {}", subtask.id));
            } else {
                ids.push(subtask.id);
            }
        }

        for subtask in &task.subtasks {
            let field = format!("subtasks[{}]", subtask.id);

            if subtask.title.trim().is_empty() {
                result.error(format!("{}.title", field), "Subtask title is required");
            } else if subtask.title.chars().count() > self.rules.title_max_length {
                result.error(
                    format!("{}.title", field),
                    format!(
                        "Subtask title must be at most {} characters",
                        self.rules.title_max_length
                    ),
                );
            }

            for dep in &subtask.dependencies {
                if *dep == subtask.id {
                    result.error(
                        format!("{}.dependencies", field),
                        "Subtask cannot depend on itself",
                    );
                } else if !ids.contains(dep) {
                    result.error(
                        format!("{}.dependencies", field),
                        format!("Missing dependency: subtask {} does not exist", dep),
                    );
                }
            }
        }
    }

    fn check_policies(
        &self,
        task: &Task,
        index: &HashMap<&str, &Task>,
        result: &mut ValidationResult,
    ) {
        if self.rules.require_description_for_high_priority
            && task.priority == TaskPriority::High
            && !task.has_description()
        {
            result.error(
                "description",
                "Description is required for high priority tasks",
            );
        }

        if task.status == TaskStatus::Done {
            let incomplete = task.incomplete_subtasks().count();
            if incomplete > 0 {
                result.warning(
                    "subtasks",
                    format!("Task is done but {} subtask(s) are incomplete", incomplete),
                );
            }
        }

        if task.status == TaskStatus::InProgress {
            let pending: Vec<&str> = task
                .dependencies
                .iter()
                .filter_map(|dep| index.get(dep.as_str()))
                .filter(|dep| dep.id != task.id && dep.status != TaskStatus::Done)
                .map(|dep| dep.id.as_str())
                .collect();
            if !pending.is_empty() {
                result.warning(
                    "dependencies",
                    format!(
                        "Task is in progress but depends on unfinished tasks: {}",
                        pending.join(", ")
                    ),
                );
            }
        }

        if let Some(score) = task.complexity_score {
            if score >= self.rules.complexity_warning_threshold && task.subtasks.is_empty() {
                result.warning(
                    "complexityScore",
                    "High complexity task has no subtasks; consider breaking it down",
                );
            }
        }
    }
}

/// First task per id; later duplicates are reported by batch validation
fn index_by_id(tasks: &[Task]) -> HashMap<&str, &Task> {
    let mut index = HashMap::with_capacity(tasks.len());
    for task in tasks {
        index.entry(task.id.as_str()).or_insert(task);
    }
    index
}

fn check_length(result: &mut ValidationResult, field: &str, value: Option<&str>, max: usize) {
    if let Some(value) = value {
        if value.chars().count() > max {
            result.error(field, format!("Must be at most {} characters", max));
        }
    }
}

/// Validate one task with the default rules
pub fn validate_task(task: &Task, context: &[Task]) -> ValidationResult {
    TaskValidator::default().validate_task(task, context)
}

/// Validate a whole list with the default rules
pub fn validate_tasks(tasks: &[Task]) -> BatchValidationResult {
    TaskValidator::default().validate_tasks(tasks)
}

pub fn validate_status_transition(
    from: TaskStatus,
    to: TaskStatus,
) -> Result<(), ValidationIssue> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(ValidationIssue::new(
            "status",
            format!("Cannot change status from {} to {}", from, to),
        ))
    }
}

/// Check a raw status string against the known statuses
pub fn validate_status_value(value: &str) -> Result<TaskStatus, ValidationIssue> {
    TaskStatus::parse(value).ok_or_else(|| {
        let allowed: Vec<&str> = TaskStatus::ALL.iter().map(TaskStatus::as_str).collect();
        ValidationIssue::new(
            "status",
            format!("Invalid status '{}'. Must be one of: {}", value, allowed.join(", ")),
        )
    })
}

/// Check a raw priority string against the known priorities
pub fn validate_priority_value(value: &str) -> Result<TaskPriority, ValidationIssue> {
    TaskPriority::parse(value).ok_or_else(|| {
        let allowed: Vec<&str> = TaskPriority::ALL.iter().map(TaskPriority::as_str).collect();
        ValidationIssue::new(
            "priority",
            format!(
                "Invalid priority '{}'. Must be one of: {}",
                value,
                allowed.join(", ")
            ),
        )
    })
}
