// ABOUTME: Shared utility functions for Taskforge
// ABOUTME: Task ID generation and text helpers

use nanoid::nanoid;

const ID_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

const ID_LENGTH: usize = 8;

/// Generate a random 8-character task ID
pub fn generate_task_id() -> String {
    nanoid!(ID_LENGTH, &ID_ALPHABET)
}

/// Generate a task ID that `is_taken` rejects for none of the existing tasks
pub fn generate_unique_task_id<F>(is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let id = generate_task_id();
        if !is_taken(&id) {
            return id;
        }
    }
}

/// Truncates a string to a maximum number of characters with ellipsis
pub fn truncate(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_generate_task_id() {
        let id1 = generate_task_id();
        let id2 = generate_task_id();

        assert_eq!(id1.len(), 8);
        assert_ne!(id1, id2);
        assert!(id1
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generate_unique_task_id_retries_on_collision() {
        let calls = Cell::new(0);
        let id = generate_unique_task_id(|_| {
            calls.set(calls.get() + 1);
            calls.get() < 3
        });

        assert_eq!(calls.get(), 3);
        assert_eq!(id.len(), 8);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long task title", 10), "a long ...");
        assert_eq!(truncate("ééééé", 4), "é...");
    }
}
