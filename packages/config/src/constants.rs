// ABOUTME: Environment variable name constants and defaults
// ABOUTME: Centralized definitions of all environment variable names used across Taskforge

// Storage selection
pub const TASKFORGE_STORAGE: &str = "TASKFORGE_STORAGE";
pub const TASKFORGE_HOME: &str = "TASKFORGE_HOME";

// File storage
pub const TASKFORGE_DATA_FILE: &str = "TASKFORGE_DATA_FILE";

// Key-value (local) storage
pub const TASKFORGE_STORAGE_KEY: &str = "TASKFORGE_STORAGE_KEY";

// Remote API storage
pub const TASKFORGE_API_URL: &str = "TASKFORGE_API_URL";
pub const TASKFORGE_API_TOKEN: &str = "TASKFORGE_API_TOKEN";
pub const TASKFORGE_HTTP_TIMEOUT_SECS: &str = "TASKFORGE_HTTP_TIMEOUT_SECS";

// Defaults
pub const DEFAULT_STORAGE: &str = "file";
pub const DEFAULT_STORAGE_KEY: &str = "tasks";
pub const DEFAULT_DATA_FILE_NAME: &str = "tasks.json";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
