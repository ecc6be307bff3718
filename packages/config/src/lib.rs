// ABOUTME: Configuration and environment variable management
// ABOUTME: Resolves the data directory and typed values from the process environment

pub mod constants;

use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

pub use constants::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Unable to determine home directory")]
    NoHomeDirectory,
}

/// Get the Taskforge data directory.
///
/// `TASKFORGE_HOME` wins, then `$HOME/.taskforge`, then the platform home
/// directory reported by `dirs`.
pub fn taskforge_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = env_string(TASKFORGE_HOME) {
        return Ok(PathBuf::from(dir));
    }

    // HOME first so tests can point it at a temp dir
    if let Ok(home) = env::var("HOME") {
        return Ok(PathBuf::from(home).join(".taskforge"));
    }

    dirs::home_dir()
        .map(|home| home.join(".taskforge"))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Default location of the task collection file (~/.taskforge/tasks.json)
pub fn default_data_file() -> Result<PathBuf, ConfigError> {
    Ok(taskforge_dir()?.join(DEFAULT_DATA_FILE_NAME))
}

/// Read a non-empty, trimmed environment variable
pub fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read an unsigned integer, falling back to `default` when unset.
///
/// A value that is set but does not parse is an error rather than a silent
/// fallback.
pub fn env_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env_string(key) {
        Some(raw) => raw.parse::<u64>().map_err(|_| {
            warn!("Ignoring invalid {} value: {}", key, raw);
            ConfigError::InvalidValue { key, value: raw }
        }),
        None => Ok(default),
    }
}
