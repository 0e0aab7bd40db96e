// file: src/error.rs
// version: 1.0.0
// guid: 5865971b-6f91-4af7-96cd-546e97f6574b

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, BatchError>;

/// Error types for the SWE batch agent
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Process `{command}` failed (exit code {exit_code:?}): {stderr}")]
    ProcessError {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Logging error: {0}")]
    LoggingError(String),
}

impl BatchError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a new file not found error
    pub fn file_not_found(msg: impl Into<String>) -> Self {
        Self::FileNotFound(msg.into())
    }

    /// Create a process error for a command that never started
    pub fn spawn_failed(command: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ProcessError {
            command: command.into(),
            exit_code: None,
            stderr: format!("Failed to execute command: {}", reason),
        }
    }
}
