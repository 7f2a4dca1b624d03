//! Error types for the Sonora installer.
//!
//! Every filesystem failure carries the path it happened on and the action
//! that was being attempted, so the CLI can report something actionable.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for install operations.
#[derive(Debug, Error)]
pub enum InstallError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    // Install state errors
    #[error("Sonora is not installed (no manifest at {path})")]
    NotInstalled { path: PathBuf },

    #[error("Content mismatch for {path}: expected {expected}, got {actual}")]
    Verification {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

/// Result type alias for install operations.
pub type Result<T> = std::result::Result<T, InstallError>;

impl From<std::io::Error> for InstallError {
    fn from(err: std::io::Error) -> Self {
        InstallError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for InstallError {
    fn from(err: serde_json::Error) -> Self {
        InstallError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl InstallError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        InstallError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create an IO error describing the action that failed.
    pub fn io_action(action: &str, path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        InstallError::Io {
            message: action.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Whether this error means the user gave us something missing or broken,
    /// as opposed to an environmental failure.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            InstallError::FileNotFound(_)
                | InstallError::NotInstalled { .. }
                | InstallError::Verification { .. }
                | InstallError::Validation { .. }
        )
    }
}
