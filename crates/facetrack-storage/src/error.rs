//! Storage error types.

use std::fmt;

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Which half of a submission an operation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Record,
    Screenshot,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Record => write!(f, "face data"),
            Artifact::Screenshot => write!(f, "screenshot"),
        }
    }
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid screenshot: {0}")]
    InvalidScreenshot(String),

    #[error("Failed to save {artifact}: {source}")]
    WriteFailed {
        artifact: Artifact,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete {artifact}: {source}")]
    DeleteFailed {
        artifact: Artifact,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read directory: {0}")]
    ListFailed(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn invalid_screenshot(msg: impl Into<String>) -> Self {
        Self::InvalidScreenshot(msg.into())
    }

    pub fn write_failed(artifact: Artifact, source: std::io::Error) -> Self {
        Self::WriteFailed { artifact, source }
    }

    pub fn delete_failed(artifact: Artifact, source: std::io::Error) -> Self {
        Self::DeleteFailed { artifact, source }
    }
}
