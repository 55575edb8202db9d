//! Detector error types.

use thiserror::Error;

/// Result type for detector operations.
pub type DetectorResult<T> = Result<T, DetectorError>;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Estimator error: {0}")]
    Estimator(String),

    #[error("Frame source error: {0}")]
    FrameSource(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DetectorError {
    pub fn estimator(msg: impl Into<String>) -> Self {
        Self::Estimator(msg.into())
    }

    pub fn frame_source(msg: impl Into<String>) -> Self {
        Self::FrameSource(msg.into())
    }
}
