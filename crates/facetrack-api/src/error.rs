//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use facetrack_storage::{Artifact, StorageError};
use serde::Serialize;
use thiserror::Error;

use crate::config::is_production_env;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("{0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Storage(e) => match e {
                StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                StorageError::InvalidScreenshot(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Client-facing message, stable across environments.
    fn message(&self) -> String {
        match self {
            ApiError::Storage(e) => match e {
                StorageError::NotFound(_) => "File not found".to_string(),
                StorageError::InvalidScreenshot(_) => "Invalid data".to_string(),
                StorageError::WriteFailed { artifact, .. } => match artifact {
                    Artifact::Record => "Failed to save face data".to_string(),
                    Artifact::Screenshot => "Failed to save screenshot".to_string(),
                },
                StorageError::DeleteFailed { artifact, .. } => match artifact {
                    Artifact::Record => "Failed to delete face data".to_string(),
                    Artifact::Screenshot => "Failed to delete screenshot".to_string(),
                },
                StorageError::ListFailed(_) => "Failed to read directory".to_string(),
                StorageError::Io(_) | StorageError::Json(_) => "Storage error".to_string(),
            },
            _ => self.to_string(),
        }
    }

    fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl ApiError {
    /// Response body. Internal error details are dropped in production.
    fn body(&self, production: bool) -> ErrorResponse {
        let detail = if self.is_internal() && !production {
            Some(self.to_string())
        } else {
            None
        };

        ErrorResponse {
            message: self.message(),
            detail,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let production = std::env::var("ENVIRONMENT")
            .map(|v| is_production_env(&v))
            .unwrap_or(false);
        (self.status_code(), Json(self.body(production))).into_response()
    }
}
