//! Request and response bodies of the face data API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::face::FaceData;

/// Body of a create or update request.
///
/// Both fields are optional at the type level so that a missing field is a
/// validation failure (400) rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceDataSubmission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_data: Option<Value>,
    /// Screenshot as a `data:image/png;base64,...` URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<Value>,
}

/// A submission that passed presence checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    pub face_data: Value,
    pub screenshot: String,
}

impl FaceDataSubmission {
    /// Build the body the detector posts.
    pub fn new(face_data: &FaceData, screenshot: impl Into<String>) -> Self {
        Self {
            // FaceData only holds plain numbers and strings, so this cannot fail
            face_data: serde_json::to_value(face_data).ok(),
            screenshot: Some(Value::String(screenshot.into())),
        }
    }

    /// Validate the request.
    ///
    /// `faceData` must be present and truthy; `screenshot` must be a
    /// non-empty string.
    pub fn validate(self) -> Result<ValidSubmission, String> {
        let face_data = match self.face_data {
            Some(v) if is_truthy(&v) => v,
            _ => return Err("faceData is required".to_string()),
        };

        let screenshot = match self.screenshot {
            Some(Value::String(s)) if !s.is_empty() => s,
            _ => return Err("screenshot is required".to_string()),
        };

        Ok(ValidSubmission {
            face_data,
            screenshot,
        })
    }
}

/// JSON truthiness: null, false, 0, NaN and "" are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Generic `{ message }` response, with the affected timestamp when there is one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(message: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Some(timestamp.into()),
        }
    }
}
