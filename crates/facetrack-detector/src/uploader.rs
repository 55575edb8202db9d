//! HTTP client for the face data API.

use std::time::Duration;

use async_trait::async_trait;
use facetrack_models::{FaceData, FaceDataSubmission, MessageResponse};
use reqwest::Client;
use tracing::{debug, error};

use crate::error::{DetectorError, DetectorResult};

/// Where submissions go.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Send one face description with its screenshot data URL.
    async fn upload(&self, face_data: &FaceData, screenshot: String)
        -> DetectorResult<MessageResponse>;
}

/// Posts submissions to `<base_url>/api/face-data`.
#[derive(Debug, Clone)]
pub struct ApiUploader {
    client: Client,
    endpoint: String,
}

impl ApiUploader {
    pub fn new(base_url: &str, timeout: Duration) -> DetectorResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/face-data", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Uploader for ApiUploader {
    async fn upload(
        &self,
        face_data: &FaceData,
        screenshot: String,
    ) -> DetectorResult<MessageResponse> {
        let body = FaceDataSubmission::new(face_data, screenshot);

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<MessageResponse>()
                .await
                .map(|r| r.message)
                .unwrap_or_else(|_| status.to_string());
            error!(status = status.as_u16(), "Failed to send data: {}", message);
            return Err(DetectorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let message = response.json::<MessageResponse>().await?;
        debug!(timestamp = ?message.timestamp, "Data sent successfully");
        Ok(message)
    }
}
