//! Landmark model seam.
//!
//! The model itself is third-party. The detector only needs its per-face
//! output and a way to pull frames, both expressed as traits here.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use facetrack_models::{BoundingBox, Landmark};
use serde::{Deserialize, Serialize};

use crate::error::DetectorResult;

/// One video frame as seen by the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Monotonic frame number from the source
    pub seq: u64,
    pub width: u32,
    pub height: u32,
    /// Encoded PNG still of this frame, if the source can capture one
    pub png: Option<Vec<u8>>,
}

impl Frame {
    pub fn new(seq: u64, width: u32, height: u32) -> Self {
        Self {
            seq,
            width,
            height,
            png: None,
        }
    }

    pub fn with_png(mut self, png: Vec<u8>) -> Self {
        self.png = Some(png);
        self
    }

    /// The still as a `data:image/png;base64,` URL.
    pub fn screenshot_data_url(&self) -> Option<String> {
        self.png
            .as_ref()
            .map(|png| format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }
}

/// Per-face output of the landmark model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceEstimate {
    /// Mesh points in frame coordinates
    #[serde(default)]
    pub mesh: Option<Vec<Landmark>>,
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub face_in_view_confidence: Option<f64>,
}

/// A landmark model that estimates faces in a frame.
#[async_trait]
pub trait FaceEstimator: Send + Sync {
    async fn estimate_faces(&self, frame: &Frame) -> DetectorResult<Vec<FaceEstimate>>;
}

/// A source of frames (camera, recording).
#[async_trait]
pub trait FrameSource: Send {
    /// Next frame, or `None` once the source is exhausted.
    async fn next_frame(&mut self) -> DetectorResult<Option<Frame>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_data_url() {
        let frame = Frame::new(0, 640, 480).with_png(b"hello".to_vec());
        assert_eq!(
            frame.screenshot_data_url().as_deref(),
            Some("data:image/png;base64,aGVsbG8=")
        );
        assert_eq!(Frame::new(1, 640, 480).screenshot_data_url(), None);
    }

    #[test]
    fn test_face_estimate_from_model_json() {
        let estimate: FaceEstimate = serde_json::from_str(
            r#"{
                "faceInViewConfidence": 0.99,
                "boundingBox": { "topLeft": [10, 20], "bottomRight": [110, 140] },
                "mesh": [[1, 2, 3], [4, 5, 6]]
            }"#,
        )
        .unwrap();

        assert_eq!(estimate.face_in_view_confidence, Some(0.99));
        assert_eq!(estimate.mesh.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            estimate.bounding_box,
            Some(BoundingBox::new([10.0, 20.0], [110.0, 140.0]))
        );
    }
}
