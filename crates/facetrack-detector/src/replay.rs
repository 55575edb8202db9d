//! Replay of recorded landmark model output.
//!
//! A recording is a JSON array of frames:
//!
//! ```json
//! [
//!   { "width": 640, "height": 480, "screenshot": "frame-0.png",
//!     "faces": [{ "boundingBox": {...}, "mesh": [[x, y, z], ...], "faceInViewConfidence": 0.98 }] },
//!   { "width": 640, "height": 480, "error": "backend lost" }
//! ]
//! ```
//!
//! Screenshot paths are resolved against the recording's directory.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DetectorError, DetectorResult};
use crate::estimator::{FaceEstimate, FaceEstimator, Frame, FrameSource};

/// One recorded frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub width: u32,
    pub height: u32,
    /// PNG still for this frame
    #[serde(default)]
    pub screenshot: Option<PathBuf>,
    #[serde(default)]
    pub faces: Vec<FaceEstimate>,
    /// Replays as an estimator failure on this frame
    #[serde(default)]
    pub error: Option<String>,
}

/// A loaded recording.
#[derive(Debug, Clone)]
pub struct Replay {
    frames: Vec<RecordedFrame>,
    base_dir: PathBuf,
}

impl Replay {
    /// Parse a recording file.
    pub async fn load(path: impl AsRef<Path>) -> DetectorResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path).await?;
        let frames: Vec<RecordedFrame> = serde_json::from_slice(&raw)?;

        info!(path = %path.display(), frames = frames.len(), "Loaded recording");

        Ok(Self {
            frames,
            base_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        })
    }

    pub fn from_frames(frames: Vec<RecordedFrame>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            frames,
            base_dir: base_dir.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Split into a frame source and the estimator answering for it.
    pub fn into_parts(self) -> (ReplaySource, ReplayEstimator) {
        let mut results = HashMap::with_capacity(self.frames.len());
        let mut pending = VecDeque::with_capacity(self.frames.len());

        for (seq, frame) in self.frames.into_iter().enumerate() {
            let seq = seq as u64;
            let result = match frame.error {
                Some(message) => Err(message),
                None => Ok(frame.faces),
            };
            results.insert(seq, result);
            pending.push_back(PendingFrame {
                seq,
                width: frame.width,
                height: frame.height,
                screenshot: frame.screenshot.map(|p| self.base_dir.join(p)),
            });
        }

        (ReplaySource { pending }, ReplayEstimator { results })
    }
}

#[derive(Debug, Clone)]
struct PendingFrame {
    seq: u64,
    width: u32,
    height: u32,
    screenshot: Option<PathBuf>,
}

/// Yields recorded frames in order, reading each still on demand.
#[derive(Debug)]
pub struct ReplaySource {
    pending: VecDeque<PendingFrame>,
}

impl ReplaySource {
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

#[async_trait]
impl FrameSource for ReplaySource {
    async fn next_frame(&mut self) -> DetectorResult<Option<Frame>> {
        let Some(pending) = self.pending.pop_front() else {
            return Ok(None);
        };

        let mut frame = Frame::new(pending.seq, pending.width, pending.height);
        if let Some(path) = pending.screenshot {
            let png = tokio::fs::read(&path).await.map_err(|e| {
                DetectorError::frame_source(format!(
                    "failed to read screenshot {}: {}",
                    path.display(),
                    e
                ))
            })?;
            debug!(frame = pending.seq, bytes = png.len(), "Read screenshot");
            frame = frame.with_png(png);
        }

        Ok(Some(frame))
    }
}

/// Answers with the faces recorded for each frame.
#[derive(Debug)]
pub struct ReplayEstimator {
    results: HashMap<u64, Result<Vec<FaceEstimate>, String>>,
}

#[async_trait]
impl FaceEstimator for ReplayEstimator {
    async fn estimate_faces(&self, frame: &Frame) -> DetectorResult<Vec<FaceEstimate>> {
        match self.results.get(&frame.seq) {
            Some(Ok(faces)) => Ok(faces.clone()),
            Some(Err(message)) => Err(DetectorError::estimator(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RECORDING: &str = r#"[
        {
            "width": 640, "height": 480, "screenshot": "f0.png",
            "faces": [{
                "boundingBox": { "topLeft": [270, 190], "bottomRight": [370, 290] },
                "mesh": [[0, 0, 0], [1, 1, 1]],
                "faceInViewConfidence": 0.98
            }]
        },
        { "width": 640, "height": 480, "error": "backend lost" },
        { "width": 640, "height": 480 }
    ]"#;

    async fn write_recording(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("frames.json");
        tokio::fs::write(&path, RECORDING).await.unwrap();
        tokio::fs::write(dir.path().join("f0.png"), b"png-bytes").await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_and_replay() {
        let dir = TempDir::new().unwrap();
        let path = write_recording(&dir).await;

        let replay = Replay::load(&path).await.unwrap();
        assert_eq!(replay.len(), 3);

        let (mut source, estimator) = replay.into_parts();

        let first = source.next_frame().await.unwrap().unwrap();
        assert_eq!(first.seq, 0);
        assert_eq!(first.png.as_deref(), Some(&b"png-bytes"[..]));
        let faces = estimator.estimate_faces(&first).await.unwrap();
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].face_in_view_confidence, Some(0.98));

        let second = source.next_frame().await.unwrap().unwrap();
        assert!(second.png.is_none());
        let err = estimator.estimate_faces(&second).await.unwrap_err();
        assert!(matches!(err, DetectorError::Estimator(ref m) if m == "backend lost"));

        let third = source.next_frame().await.unwrap().unwrap();
        assert!(estimator.estimate_faces(&third).await.unwrap().is_empty());

        assert!(source.next_frame().await.unwrap().is_none());
        assert_eq!(source.remaining(), 0);
    }

    #[tokio::test]
    async fn test_missing_screenshot_file_is_a_source_error() {
        let frames = vec![RecordedFrame {
            width: 10,
            height: 10,
            screenshot: Some(PathBuf::from("nope.png")),
            faces: vec![],
            error: None,
        }];
        let dir = TempDir::new().unwrap();
        let (mut source, _) = Replay::from_frames(frames, dir.path()).into_parts();

        let err = source.next_frame().await.unwrap_err();
        assert!(matches!(err, DetectorError::FrameSource(_)));
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_recording() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frames.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        assert!(matches!(
            Replay::load(&path).await,
            Err(DetectorError::Json(_))
        ));
    }
}
