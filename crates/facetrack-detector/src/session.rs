//! Polling detection session.
//!
//! Every tick pulls a frame, asks the estimator for faces, refreshes the
//! detection state and, when the send policy fires, uploads the first face's
//! description together with a still of the frame.

use std::future::Future;
use std::time::{Duration, Instant};

use facetrack_models::FaceData;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::DetectorResult;
use crate::estimator::{FaceEstimator, Frame, FrameSource};
use crate::heuristics::describe_face;
use crate::policy::SendPolicy;
use crate::uploader::Uploader;

/// What the overlay would show after the latest tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectionState {
    pub face_detected: bool,
    pub face_count: usize,
    /// Description of the first face, if it had a mesh and a box
    pub face_data: Option<FaceData>,
    /// Ticks per second measured between the last two ticks
    pub fps: u32,
    /// Whether the mesh overlay is drawn
    pub show_mesh: bool,
}

impl DetectionState {
    fn clear_detection(&mut self) {
        self.face_detected = false;
        self.face_count = 0;
        self.face_data = None;
    }
}

/// Result of the send step of a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The face count did not change (or dropped to zero)
    NotDue,
    /// Uploaded; carries the timestamp the API assigned
    Sent(Option<String>),
    /// Due, but the frame had no still to attach
    NoScreenshot,
    /// Due, but the upload failed
    Failed(String),
}

/// Summary of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub frame_seq: u64,
    pub face_count: usize,
    pub send: SendOutcome,
}

/// Detection loop over a frame source, an estimator and an uploader.
pub struct DetectionSession<S, E, U> {
    source: S,
    estimator: E,
    uploader: U,
    policy: SendPolicy,
    state: DetectionState,
    last_tick: Option<Instant>,
}

impl<S, E, U> DetectionSession<S, E, U>
where
    S: FrameSource,
    E: FaceEstimator,
    U: Uploader,
{
    pub fn new(source: S, estimator: E, uploader: U) -> Self {
        Self {
            source,
            estimator,
            uploader,
            policy: SendPolicy::new(),
            state: DetectionState {
                show_mesh: true,
                ..DetectionState::default()
            },
            last_tick: None,
        }
    }

    pub fn state(&self) -> &DetectionState {
        &self.state
    }

    pub fn set_show_mesh(&mut self, show: bool) {
        self.state.show_mesh = show;
    }

    /// Run one detection step.
    ///
    /// Returns `None` once the frame source is exhausted. Estimator and
    /// upload failures are absorbed into the state and the report.
    pub async fn tick(&mut self) -> DetectorResult<Option<TickReport>> {
        let Some(frame) = self.source.next_frame().await? else {
            return Ok(None);
        };

        self.update_fps();

        match self.estimator.estimate_faces(&frame).await {
            Ok(faces) => {
                self.state.face_detected = !faces.is_empty();
                self.state.face_count = faces.len();
                self.state.face_data = faces
                    .first()
                    .and_then(|face| describe_face(face, frame.width, frame.height));
            }
            Err(e) => {
                warn!(frame = frame.seq, "Error in face detection: {}", e);
                self.state.clear_detection();
            }
        }

        debug!(
            frame = frame.seq,
            faces = self.state.face_count,
            fps = self.state.fps,
            show_mesh = self.state.show_mesh,
            "Detection tick"
        );

        let send = self.maybe_send(&frame).await;

        Ok(Some(TickReport {
            frame_seq: frame.seq,
            face_count: self.state.face_count,
            send,
        }))
    }

    /// Tick on a fixed interval until the source runs out or `shutdown`
    /// resolves. Returns the number of ticks that produced a frame.
    pub async fn run(
        &mut self,
        period: Duration,
        shutdown: impl Future<Output = ()>,
    ) -> DetectorResult<u64> {
        let mut ticker = interval(period);
        // A slow estimator delays the next tick instead of stacking calls
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::pin!(shutdown);
        let mut ticks = 0u64;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Detection stopped by shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    match self.tick().await? {
                        Some(_) => ticks += 1,
                        None => {
                            info!("Frame source exhausted");
                            break;
                        }
                    }
                }
            }
        }

        Ok(ticks)
    }

    async fn maybe_send(&mut self, frame: &Frame) -> SendOutcome {
        let due = self
            .policy
            .observe(self.state.face_count, self.state.face_data.is_some());
        if !due {
            return SendOutcome::NotDue;
        }

        // `due` implies face data is present
        let Some(face_data) = self.state.face_data.as_ref() else {
            return SendOutcome::NotDue;
        };

        let Some(screenshot) = frame.screenshot_data_url() else {
            warn!(frame = frame.seq, "Face count changed but no screenshot was captured");
            return SendOutcome::NoScreenshot;
        };

        info!(
            frame = frame.seq,
            faces = self.state.face_count,
            position = %face_data.position,
            size = %face_data.size,
            "Face count changed, sending face data"
        );

        match self.uploader.upload(face_data, screenshot).await {
            Ok(response) => SendOutcome::Sent(response.timestamp),
            Err(e) => {
                warn!(frame = frame.seq, "Error sending data: {}", e);
                SendOutcome::Failed(e.to_string())
            }
        }
    }

    fn update_fps(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last_tick {
            let elapsed_ms = now.duration_since(last).as_secs_f64() * 1000.0;
            if elapsed_ms > 0.0 {
                self.state.fps = (1000.0 / elapsed_ms).round() as u32;
            }
        }
        self.last_tick = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use facetrack_models::{BoundingBox, Landmark, MessageResponse, Position};

    use crate::error::DetectorError;
    use crate::estimator::FaceEstimate;

    struct VecSource(VecDeque<Frame>);

    #[async_trait]
    impl FrameSource for VecSource {
        async fn next_frame(&mut self) -> DetectorResult<Option<Frame>> {
            Ok(self.0.pop_front())
        }
    }

    /// Returns scripted results in frame order; `None` entries fail.
    struct ScriptedEstimator(Mutex<VecDeque<Option<Vec<FaceEstimate>>>>);

    #[async_trait]
    impl FaceEstimator for ScriptedEstimator {
        async fn estimate_faces(&self, _frame: &Frame) -> DetectorResult<Vec<FaceEstimate>> {
            match self.0.lock().unwrap().pop_front().flatten() {
                Some(faces) => Ok(faces),
                None => Err(DetectorError::estimator("model not ready")),
            }
        }
    }

    #[derive(Clone, Default)]
    struct RecordingUploader {
        sent: Arc<Mutex<Vec<(FaceData, String)>>>,
        fail: bool,
    }

    #[async_trait]
    impl Uploader for RecordingUploader {
        async fn upload(
            &self,
            face_data: &FaceData,
            screenshot: String,
        ) -> DetectorResult<MessageResponse> {
            if self.fail {
                return Err(DetectorError::Api {
                    status: 500,
                    message: "Failed to save face data".to_string(),
                });
            }
            let mut sent = self.sent.lock().unwrap();
            sent.push((face_data.clone(), screenshot));
            Ok(MessageResponse::with_timestamp(
                "Data saved successfully",
                sent.len().to_string(),
            ))
        }
    }

    fn face(cx: f64) -> FaceEstimate {
        FaceEstimate {
            mesh: Some(vec![Landmark::new(0.0, 0.0, 0.0); 468]),
            bounding_box: Some(BoundingBox::new([cx - 50.0, 190.0], [cx + 50.0, 290.0])),
            face_in_view_confidence: Some(0.9),
        }
    }

    fn frames(n: u64) -> VecSource {
        VecSource(
            (0..n)
                .map(|seq| Frame::new(seq, 640, 480).with_png(vec![0x89, b'P', b'N', b'G']))
                .collect(),
        )
    }

    fn session(
        source: VecSource,
        script: Vec<Option<Vec<FaceEstimate>>>,
        uploader: RecordingUploader,
    ) -> DetectionSession<VecSource, ScriptedEstimator, RecordingUploader> {
        DetectionSession::new(
            source,
            ScriptedEstimator(Mutex::new(script.into())),
            uploader,
        )
    }

    #[tokio::test]
    async fn test_sends_only_when_count_changes() {
        let uploader = RecordingUploader::default();
        let mut session = session(
            frames(5),
            vec![
                Some(vec![]),
                Some(vec![face(320.0)]),
                Some(vec![face(100.0)]),
                Some(vec![face(320.0), face(500.0)]),
                Some(vec![face(320.0), face(500.0)]),
            ],
            uploader.clone(),
        );

        let mut outcomes = Vec::new();
        while let Some(report) = session.tick().await.unwrap() {
            outcomes.push(report.send);
        }

        assert_eq!(
            outcomes,
            vec![
                SendOutcome::NotDue,
                SendOutcome::Sent(Some("1".to_string())),
                SendOutcome::NotDue,
                SendOutcome::Sent(Some("2".to_string())),
                SendOutcome::NotDue,
            ]
        );

        let sent = uploader.sent.lock().unwrap();
        assert_eq!(sent[0].0.position, Position::Center);
        assert!(sent[0].1.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_describes_only_the_first_face() {
        let mut session = session(
            frames(1),
            vec![Some(vec![face(100.0), face(550.0)])],
            RecordingUploader::default(),
        );

        session.tick().await.unwrap();

        let state = session.state();
        assert!(state.face_detected);
        assert_eq!(state.face_count, 2);
        assert_eq!(state.face_data.as_ref().unwrap().position, Position::Left);
    }

    #[tokio::test]
    async fn test_estimator_error_clears_state() {
        let uploader = RecordingUploader::default();
        let mut session = session(
            frames(3),
            vec![Some(vec![face(320.0)]), None, Some(vec![face(320.0)])],
            uploader.clone(),
        );

        session.tick().await.unwrap();
        let report = session.tick().await.unwrap().unwrap();
        assert_eq!(report.face_count, 0);
        assert_eq!(session.state().face_data, None);
        assert!(!session.state().face_detected);

        // The error looked like a drop to zero, so the face coming back is a change
        let report = session.tick().await.unwrap().unwrap();
        assert!(matches!(report.send, SendOutcome::Sent(_)));
        assert_eq!(uploader.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_face_without_mesh_is_counted_but_not_sent() {
        let uploader = RecordingUploader::default();
        let mut session = session(
            frames(1),
            vec![Some(vec![FaceEstimate::default()])],
            uploader.clone(),
        );

        let report = session.tick().await.unwrap().unwrap();

        assert_eq!(report.face_count, 1);
        assert_eq!(report.send, SendOutcome::NotDue);
        assert!(uploader.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_screenshot_skips_upload() {
        let uploader = RecordingUploader::default();
        let source = VecSource(vec![Frame::new(0, 640, 480)].into());
        let mut session = session(source, vec![Some(vec![face(320.0)])], uploader.clone());

        let report = session.tick().await.unwrap().unwrap();

        assert_eq!(report.send, SendOutcome::NoScreenshot);
        assert!(uploader.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_failure_is_reported_not_fatal() {
        let uploader = RecordingUploader {
            fail: true,
            ..RecordingUploader::default()
        };
        let mut session = session(frames(2), vec![Some(vec![face(320.0)]), Some(vec![])], uploader);

        let report = session.tick().await.unwrap().unwrap();
        assert!(matches!(report.send, SendOutcome::Failed(_)));

        let report = session.tick().await.unwrap().unwrap();
        assert_eq!(report.send, SendOutcome::NotDue);
    }

    #[tokio::test]
    async fn test_run_stops_when_source_is_exhausted() {
        let uploader = RecordingUploader::default();
        let mut session = session(
            frames(3),
            vec![Some(vec![face(320.0)]), Some(vec![face(320.0)]), Some(vec![])],
            uploader.clone(),
        );
        session.set_show_mesh(false);

        let ticks = session
            .run(Duration::from_millis(1), std::future::pending())
            .await
            .unwrap();

        assert_eq!(ticks, 3);
        assert!(!session.state().show_mesh);
        assert_eq!(uploader.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let mut session = session(frames(1000), vec![], RecordingUploader::default());

        let ticks = session
            .run(Duration::from_secs(60), async {})
            .await
            .unwrap();

        assert!(ticks <= 1);
    }
}
