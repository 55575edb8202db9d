//! Face detection client.
//!
//! This crate provides:
//! - Geometric heuristics over landmark model output (position, size, head pose)
//! - A send policy that only fires when the detected face count changes
//! - A polling detection session driving a frame source and an estimator
//! - An HTTP uploader for the face data API
//! - Replay of recorded model output, for running without a live model

pub mod config;
pub mod error;
pub mod estimator;
pub mod heuristics;
pub mod policy;
pub mod replay;
pub mod session;
pub mod uploader;

pub use config::DetectorConfig;
pub use error::{DetectorError, DetectorResult};
pub use estimator::{FaceEstimate, FaceEstimator, Frame, FrameSource};
pub use heuristics::{classify_position, classify_size, describe_face, estimate_head_pose};
pub use policy::SendPolicy;
pub use replay::{RecordedFrame, Replay, ReplayEstimator, ReplaySource};
pub use session::{DetectionSession, DetectionState, SendOutcome, TickReport};
pub use uploader::{ApiUploader, Uploader};
