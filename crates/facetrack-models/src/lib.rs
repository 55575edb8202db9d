//! Shared data models for facetrack.
//!
//! This crate provides Serde-serializable types for:
//! - Face descriptions derived by the detector (position, size, head pose)
//! - Timestamp identifiers shared by a record and its screenshot
//! - Request/response bodies of the face data API

pub mod api;
pub mod face;
pub mod timestamp;

pub use api::{FaceDataSubmission, MessageResponse, ValidSubmission};
pub use face::{BoundingBox, FaceData, FaceSize, HeadPose, Landmark, Position};
pub use timestamp::{Timestamp, TimestampError};
