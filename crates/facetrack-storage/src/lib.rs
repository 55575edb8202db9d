//! File-backed storage for face data.
//!
//! This crate provides:
//! - A flat directory store keyed by timestamp (`FaceDataStore`)
//! - Explicit directory initialization, optionally wiping old submissions
//! - Sequenced record + screenshot writes via temp file and rename
//! - Data URL decoding for screenshots

pub mod data_url;
pub mod error;
pub mod store;

pub use data_url::decode_data_url;
pub use error::{Artifact, StorageError, StorageResult};
pub use store::{FaceDataStore, InitMode, InitReport};
