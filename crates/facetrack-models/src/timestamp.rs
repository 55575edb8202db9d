//! Timestamp identifiers.
//!
//! A record and its screenshot share one identifier: the epoch-millisecond
//! time the record was created, or whatever the caller supplied on update.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Longest accepted identifier (u64::MAX has 20 digits).
pub const MAX_TIMESTAMP_LEN: usize = 20;

/// Identifier linking a record to its screenshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Identifier for "now", in epoch milliseconds.
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis().to_string())
    }

    /// Parse a caller-supplied identifier.
    ///
    /// Only ASCII digits are accepted so the value is always safe to splice
    /// into a file name.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        if s.is_empty() {
            return Err(TimestampError::Empty);
        }
        if s.len() > MAX_TIMESTAMP_LEN {
            return Err(TimestampError::TooLong(s.len()));
        }
        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(TimestampError::InvalidCharacters(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the JSON record, e.g. `face_data_1700000000000.json`.
    pub fn record_file_name(&self) -> String {
        format!("face_data_{}.json", self.0)
    }

    /// File name of the screenshot, e.g. `screenshot_1700000000000.png`.
    pub fn screenshot_file_name(&self) -> String {
        format!("screenshot_{}.png", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Errors from parsing a timestamp identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("Timestamp is empty")]
    Empty,
    #[error("Timestamp is too long ({0} characters)")]
    TooLong(usize),
    #[error("Timestamp must contain only digits: {0}")]
    InvalidCharacters(String),
}
