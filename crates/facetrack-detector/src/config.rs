//! Detector configuration.

use std::time::Duration;

use crate::error::{DetectorError, DetectorResult};

/// Detector configuration.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Base URL of the face data API
    pub api_url: String,
    /// Time between detection ticks
    pub interval: Duration,
    /// Whether the mesh overlay starts enabled
    pub show_mesh: bool,
    /// Per-request timeout for uploads
    pub request_timeout: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            interval: Duration::from_millis(100),
            show_mesh: true,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl DetectorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: std::env::var("FACETRACK_API_URL").unwrap_or(defaults.api_url),
            interval: std::env::var("FACETRACK_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.interval),
            show_mesh: defaults.show_mesh,
            request_timeout: std::env::var("FACETRACK_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// Reject settings the session cannot run with.
    pub fn validate(&self) -> DetectorResult<()> {
        if self.interval.is_zero() {
            return Err(DetectorError::Config("interval must be positive".to_string()));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(DetectorError::Config(format!(
                "api url must be http(s): {}",
                self.api_url
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.interval, Duration::from_millis(100));
        assert_eq!(config.api_url, "http://localhost:3000");
        assert!(config.show_mesh);
        tokio_test::assert_ok!(config.validate());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let zero = DetectorConfig {
            interval: Duration::ZERO,
            ..DetectorConfig::default()
        };
        assert!(matches!(zero.validate(), Err(DetectorError::Config(_))));

        let no_scheme = DetectorConfig {
            api_url: "localhost:3000".to_string(),
            ..DetectorConfig::default()
        };
        assert!(matches!(no_scheme.validate(), Err(DetectorError::Config(_))));
    }
}
