//! API configuration.

use std::path::PathBuf;

use facetrack_storage::InitMode;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second for `/api` routes
    pub rate_limit_rps: u32,
    /// Max request body size (screenshots travel inline as base64)
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Directory holding records and screenshots
    pub data_dir: PathBuf,
    /// Delete every stored submission at startup
    pub wipe_on_start: bool,
    /// Expose `/metrics`
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 50,
            max_body_size: 50 * 1024 * 1024, // 50MB
            environment: "development".to_string(),
            data_dir: PathBuf::from("face_data"),
            wipe_on_start: false,
            metrics_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.rate_limit_rps),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            data_dir: std::env::var("FACE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            wipe_on_start: env_flag("FACE_DATA_WIPE_ON_START").unwrap_or(defaults.wipe_on_start),
            metrics_enabled: env_flag("METRICS_ENABLED").unwrap_or(defaults.metrics_enabled),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        is_production_env(&self.environment)
    }

    /// How the storage directory is prepared at startup.
    pub fn init_mode(&self) -> InitMode {
        if self.wipe_on_start {
            InitMode::Wipe
        } else {
            InitMode::Preserve
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| v == "true" || v == "1")
}

/// Whether an `ENVIRONMENT` value names production, ignoring case.
pub fn is_production_env(environment: &str) -> bool {
    environment.trim().eq_ignore_ascii_case("production")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_preserve_data() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.init_mode(), InitMode::Preserve);
        assert!(!config.is_production());
    }

    #[test]
    fn test_wipe_is_opt_in() {
        let config = ApiConfig {
            wipe_on_start: true,
            ..ApiConfig::default()
        };
        assert_eq!(config.init_mode(), InitMode::Wipe);
    }

    #[test]
    fn test_production_match_ignores_case() {
        assert!(is_production_env("production"));
        assert!(is_production_env("Production"));
        assert!(is_production_env("PRODUCTION"));
        assert!(!is_production_env("development"));

        let config = ApiConfig {
            environment: "Production".to_string(),
            ..ApiConfig::default()
        };
        assert!(config.is_production());
    }
}
