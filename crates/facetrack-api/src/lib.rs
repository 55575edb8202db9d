//! Axum HTTP API server for face data.
//!
//! This crate provides:
//! - CRUD endpoints over timestamp-keyed records and screenshots
//! - Health/readiness probes
//! - Request logging, request IDs, security headers and rate limiting
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
