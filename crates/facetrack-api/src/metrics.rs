//! Prometheus metrics for the API server.

use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "facetrack_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "facetrack_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "facetrack_http_requests_in_flight";

    // Storage metrics
    pub const SUBMISSIONS_SAVED_TOTAL: &str = "facetrack_submissions_saved_total";
    pub const SUBMISSIONS_DELETED_TOTAL: &str = "facetrack_submissions_deleted_total";
    pub const STORAGE_FAILURES_TOTAL: &str = "facetrack_storage_failures_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "facetrack_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a record + screenshot pair written (create or update).
pub fn record_submission_saved() {
    counter!(names::SUBMISSIONS_SAVED_TOTAL).increment(1);
}

/// Record a record + screenshot pair deleted.
pub fn record_submission_deleted() {
    counter!(names::SUBMISSIONS_DELETED_TOTAL).increment(1);
}

/// Record a failed storage operation.
pub fn record_storage_failure(operation: &str) {
    let labels = [("operation", operation.to_string())];
    counter!(names::STORAGE_FAILURES_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Sanitize path for metrics labels (collapse timestamps).
fn sanitize_path(path: &str) -> String {
    static FACE_DATA_ID: OnceLock<regex_lite::Regex> = OnceLock::new();
    let re = FACE_DATA_ID.get_or_init(|| {
        regex_lite::Regex::new(r"/face-data/[^/]+").expect("valid face data path pattern")
    });
    re.replace_all(path, "/face-data/:timestamp").to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/face-data/1718000000123"),
            "/api/face-data/:timestamp"
        );
        assert_eq!(sanitize_path("/api/face-data"), "/api/face-data");
        assert_eq!(sanitize_path("/health"), "/health");
    }
}
