//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "facemark_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "facemark_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "facemark_http_requests_in_flight";

    // Pipeline metrics
    pub const IMAGES_PROCESSED_TOTAL: &str = "facemark_images_processed_total";
    pub const FACES_DETECTED_TOTAL: &str = "facemark_faces_detected_total";
    pub const DETECTION_DURATION_SECONDS: &str = "facemark_detection_duration_seconds";
    pub const UPLOADS_REJECTED_TOTAL: &str = "facemark_uploads_rejected_total";
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

/// Record one processed image and its face count.
pub fn record_image_processed(face_count: usize, duration_secs: f64) {
    counter!(names::IMAGES_PROCESSED_TOTAL).increment(1);
    counter!(names::FACES_DETECTED_TOTAL).increment(face_count as u64);
    histogram!(names::DETECTION_DURATION_SECONDS).record(duration_secs);
}

/// Record a rejected upload.
pub fn record_upload_rejected(reason: &str) {
    let labels = [("reason", reason.to_string())];
    counter!(names::UPLOADS_REJECTED_TOTAL, &labels).increment(1);
}

/// Sanitize path for metrics labels (collapse generated filenames).
fn sanitize_path(path: &str) -> String {
    let path = regex_lite::Regex::new(r"/static/uploads/[A-Za-z0-9_.-]+")
        .unwrap()
        .replace_all(path, "/static/uploads/:filename");
    path.to_string()
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
            sanitize_path("/static/uploads/marked_9f0c2a_20240305_123045.jpg"),
            "/static/uploads/:filename"
        );
        assert_eq!(sanitize_path("/upload"), "/upload");
        assert_eq!(sanitize_path("/health"), "/health");
    }
}
