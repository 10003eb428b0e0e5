/// Readiness probe
///
/// ```text
/// GET /api/healthz
///
/// 200 OK
/// Content-Type: text/plain; charset=utf-8
///
/// OK
/// ```
///
/// Does not touch the database; a running process is ready.

use axum::http::StatusCode;

/// Readiness handler
pub async fn readiness() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
