/// File-server hit counter
///
/// Every request under `/app` increments [`AppState::hits`] before the file
/// is served, including requests for missing files. `/admin/metrics` reads
/// the counter and `/admin/reset` zeroes it.

use crate::app::AppState;
use axum::{extract::{Request, State}, middleware::Next, response::Response};
use std::sync::atomic::Ordering;

/// Increments the hit counter and forwards the request
pub async fn count_hits(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let hits = state.hits.fetch_add(1, Ordering::Relaxed) + 1;
    tracing::trace!(hits, path = %req.uri().path(), "File server hit");

    next.run(req).await
}
