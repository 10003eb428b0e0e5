/// Admin endpoints
///
/// - `GET /admin/metrics`: HTML page with the file-server hit count
/// - `POST /admin/reset`: zeroes the counter and deletes every user (cascading
///   to chirps and refresh tokens). Only available when `PLATFORM=dev`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, response::Html};
use chirpy_shared::models::user::User;
use std::sync::atomic::Ordering;
use tracing::{info, warn};

/// Renders the hit counter page
pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    let hits = state.hits.load(Ordering::Relaxed);

    Html(format!(
        r#"<!DOCTYPE html>
<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>"#,
        hits
    ))
}

/// Resets the hit counter and the users table
///
/// # Errors
///
/// - `403 Forbidden`: not running on the dev platform
/// - `500 Internal Server Error`: database error
pub async fn reset(State(state): State<AppState>) -> ApiResult<&'static str> {
    if !state.config.api.platform.is_dev() {
        warn!("Rejected reset outside dev platform");
        return Err(ApiError::Forbidden(
            "Reset is only allowed in dev environment".to_string(),
        ));
    }

    state.hits.store(0, Ordering::Relaxed);
    let deleted = User::delete_all(&state.db).await?;
    info!(deleted_users = deleted, "Reset hit counter and users");

    Ok("Hits reset to 0 and database reset to initial state.")
}
