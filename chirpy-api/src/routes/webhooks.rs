/// Payment provider webhook
///
/// ```text
/// POST /api/polka/webhooks
/// Authorization: ApiKey <POLKA_KEY>
/// Content-Type: application/json
///
/// { "event": "user.upgraded", "data": { "user_id": "uuid" } }
/// ```
///
/// The key is checked before the body is looked at. Events other than
/// `user.upgraded` are acknowledged and ignored so the provider stops
/// retrying them.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chirpy_shared::{auth::middleware::authenticate_api_key, models::user::User};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

/// Event that grants Chirpy Red
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

/// Webhook payload
#[derive(Debug, Deserialize)]
pub struct PolkaWebhook {
    pub event: String,

    #[serde(default)]
    pub data: PolkaWebhookData,
}

/// Webhook payload data
#[derive(Debug, Default, Deserialize)]
pub struct PolkaWebhookData {
    /// Only meaningful for `user.upgraded`
    #[serde(default)]
    pub user_id: String,
}

/// Handles a payment provider event
///
/// # Errors
///
/// - `400 Bad Request`: Unreadable body, or a `user.upgraded` event without a valid user id
/// - `401 Unauthorized`: Missing or wrong key
/// - `404 Not Found`: Unknown user
pub async fn polka_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PolkaWebhook>, JsonRejection>,
) -> ApiResult<StatusCode> {
    authenticate_api_key(&headers, state.polka_key())?;

    let Json(webhook) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if webhook.event != USER_UPGRADED_EVENT {
        debug!(event = %webhook.event, "Ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = Uuid::parse_str(&webhook.data.user_id)
        .map_err(|_| ApiError::BadRequest("Invalid user ID".to_string()))?;

    User::upgrade_to_red(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = %user_id, "User upgraded to Chirpy Red");
    Ok(StatusCode::NO_CONTENT)
}
