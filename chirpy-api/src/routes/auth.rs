/// Session endpoints
///
/// - `POST /api/login` - Exchange email and password for tokens
/// - `POST /api/refresh` - Exchange a refresh token for a new access token
/// - `POST /api/revoke` - Revoke a refresh token
///
/// Refresh and revoke read the refresh token from
/// `Authorization: Bearer <refresh_token>`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::{HeaderMap, StatusCode}, Json};
use chirpy_shared::{
    auth::{credentials::extract_bearer, jwt, password, refresh_token},
    models::user::User,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,

    pub password: String,
}

/// Login response: the user plus both tokens
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: User,

    /// Access token
    pub token: String,

    /// Refresh token
    pub refresh_token: String,
}

/// Refresh response
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token
    pub token: String,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Incorrect email or password".to_string())
}

/// Login endpoint
///
/// ```text
/// POST /api/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "04234" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (same body for both)
/// - `500 Internal Server Error`: Hashing, signing or storage failure
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = match User::find_by_email(&state.db, &req.email).await? {
        Some(user) => user,
        None => {
            // Burn a hash so unknown emails cost as much as wrong passwords
            let _ = password::hash_password(&req.password);
            debug!("Login failed: unknown email");
            return Err(invalid_credentials());
        }
    };

    if !password::verify_password(&req.password, &user.hashed_password)? {
        debug!(user_id = %user.id, "Login failed: wrong password");
        return Err(invalid_credentials());
    }

    let token = jwt::issue_access_token(user.id, state.jwt_secret(), state.config.access_token_ttl())?;
    let refresh_token = refresh_token::issue_refresh_token(
        &state.db,
        user.id,
        Utc::now(),
        state.config.refresh_token_ttl(),
    )
    .await?;

    info!(user_id = %user.id, "User logged in");
    Ok(Json(LoginResponse {
        user,
        token,
        refresh_token,
    }))
}

/// Refresh endpoint
///
/// The refresh token is not rotated and stays valid for further refreshes.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing, unknown, revoked or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<RefreshResponse>> {
    let presented = extract_bearer(&headers)?;
    let user_id = refresh_token::redeem_refresh_token(&state.db, presented, Utc::now()).await?;

    let token = jwt::issue_access_token(user_id, state.jwt_secret(), state.config.access_token_ttl())?;

    debug!(user_id = %user_id, "Access token refreshed");
    Ok(Json(RefreshResponse { token }))
}

/// Revoke endpoint
///
/// Responds `204 No Content` whether or not the token existed.
///
/// # Errors
///
/// - `401 Unauthorized`: No bearer credential at all
pub async fn revoke(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    let presented = extract_bearer(&headers)?;
    refresh_token::revoke_refresh_token(&state.db, presented).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_login_response_flattens_user_without_hash() {
        let now = Utc::now();
        let response = LoginResponse {
            user: User {
                id: Uuid::new_v4(),
                created_at: now,
                updated_at: now,
                email: "walt@breakingbad.com".to_string(),
                hashed_password: "$argon2id$secret".to_string(),
                is_chirpy_red: false,
            },
            token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["email"], "walt@breakingbad.com");
        assert_eq!(json["token"], "access");
        assert_eq!(json["refresh_token"], "refresh");
        assert_eq!(json["is_chirpy_red"], false);
        assert!(json.get("hashed_password").is_none());
        assert!(json.get("user").is_none());
    }
}
