/// User endpoints
///
/// - `POST /api/users` - Register
/// - `PUT /api/users` - Change the caller's email and password (access token)
///
/// Responses never include the password hash:
///
/// ```json
/// {
///   "id": "uuid",
///   "created_at": "2024-01-01T00:00:00Z",
///   "updated_at": "2024-01-01T00:00:00Z",
///   "email": "user@example.com",
///   "is_chirpy_red": false
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use chirpy_shared::{
    auth::{middleware::AuthContext, password},
    models::user::{CreateUser, User},
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Email and plaintext password, used by register and update
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Registers a new user
///
/// # Errors
///
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    req.validate()?;

    let hashed_password = password::hash_password(&req.password)?;
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            hashed_password,
        },
    )
    .await?;

    info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Replaces the authenticated user's email and password
///
/// Only the caller's own record can change; the target id comes from the
/// access token, never from the request body.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid access token
/// - `404 Not Found`: The token's user no longer exists
/// - `409 Conflict`: Email taken by another user
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let hashed_password = password::hash_password(&req.password)?;
    let user = User::update_credentials(&state.db, auth.user_id, &req.email, &hashed_password)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = %user.id, "User credentials updated");
    Ok(Json(user))
}
