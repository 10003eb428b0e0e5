/// Chirp endpoints
///
/// - `POST /api/chirps` - Create (access token)
/// - `GET /api/chirps?author_id=<uuid>&sort=asc|desc` - List
/// - `GET /api/chirps/:chirp_id` - Fetch one
/// - `DELETE /api/chirps/:chirp_id` - Delete (access token, author only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chirpy_shared::{
    auth::{authorization::require_ownership, middleware::AuthContext},
    models::chirp::{Chirp, CreateChirp, SortOrder},
    moderation::{clean_body, validate_chirp},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

/// Create chirp request
#[derive(Debug, Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

/// List query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListChirpsQuery {
    /// Only chirps by this author
    pub author_id: Option<Uuid>,

    #[serde(default)]
    pub sort: SortOrder,
}

fn parse_chirp_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid chirp ID".to_string()))
}

/// Creates a chirp authored by the caller
///
/// The body is length-checked, then profanity is masked before storage.
///
/// # Errors
///
/// - `400 Bad Request`: Body longer than 140 characters
/// - `401 Unauthorized`: Missing or invalid access token
pub async fn create_chirp(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateChirpRequest>,
) -> ApiResult<(StatusCode, Json<Chirp>)> {
    validate_chirp(&req.body)?;

    let chirp = Chirp::create(
        &state.db,
        CreateChirp {
            body: clean_body(&req.body),
            user_id: auth.user_id,
        },
    )
    .await?;

    info!(chirp_id = %chirp.id, user_id = %auth.user_id, "Chirp created");
    Ok((StatusCode::CREATED, Json(chirp)))
}

/// Lists chirps by creation time
pub async fn list_chirps(
    State(state): State<AppState>,
    Query(query): Query<ListChirpsQuery>,
) -> ApiResult<Json<Vec<Chirp>>> {
    let chirps = Chirp::list(&state.db, query.author_id, query.sort).await?;

    Ok(Json(chirps))
}

/// Fetches one chirp
///
/// # Errors
///
/// - `400 Bad Request`: `chirp_id` is not a UUID
/// - `404 Not Found`: No such chirp
pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> ApiResult<Json<Chirp>> {
    let chirp_id = parse_chirp_id(&chirp_id)?;

    let chirp = Chirp::find_by_id(&state.db, chirp_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chirp not found".to_string()))?;

    Ok(Json(chirp))
}

/// Deletes a chirp owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: `chirp_id` is not a UUID
/// - `401 Unauthorized`: Missing or invalid access token
/// - `403 Forbidden`: Caller is not the author
/// - `404 Not Found`: No such chirp
pub async fn delete_chirp(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(chirp_id): Path<String>,
) -> ApiResult<StatusCode> {
    let chirp_id = parse_chirp_id(&chirp_id)?;

    let chirp = Chirp::find_by_id(&state.db, chirp_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chirp not found".to_string()))?;

    require_ownership(&auth, chirp.user_id)?;

    if !Chirp::delete(&state.db, chirp.id).await? {
        // Removed concurrently between lookup and delete
        return Err(ApiError::NotFound("Chirp not found".to_string()));
    }

    info!(chirp_id = %chirp.id, user_id = %auth.user_id, "Chirp deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chirp_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_chirp_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_chirp_id("not-a-uuid"), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_list_query_defaults_to_ascending() {
        let query: ListChirpsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.sort, SortOrder::Asc);
        assert!(query.author_id.is_none());
    }
}
