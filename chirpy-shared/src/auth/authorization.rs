/// Ownership checks
///
/// Runs only after [`super::middleware::authenticate`] has produced an
/// identity. Ownership is strict equality between the caller and the
/// resource's recorded owner; there is no administrative override.
///
/// ```text
/// Unauthenticated ── valid bearer ──▶ Authenticated ── owner match ──▶ Authorized
///        │                                  │
///        ▼                                  ▼
///       401                                403
/// ```
///
/// # Example
///
/// ```
/// use chirpy_shared::auth::authorization::{require_ownership, AuthzError};
/// use chirpy_shared::auth::middleware::AuthContext;
/// use uuid::Uuid;
///
/// let owner = Uuid::new_v4();
/// let auth = AuthContext { user_id: Uuid::new_v4() };
///
/// assert!(matches!(require_ownership(&auth, owner), Err(AuthzError::OwnerMismatch)));
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Caller is authenticated but does not own the resource
    #[error("not authorized to modify this resource")]
    OwnerMismatch,
}

impl IntoResponse for AuthzError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "forbidden",
            "message": self.to_string(),
        }));

        (StatusCode::FORBIDDEN, body).into_response()
    }
}

/// Compares an identity against a resource owner
///
/// # Errors
///
/// Returns [`AuthzError::OwnerMismatch`] unless the two ids are equal.
pub fn authorize_owner(identity_id: Uuid, resource_owner_id: Uuid) -> Result<(), AuthzError> {
    if identity_id != resource_owner_id {
        debug!(
            identity_id = %identity_id,
            resource_owner_id = %resource_owner_id,
            "Ownership check failed"
        );
        return Err(AuthzError::OwnerMismatch);
    }

    Ok(())
}

/// Checks that the authenticated caller owns a resource
pub fn require_ownership(auth: &AuthContext, resource_owner_id: Uuid) -> Result<(), AuthzError> {
    authorize_owner(auth.user_id, resource_owner_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_is_authorized() {
        let id = Uuid::new_v4();
        assert!(authorize_owner(id, id).is_ok());
        assert!(require_ownership(&AuthContext { user_id: id }, id).is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let alice = AuthContext { user_id: Uuid::new_v4() };
        let bobs_resource = Uuid::new_v4();

        assert_eq!(require_ownership(&alice, bobs_resource), Err(AuthzError::OwnerMismatch));
    }

    #[test]
    fn test_nil_ids_do_not_match_real_ids() {
        assert!(authorize_owner(Uuid::nil(), Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_owner_mismatch_is_forbidden_response() {
        let response = AuthzError::OwnerMismatch.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
