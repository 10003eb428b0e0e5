/// Request authentication for Axum
///
/// [`authenticate`] is the single entry point protected handlers rely on:
/// it extracts the bearer token and validates it as an access token. Every
/// failure, whatever the reason, becomes the same `401` response; the reason
/// is logged at `debug` and never sent to the client.
///
/// On success the middleware inserts an [`AuthContext`] into request
/// extensions, and handlers receive it by declaring it as an argument.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::post, Router};
/// use chirpy_shared::auth::middleware::{create_jwt_middleware, AuthContext};
///
/// async fn create_chirp(auth: AuthContext) -> String {
///     format!("posting as {}", auth.user_id)
/// }
///
/// let app: Router = Router::new()
///     .route("/api/chirps", post(create_chirp))
///     .layer(middleware::from_fn(create_jwt_middleware("secret")));
/// ```

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::credentials::{extract_api_key, extract_bearer, verify_static_key, CredentialError};
use super::jwt::{validate_access_token, JwtError};

/// Identity recovered from a validated access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

/// Error type for request authentication
///
/// All variants render as `401 Unauthorized` with an identical body.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing or malformed `Authorization` header
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Access token rejected
    #[error("token error: {0}")]
    Token(#[from] JwtError),

    /// Static key did not match
    #[error("invalid api key")]
    InvalidApiKey,

    /// Handler asked for an [`AuthContext`] on an unauthenticated route
    #[error("no authentication context on request")]
    NotAuthenticated,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "unauthorized",
            "message": "Unauthorized",
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Authenticates a request from its headers
///
/// # Returns
///
/// The user id named by a valid `Authorization: Bearer <jwt>` header.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = extract_bearer(headers).map_err(|e| {
        debug!(reason = %e, "Bearer credential rejected");
        AuthError::from(e)
    })?;

    let user_id = validate_access_token(token, secret).map_err(|e| {
        debug!(reason = %e, "Access token rejected");
        AuthError::from(e)
    })?;

    Ok(AuthContext { user_id })
}

/// Authenticates the trusted webhook caller
///
/// Expects `Authorization: ApiKey <key>` with `key` equal to `configured`.
pub fn authenticate_api_key(headers: &HeaderMap, configured: &str) -> Result<(), AuthError> {
    let presented = extract_api_key(headers).map_err(|e| {
        debug!(reason = %e, "Api key credential rejected");
        AuthError::from(e)
    })?;

    if !verify_static_key(presented, configured) {
        debug!("Api key mismatch");
        return Err(AuthError::InvalidApiKey);
    }

    Ok(())
}

/// JWT authentication middleware
///
/// Rejects with `401` before the handler runs, so a rejected request never
/// performs any part of its action.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_context = authenticate(req.headers(), &secret)?;
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Creates a JWT authentication middleware closure capturing the secret
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>> + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AuthError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::issue_access_token;
    use axum::{body::Body, http::{header, HeaderValue}, routing::get, Router};
    use chrono::Duration;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_authenticate_valid_token() {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(user_id, SECRET, Duration::hours(1)).unwrap();

        let auth = authenticate(&bearer(&token), SECRET).unwrap();
        assert_eq!(auth.user_id, user_id);
    }

    #[test]
    fn test_authenticate_failures() {
        let expired = issue_access_token(Uuid::new_v4(), SECRET, Duration::seconds(-60)).unwrap();
        let foreign = issue_access_token(Uuid::new_v4(), "other-secret", Duration::hours(1)).unwrap();

        assert!(matches!(
            authenticate(&HeaderMap::new(), SECRET),
            Err(AuthError::Credential(CredentialError::MissingCredential))
        ));
        assert!(matches!(
            authenticate(&bearer("garbage"), SECRET),
            Err(AuthError::Token(JwtError::Malformed(_)))
        ));
        assert!(matches!(authenticate(&bearer(&expired), SECRET), Err(AuthError::Token(JwtError::Expired))));
        assert!(matches!(
            authenticate(&bearer(&foreign), SECRET),
            Err(AuthError::Token(JwtError::InvalidSignature))
        ));
    }

    #[tokio::test]
    async fn test_all_auth_errors_render_identically() {
        let errors = vec![
            AuthError::Credential(CredentialError::MissingCredential),
            AuthError::Credential(CredentialError::MalformedCredential),
            AuthError::Token(JwtError::Expired),
            AuthError::Token(JwtError::InvalidSignature),
            AuthError::Token(JwtError::UnparsableSubject("x".into())),
            AuthError::InvalidApiKey,
        ];

        let mut bodies = Vec::new();
        for err in errors {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            bodies.push(body);
        }

        assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_authenticate_api_key() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("ApiKey polka-key"));

        assert!(authenticate_api_key(&headers, "polka-key").is_ok());
        assert!(matches!(authenticate_api_key(&headers, "other-key"), Err(AuthError::InvalidApiKey)));
        assert!(authenticate_api_key(&HeaderMap::new(), "polka-key").is_err());
    }

    #[tokio::test]
    async fn test_middleware_injects_context() {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(user_id, SECRET, Duration::hours(1)).unwrap();

        let app = Router::new()
            .route("/me", get(|auth: AuthContext| async move { auth.user_id.to_string() }))
            .layer(axum::middleware::from_fn(create_jwt_middleware(SECRET)));

        let response = app
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, user_id.to_string().as_bytes());

        let response = app
            .oneshot(axum::http::Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
