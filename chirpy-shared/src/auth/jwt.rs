/// Access token issuing and validation
///
/// Access tokens are stateless HS256 JWTs carrying only the registered claims
/// `iss`, `iat`, `exp` and `sub` (the user id). Nothing about them is stored
/// server-side, so an access token cannot be revoked: it dies when `exp`
/// passes.
///
/// A token is accepted if and only if:
///
/// - its signature verifies under the service-wide secret,
/// - `exp` has not passed (no leeway, the clock is compared exactly),
/// - `sub` parses as a UUID.
///
/// # Example
///
/// ```
/// use chirpy_shared::auth::jwt::{issue_access_token, validate_access_token};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let token = issue_access_token(user_id, "your-secret-key", Duration::hours(1))?;
///
/// assert_eq!(validate_access_token(&token, "your-secret-key")?, user_id);
/// assert!(validate_access_token(&token, "another-key").is_err());
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer written into every access token
pub const ISSUER: &str = "chirpy";

/// Default access token lifetime
pub const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 3600;

/// Error type for access token operations
///
/// `SigningFailed` is a system fault. Every other variant is an
/// authentication failure; the distinction between them exists for logs only.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Token could not be signed
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    /// Signature does not verify under the given secret
    #[error("Invalid token signature")]
    InvalidSignature,

    /// `exp` is in the past
    #[error("Token has expired")]
    Expired,

    /// Not a decodable JWT (bad segments, base64, JSON or missing claims)
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// `sub` is not a valid user id
    #[error("Token subject is not a valid user id: {0}")]
    UnparsableSubject(String),
}

impl JwtError {
    /// Whether the error is a credential failure rather than a system fault
    pub fn is_auth_failure(&self) -> bool {
        !matches!(self, JwtError::SigningFailed(_))
    }
}

/// Registered JWT claims used by access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer, always [`ISSUER`]
    pub iss: String,

    /// Issued at (Unix timestamp, UTC)
    pub iat: i64,

    /// Expiration time (Unix timestamp, UTC)
    pub exp: i64,

    /// Subject, the user id as a string
    pub sub: String,
}

impl Claims {
    /// Builds claims for `user_id` valid for `ttl` from now
    ///
    /// # Errors
    ///
    /// Returns `JwtError::SigningFailed` if `now + ttl` is out of range.
    pub fn new(user_id: Uuid, ttl: Duration) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::SigningFailed(format!("token lifetime {} is out of range", ttl)))?;

        Ok(Self {
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            sub: user_id.to_string(),
        })
    }
}

/// Signs `claims` with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| JwtError::SigningFailed(e.to_string()))
}

/// Issues an access token for `user_id`
///
/// # Errors
///
/// Returns `JwtError::SigningFailed` if the lifetime overflows or encoding
/// fails. The error is never
/// swallowed; callers must surface it as an internal error.
pub fn issue_access_token(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, JwtError> {
    create_token(&Claims::new(user_id, ttl)?, secret)
}

/// Decodes and verifies a token, returning its claims
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.validate_nbf = false;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Malformed(e.to_string()),
    })?;

    Ok(token_data.claims)
}

/// Validates an access token and returns the user id it names
///
/// # Errors
///
/// `InvalidSignature`, `Expired`, `Malformed` or `UnparsableSubject`. All of
/// them must surface identically (401) at the HTTP boundary.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Uuid, JwtError> {
    let claims = decode_claims(token, secret)?;

    Uuid::parse_str(&claims.sub).map_err(|_| JwtError::UnparsableSubject(claims.sub))
}
