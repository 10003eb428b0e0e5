/// `Authorization` header parsing
///
/// Two schemes share the same header:
///
/// ```text
/// Authorization: Bearer <access-or-refresh-token>
/// Authorization: ApiKey <static-webhook-key>
/// ```
///
/// The value is split on single spaces. The first segment must equal the
/// scheme label exactly (case-sensitive) and the second must be non-empty; it
/// is returned verbatim without further checks. Further segments are
/// ignored.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use chirpy_shared::auth::credentials::{extract_bearer, CredentialError};
///
/// let mut headers = HeaderMap::new();
/// assert_eq!(extract_bearer(&headers), Err(CredentialError::MissingCredential));
///
/// headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
/// assert_eq!(extract_bearer(&headers), Ok("abc123"));
/// ```

use axum::http::{header, HeaderMap};

/// Scheme label for access and refresh tokens
pub const BEARER_SCHEME: &str = "Bearer";

/// Scheme label for the payment provider's static key
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Error type for credential extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// No `Authorization` header (or an empty one)
    #[error("no authorization header included in request")]
    MissingCredential,

    /// Header present but not `<scheme> <value>`
    #[error("malformed authorization header")]
    MalformedCredential,
}

/// Extracts the value of an `Authorization: <scheme> <value>` header
pub fn extract_credential<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, CredentialError> {
    let raw = match headers.get(header::AUTHORIZATION) {
        None => return Err(CredentialError::MissingCredential),
        Some(v) if v.is_empty() => return Err(CredentialError::MissingCredential),
        Some(v) => v.to_str().map_err(|_| CredentialError::MalformedCredential)?,
    };

    let mut parts = raw.split(' ');
    match (parts.next(), parts.next()) {
        (Some(label), Some(value)) if label == scheme && !value.is_empty() => Ok(value),
        _ => Err(CredentialError::MalformedCredential),
    }
}

/// Extracts a bearer token
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, CredentialError> {
    extract_credential(headers, BEARER_SCHEME)
}

/// Extracts the static webhook key
pub fn extract_api_key(headers: &HeaderMap) -> Result<&str, CredentialError> {
    extract_credential(headers, API_KEY_SCHEME)
}

/// Compares a presented key with the configured one
///
/// Runs in time independent of where the inputs differ. Length is not hidden.
pub fn verify_static_key(presented: &str, configured: &str) -> bool {
    constant_time_compare(presented, configured)
}

/// Constant-time string comparison
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
