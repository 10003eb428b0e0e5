/// Opaque refresh tokens
///
/// Refresh tokens are 32 bytes from the OS CSPRNG, hex-encoded (64 chars),
/// and live server-side behind [`RefreshTokenStore`]. A token stays usable
/// for repeated refreshes until it expires (60 days by default) or is
/// revoked; it is not rotated on use.
///
/// [`is_valid`] is the only place validity is decided. Issuing, redeeming
/// and revoking all go through the store, with no in-process caching, so each
/// call sees the latest revocation state.
///
/// # Example
///
/// ```no_run
/// use chirpy_shared::auth::refresh_token::{issue_refresh_token, redeem_refresh_token, revoke_refresh_token};
/// use chrono::{Duration, Utc};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let token = issue_refresh_token(&pool, user_id, Utc::now(), Duration::days(60)).await?;
///
/// assert_eq!(redeem_refresh_token(&pool, &token, Utc::now()).await?, user_id);
///
/// revoke_refresh_token(&pool, &token).await?;
/// assert!(redeem_refresh_token(&pool, &token, Utc::now()).await.is_err());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use tracing::debug;
use uuid::Uuid;

use crate::models::refresh_token::RefreshToken;

/// Random bytes per token
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Default validity window from issuance
pub const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// Why a presented refresh token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("unknown token")]
    Unknown,

    #[error("token revoked")]
    Revoked,

    #[error("token expired")]
    Expired,

    #[error("token owner no longer exists")]
    OwnerMissing,
}

/// Error type for refresh token operations
#[derive(Debug, thiserror::Error)]
pub enum RefreshTokenError {
    /// The OS RNG failed. Fatal, never retried with a weaker source.
    #[error("Failed to obtain secure randomness: {0}")]
    Randomness(String),

    /// The presented token is not usable (401 at the boundary)
    #[error("Refresh token rejected: {0}")]
    Rejected(RejectReason),

    /// `now + ttl` is not a representable expiry
    #[error("Refresh token lifetime out of range: {0}")]
    InvalidLifetime(String),

    /// The backing store failed
    #[error("Refresh token store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Persistence operations the refresh path depends on
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persists a freshly generated token
    async fn store_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>;

    /// Looks up a token record
    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, sqlx::Error>;

    /// Resolves the user owning a token
    async fn find_owner_of_refresh_token(&self, token: &str) -> Result<Option<Uuid>, sqlx::Error>;

    /// Sets `revoked_at`; returns whether a row changed
    async fn revoke_refresh_token(&self, token: &str) -> Result<bool, sqlx::Error>;
}

/// Generates a new refresh token string (64 lowercase hex chars)
///
/// # Errors
///
/// Returns `RefreshTokenError::Randomness` if the OS RNG is unavailable.
pub fn generate_refresh_token() -> Result<String, RefreshTokenError> {
    let mut key = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut key)
        .map_err(|e| RefreshTokenError::Randomness(e.to_string()))?;

    Ok(hex::encode(key))
}

/// Whether `record` is usable at `now`
///
/// True iff the token was never revoked and `expires_at` is strictly after
/// `now`.
pub fn is_valid(record: &RefreshToken, now: DateTime<Utc>) -> bool {
    record.revoked_at.is_none() && record.expires_at > now
}

/// Generates and persists a refresh token for `user_id`
pub async fn issue_refresh_token<S>(
    store: &S,
    user_id: Uuid,
    now: DateTime<Utc>,
    ttl: Duration,
) -> Result<String, RefreshTokenError>
where
    S: RefreshTokenStore + ?Sized,
{
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| RefreshTokenError::InvalidLifetime(ttl.to_string()))?;
    let token = generate_refresh_token()?;

    store.store_refresh_token(&token, user_id, expires_at).await?;
    debug!(user_id = %user_id, expires_at = %expires_at, "Issued refresh token");

    Ok(token)
}

/// Checks a presented refresh token and returns its owner
///
/// # Errors
///
/// `Rejected` for unknown, revoked or expired tokens and for tokens whose
/// owner is gone; `Store` if the lookup itself fails.
pub async fn redeem_refresh_token<S>(
    store: &S,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Uuid, RefreshTokenError>
where
    S: RefreshTokenStore + ?Sized,
{
    let record = store
        .find_refresh_token(token)
        .await?
        .ok_or(RefreshTokenError::Rejected(RejectReason::Unknown))?;

    if !is_valid(&record, now) {
        let reason = if record.revoked_at.is_some() {
            RejectReason::Revoked
        } else {
            RejectReason::Expired
        };
        return Err(RefreshTokenError::Rejected(reason));
    }

    store
        .find_owner_of_refresh_token(token)
        .await?
        .ok_or(RefreshTokenError::Rejected(RejectReason::OwnerMissing))
}

/// Revokes a refresh token
///
/// Succeeds identically whether or not the token existed (or was already
/// revoked), so callers cannot probe for token existence. Only store faults
/// are errors.
pub async fn revoke_refresh_token<S>(store: &S, token: &str) -> Result<(), RefreshTokenError>
where
    S: RefreshTokenStore + ?Sized,
{
    let changed = store.revoke_refresh_token(token).await?;
    debug!(changed, "Processed refresh token revocation");

    Ok(())
}
