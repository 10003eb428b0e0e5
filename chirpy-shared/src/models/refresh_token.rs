/// Refresh token records
///
/// # Schema
///
/// ```sql
/// CREATE TABLE refresh_tokens (
///     token TEXT PRIMARY KEY,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     expires_at TIMESTAMPTZ NOT NULL,
///     revoked_at TIMESTAMPTZ
/// );
/// ```
///
/// Validity rules are not evaluated here; see
/// [`crate::auth::refresh_token::is_valid`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::refresh_token::RefreshTokenStore;

/// Persisted refresh token
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RefreshToken {
    /// 64 hex chars, primary key
    pub token: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Owning user
    pub user_id: Uuid,

    pub expires_at: DateTime<Utc>,

    /// Set once on explicit revoke
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Inserts a new token
    pub async fn create(
        pool: &PgPool,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, RefreshToken>(
            r#"
            INSERT INTO refresh_tokens (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token, created_at, updated_at, user_id, expires_at, revoked_at
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(pool)
        .await
    }

    /// Finds a token record
    pub async fn find(pool: &PgPool, token: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, RefreshToken>(
            r#"
            SELECT token, created_at, updated_at, user_id, expires_at, revoked_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await
    }

    /// Resolves the owner of a token through the users table
    ///
    /// Returns `None` if the token or its user no longer exists.
    pub async fn find_user_id(pool: &PgPool, token: &str) -> Result<Option<Uuid>, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT users.id
            FROM users
            INNER JOIN refresh_tokens ON refresh_tokens.user_id = users.id
            WHERE refresh_tokens.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|(id,)| id))
    }

    /// Revokes a token
    ///
    /// An already-revoked token keeps its original `revoked_at`. Returns true
    /// only if this call changed a row.
    pub async fn revoke(pool: &PgPool, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = NOW(), updated_at = NOW()
            WHERE token = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(token)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RefreshTokenStore for PgPool {
    async fn store_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        RefreshToken::create(self, token, user_id, expires_at).await?;
        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, sqlx::Error> {
        RefreshToken::find(self, token).await
    }

    async fn find_owner_of_refresh_token(&self, token: &str) -> Result<Option<Uuid>, sqlx::Error> {
        RefreshToken::find_user_id(self, token).await
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<bool, sqlx::Error> {
        RefreshToken::revoke(self, token).await
    }
}
