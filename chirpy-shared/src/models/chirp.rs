/// Chirp model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE chirps (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     body TEXT NOT NULL,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A short text post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chirp {
    pub id: Uuid,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Already-moderated body
    pub body: String,

    /// Author, the resource owner for delete checks
    pub user_id: Uuid,
}

/// Input for creating a chirp
#[derive(Debug, Clone)]
pub struct CreateChirp {
    pub body: String,
    pub user_id: Uuid,
}

/// Ordering for chirp listings, by creation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl Chirp {
    /// Creates a chirp
    pub async fn create(pool: &PgPool, data: CreateChirp) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Chirp>(
            r#"
            INSERT INTO chirps (body, user_id)
            VALUES ($1, $2)
            RETURNING id, created_at, updated_at, body, user_id
            "#,
        )
        .bind(data.body)
        .bind(data.user_id)
        .fetch_one(pool)
        .await
    }

    /// Finds a chirp by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Chirp>(
            r#"
            SELECT id, created_at, updated_at, body, user_id
            FROM chirps
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists chirps, optionally restricted to one author
    pub async fn list(
        pool: &PgPool,
        author_id: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<Self>, sqlx::Error> {
        // Direction comes from a closed enum, never from user text
        let query = format!(
            r#"
            SELECT id, created_at, updated_at, body, user_id
            FROM chirps
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at {}
            "#,
            order.as_sql()
        );

        sqlx::query_as::<_, Chirp>(&query)
            .bind(author_id)
            .fetch_all(pool)
            .await
    }

    /// Deletes a chirp
    ///
    /// Returns true if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_default_is_ascending() {
        assert_eq!(SortOrder::default(), SortOrder::Asc);
        assert_eq!(SortOrder::Asc.as_sql(), "ASC");
        assert_eq!(SortOrder::Desc.as_sql(), "DESC");
    }

    #[test]
    fn test_sort_order_deserializes_lowercase() {
        let order: SortOrder = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(order, SortOrder::Desc);
        assert!(serde_json::from_str::<SortOrder>("\"sideways\"").is_err());
    }
}
