//! PostgreSQL implementation of short link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, Owner, ShortLink};
use crate::domain::page::PageRequest;
use crate::domain::repositories::ShortLinkRepository;
use crate::error::{AppError, map_sqlx_error};

const SHORT_KEY_CONSTRAINT: &str = "short_links_short_key_key";

/// Row shape shared by every query that returns a link with its owner name.
#[derive(sqlx::FromRow)]
struct ShortLinkRow {
    id: i64,
    short_key: String,
    original_url: String,
    is_private: bool,
    expires_at: Option<DateTime<Utc>>,
    owner_id: Option<i64>,
    owner_name: Option<String>,
    click_count: i64,
    created_at: DateTime<Utc>,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(row: ShortLinkRow) -> Self {
        let owner_name = row.owner_name;

        ShortLink {
            id: row.id,
            short_key: row.short_key,
            original_url: row.original_url,
            is_private: row.is_private,
            expires_at: row.expires_at,
            owner: row.owner_id.map(|id| Owner {
                id,
                name: owner_name.unwrap_or_default(),
            }),
            click_count: row.click_count,
            created_at: row.created_at,
        }
    }
}

fn is_unique_violation_on_short_key(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    db_err.is_unique_violation() && db_err.constraint() == Some(SHORT_KEY_CONSTRAINT)
}

/// PostgreSQL repository for short links.
///
/// Key uniqueness is enforced by the `short_links_short_key_key` constraint
/// and click counting by a single `UPDATE ... RETURNING`, so concurrent
/// requests never race inside the application.
pub struct PgShortLinkRepository {
    pool: Arc<PgPool>,
}

impl PgShortLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortLinkRepository for PgShortLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            WITH inserted AS (
                INSERT INTO short_links (short_key, original_url, is_private, expires_at, owner_id, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, short_key, original_url, is_private, expires_at, owner_id, click_count, created_at
            )
            SELECT
                i.id,
                i.short_key,
                i.original_url,
                i.is_private,
                i.expires_at,
                i.owner_id,
                u.name AS owner_name,
                i.click_count,
                i.created_at
            FROM inserted i
            LEFT JOIN users u ON u.id = i.owner_id
            "#,
        )
        .bind(&new_link.short_key)
        .bind(&new_link.original_url)
        .bind(new_link.is_private)
        .bind(new_link.expires_at)
        .bind(new_link.owner.as_ref().map(|o| o.id))
        .bind(new_link.created_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_short_key(&e) {
                AppError::conflict(
                    "Short key already exists",
                    json!({ "short_key": new_link.short_key }),
                )
            } else {
                map_sqlx_error(e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_key(&self, short_key: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT l.id, l.short_key, l.original_url, l.is_private, l.expires_at,
                   l.owner_id, u.name AS owner_name, l.click_count, l.created_at
            FROM short_links l
            LEFT JOIN users u ON u.id = l.owner_id
            WHERE l.short_key = $1
            "#,
        )
        .bind(short_key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn exists_by_key(&self, short_key: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM short_links WHERE short_key = $1)",
        )
        .bind(short_key)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn increment_click_count(
        &self,
        short_key: &str,
    ) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            WITH updated AS (
                UPDATE short_links
                SET click_count = click_count + 1
                WHERE short_key = $1
                RETURNING id, short_key, original_url, is_private, expires_at, owner_id, click_count, created_at
            )
            SELECT
                l.id,
                l.short_key,
                l.original_url,
                l.is_private,
                l.expires_at,
                l.owner_id,
                u.name AS owner_name,
                l.click_count,
                l.created_at
            FROM updated l
            LEFT JOIN users u ON u.id = l.owner_id
            "#,
        )
        .bind(short_key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_public(&self, page: PageRequest) -> Result<Vec<ShortLink>, AppError> {
        let rows = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT l.id, l.short_key, l.original_url, l.is_private, l.expires_at,
                   l.owner_id, u.name AS owner_name, l.click_count, l.created_at
            FROM short_links l
            LEFT JOIN users u ON u.id = l.owner_id
            WHERE l.is_private = FALSE
            ORDER BY l.created_at DESC, l.id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_public(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM short_links WHERE is_private = FALSE",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn list_all(&self, page: PageRequest) -> Result<Vec<ShortLink>, AppError> {
        let rows = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT l.id, l.short_key, l.original_url, l.is_private, l.expires_at,
                   l.owner_id, u.name AS owner_name, l.click_count, l.created_at
            FROM short_links l
            LEFT JOIN users u ON u.id = l.owner_id
            ORDER BY l.created_at DESC, l.id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM short_links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        page: PageRequest,
    ) -> Result<Vec<ShortLink>, AppError> {
        let rows = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT l.id, l.short_key, l.original_url, l.is_private, l.expires_at,
                   l.owner_id, u.name AS owner_name, l.click_count, l.created_at
            FROM short_links l
            LEFT JOIN users u ON u.id = l.owner_id
            WHERE l.owner_id = $1
            ORDER BY l.created_at DESC, l.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_by_owner(&self, owner_id: i64) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM short_links WHERE owner_id = $1")
                .bind(owner_id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }

    async fn delete_by_ids_and_owner(&self, ids: &[i64], owner_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM short_links WHERE id = ANY($1) AND owner_id = $2")
            .bind(ids)
            .bind(owner_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
