//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct LinkRow {
    short_code: String,
    long_url: String,
    click_count: i64,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for ShortLink {
    fn from(row: LinkRow) -> Self {
        Self {
            short_code: row.short_code,
            long_url: row.long_url,
            click_count: row.click_count,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL repository for link storage and click counting.
///
/// Uses SQLx prepared statements for SQL injection protection and type safety.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT short_code, long_url, click_count, created_at
            FROM links
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link.map(ShortLink::from))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT short_code, long_url, click_count, created_at
            FROM links
            WHERE long_url = $1
            ORDER BY created_at ASC, short_code ASC
            LIMIT 1
            "#,
        )
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link.map(ShortLink::from))
    }

    async fn insert(&self, link: &ShortLink) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO links (short_code, long_url, click_count, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&link.short_code)
        .bind(&link.long_url)
        .bind(link.click_count)
        .bind(link.created_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn increment_clicks(&self, code: &str, delta: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET click_count = click_count + $2
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .bind(delta)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "code": code }),
            ));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
