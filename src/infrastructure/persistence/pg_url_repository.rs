//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error};

use crate::domain::entities::NewUrlRecord;
use crate::domain::repositories::{StoreError, UrlRepository};

/// PostgreSQL repository backed by the `urls` table.
///
/// Generated identifiers come from the `BIGSERIAL` sequence; pinned
/// identifiers are inserted explicitly and rely on the primary key for
/// uniqueness.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Inserts under the next free sequence value.
    ///
    /// A draw that lands on an identifier pinned by a static alias inserts
    /// nothing; the sequence has still advanced, so the next draw moves past
    /// it. Pinned identifiers are finite and the sequence errors once
    /// exhausted, so the loop ends.
    async fn create_generated(&self, url: &str) -> Result<i64, StoreError> {
        let mut skipped = 0u64;
        loop {
            let id = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO urls (url, is_static)
                VALUES ($1, FALSE)
                ON CONFLICT (id) DO NOTHING
                RETURNING id
                "#,
            )
            .bind(url)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

            match id {
                Some(id) => {
                    if skipped > 0 {
                        debug!(id, skipped, "Skipped identifiers held by static aliases");
                    }
                    return Ok(id);
                }
                None => skipped += 1,
            }
        }
    }

    async fn create_pinned(&self, url: &str, id: i64) -> Result<i64, StoreError> {
        let result = sqlx::query("INSERT INTO urls (id, url, is_static) VALUES ($1, $2, TRUE)")
            .bind(id)
            .bind(url)
            .execute(self.pool.as_ref())
            .await;

        match result {
            Ok(_) => Ok(id),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict(id)),
            Err(e) => Err(map_sqlx_error(e)),
        }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create(&self, new_record: NewUrlRecord) -> Result<i64, StoreError> {
        match new_record.id {
            Some(id) => self.create_pinned(&new_record.url, id).await,
            None => self.create_generated(&new_record.url).await,
        }
    }

    async fn update(&self, id: i64, url: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE urls SET url = $1, updated_at = NOW() WHERE id = $2")
            .bind(url)
            .bind(id)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    async fn lookup(&self, id: i64) -> Result<Option<String>, StoreError> {
        sqlx::query_scalar::<_, String>("SELECT url FROM urls WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn count(&self, is_static: bool) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls WHERE is_static = $1")
            .bind(is_static)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    error!("Database error: {}", e);
    StoreError::Database(e.to_string())
}
