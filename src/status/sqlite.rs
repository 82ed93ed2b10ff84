//! SQLite-backed status log.
//!
//! `seq` is the storage-internal row identifier; it orders the log and is
//! never selected into a [`StatusRecord`].
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};

use super::{StatusRecord, StatusStore, LIST_LIMIT};
use crate::error::{AppError, AppResult};

pub struct SqliteStatusStore {
    pool: SqlitePool,
}

impl SqliteStatusStore {
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let pool = pool_options(database_url).connect(database_url).await?;
        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> AppResult<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS status_checks (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                client_name TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }
}

/// An in-memory database lives and dies with its single connection, so that
/// connection is never reaped.
fn pool_options(database_url: &str) -> SqlitePoolOptions {
    if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    }
}

#[async_trait]
impl StatusStore for SqliteStatusStore {
    async fn create(&self, client_name: &str) -> AppResult<StatusRecord> {
        let record = StatusRecord::new(client_name);
        sqlx::query("INSERT INTO status_checks (id, client_name, timestamp) VALUES (?, ?, ?)")
            .bind(&record.id)
            .bind(&record.client_name)
            .bind(record.timestamp.to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(record)
    }

    async fn list(&self) -> AppResult<Vec<StatusRecord>> {
        let rows = sqlx::query("SELECT id, client_name, timestamp FROM status_checks ORDER BY seq LIMIT ?")
            .bind(LIST_LIMIT as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let raw: String = row.get("timestamp");
                let timestamp = DateTime::parse_from_rfc3339(&raw)
                    .map(|t| t.with_timezone(&Utc))
                    .map_err(|e| AppError::Database(sqlx::Error::Decode(Box::new(e))))?;
                Ok::<_, AppError>(StatusRecord {
                    id: row.get("id"),
                    client_name: row.get("client_name"),
                    timestamp,
                })
            })
            .collect()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
