//! Append-only audit log of client status pings.
pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;

pub use memory::MemoryStatusStore;
pub use sqlite::SqliteStatusStore;

/// Maximum number of records returned by [`StatusStore::list`].
pub const LIST_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub id: String,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusRecord {
    pub fn new(client_name: impl Into<String>) -> Self {
        StatusRecord {
            id: Uuid::new_v4().to_string(),
            client_name: client_name.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Open the store named by `database_url`; `memory` selects the in-process store.
pub async fn open_store(database_url: &str) -> AppResult<Arc<dyn StatusStore>> {
    if database_url.eq_ignore_ascii_case("memory") {
        tracing::warn!("Using in-memory status store; records are lost on exit");
        return Ok(Arc::new(MemoryStatusStore::new()));
    }
    Ok(Arc::new(SqliteStatusStore::connect(database_url).await?))
}

#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn create(&self, client_name: &str) -> AppResult<StatusRecord>;

    /// At most [`LIST_LIMIT`] records, oldest first.
    async fn list(&self) -> AppResult<Vec<StatusRecord>>;

    /// Release underlying connections. Safe to call more than once.
    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_store_memory() {
        let store = open_store("memory").await.unwrap();
        store.create("bob").await.unwrap();
        assert_eq!(store.list().await.unwrap()[0].client_name, "bob");
    }

    #[tokio::test]
    async fn test_open_store_sqlite_memory() {
        let store = open_store("sqlite::memory:").await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        store.close().await;
    }

    #[test]
    fn test_record_serializes_three_fields() {
        let value = serde_json::to_value(StatusRecord::new("alice")).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(obj.contains_key("id") && obj.contains_key("client_name") && obj.contains_key("timestamp"));
    }
}
