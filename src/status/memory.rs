use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StatusRecord, StatusStore, LIST_LIMIT};
use crate::error::AppResult;

/// Process-local store for tests and `DATABASE_URL=memory` runs.
#[derive(Default)]
pub struct MemoryStatusStore {
    records: RwLock<Vec<StatusRecord>>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn create(&self, client_name: &str) -> AppResult<StatusRecord> {
        let record = StatusRecord::new(client_name);
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> AppResult<Vec<StatusRecord>> {
        Ok(self.records.read().await.iter().take(LIST_LIMIT).cloned().collect())
    }
}
