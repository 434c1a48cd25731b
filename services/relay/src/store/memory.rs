//! In-memory content store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use relay_id::{ContentId, Locator};
use tokio::sync::RwLock;
use tracing::warn;

use super::ContentStore;
use crate::error::{StorageFailure, StoreError};
use crate::record::ContentRecord;

/// Non-durable store; contents are lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    records: RwLock<BTreeMap<ContentId, ContentRecord>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn put(&self, id: &ContentId, locator: Locator) -> Result<(), StorageFailure> {
        let record = ContentRecord {
            id: id.clone(),
            locator,
            created_at: Utc::now(),
        };

        if self.records.write().await.insert(id.clone(), record).is_some() {
            warn!(content_id = %id, "Overwrote existing content record");
        }
        Ok(())
    }

    async fn get(&self, id: &ContentId) -> Result<ContentRecord, StoreError> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn count(&self) -> Result<usize, StorageFailure> {
        Ok(self.records.read().await.len())
    }
}
