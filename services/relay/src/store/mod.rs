//! Content store: the durable identifier → locator mapping.
//!
//! This module provides:
//! - The [`ContentStore`] interface the resolution service is built on
//! - A file-backed JSON store with atomic replace and corruption quarantine
//! - An in-memory store for tests and non-durable embedding

mod file;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use relay_id::{ContentId, Locator};

use crate::error::{StorageFailure, StoreError};
use crate::record::ContentRecord;

pub use file::FileContentStore;
pub use memory::MemoryContentStore;

/// Content store interface.
///
/// Implementations must be safe to call from concurrent tasks: every
/// successful `put` is visible to every `get` that starts after it returns.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert (or overwrite) the record for `id`.
    ///
    /// On error the record is not saved and no link may be handed out.
    async fn put(&self, id: &ContentId, locator: Locator) -> Result<(), StorageFailure>;

    /// Look up the record for `id`.
    async fn get(&self, id: &ContentId) -> Result<ContentRecord, StoreError>;

    /// Number of stored records.
    async fn count(&self) -> Result<usize, StorageFailure>;
}

#[async_trait]
impl<T: ContentStore + ?Sized> ContentStore for Arc<T> {
    async fn put(&self, id: &ContentId, locator: Locator) -> Result<(), StorageFailure> {
        (**self).put(id, locator).await
    }

    async fn get(&self, id: &ContentId) -> Result<ContentRecord, StoreError> {
        (**self).get(id).await
    }

    async fn count(&self) -> Result<usize, StorageFailure> {
        (**self).count().await
    }
}
