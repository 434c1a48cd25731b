//! Resolution service: ingest content, resolve identifiers.
//!
//! Two linear flows, no session state:
//! - ingest: generate an ID, persist it, hand it back for link building
//! - resolve: validate the raw ID, look it up, return the record
//!
//! Failures are returned as typed [`RelayError`]s; rendering them for end
//! users is the transport layer's job.

use relay_id::{ContentId, ItemRef, Locator, SourceId};
use tracing::{debug, error, info, warn};

use crate::error::{RelayError, StorageFailure};
use crate::record::ContentRecord;
use crate::store::ContentStore;

/// Mints and resolves content identifiers against an injected store.
pub struct ResolutionService<S> {
    store: S,
}

impl<S: ContentStore> ResolutionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist a new record for the given locator and return its ID.
    ///
    /// On error nothing was saved and the caller must not hand out a link.
    pub async fn ingest(
        &self,
        source_id: SourceId,
        item_ref: ItemRef,
    ) -> Result<ContentId, StorageFailure> {
        let id = ContentId::generate();
        let locator = Locator::new(source_id, item_ref);

        if let Err(e) = self.store.put(&id, locator).await {
            error!(
                content_id = %id,
                source_id = %source_id,
                item_ref = %item_ref,
                error = %e,
                "Failed to save content"
            );
            return Err(e);
        }

        info!(
            content_id = %id,
            source_id = %source_id,
            item_ref = %item_ref,
            "Saved content"
        );
        Ok(id)
    }

    /// Resolve an externally supplied identifier.
    ///
    /// Malformed input is rejected before the store is consulted.
    pub async fn resolve(&self, raw_id: &str) -> Result<ContentRecord, RelayError> {
        let id = match ContentId::parse(raw_id) {
            Ok(id) => id,
            Err(e) => {
                debug!(raw_id, error = %e, "Rejected malformed content id");
                return Err(RelayError::InvalidFormat(e));
            }
        };

        match self.store.get(&id).await.map_err(RelayError::from) {
            Ok(record) => {
                debug!(content_id = %id, locator = %record.locator, "Resolved content");
                Ok(record)
            }
            Err(e @ RelayError::NotFound(_)) => {
                warn!(content_id = %id, "Content not found");
                Err(e)
            }
            Err(e) => {
                error!(content_id = %id, error = %e, "Failed to resolve content");
                Err(e)
            }
        }
    }
}
