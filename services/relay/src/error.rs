//! Error types for the store and the resolution service.

use std::io;
use std::path::PathBuf;

use relay_id::{ContentId, IdError};
use thiserror::Error;

/// The persistence medium could not be read, written, or understood.
///
/// Always an operational problem: never returned for a merely absent record.
#[derive(Debug, Error)]
pub enum StorageFailure {
    #[error("failed to read content store {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write content store {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    /// The unparsable store could not be copied aside, so it was left untouched.
    #[error("failed to back up corrupted store {} to {}: {source}", .path.display(), .backup.display())]
    Quarantine {
        path: PathBuf,
        backup: PathBuf,
        source: io::Error,
    },

    #[error("failed to encode content store: {0}")]
    Encode(#[from] serde_json::Error),

    /// Written by a newer release; refusing to overwrite it.
    #[error("content store {} has version {found}, newest supported is {supported}", .path.display())]
    UnsupportedVersion {
        path: PathBuf,
        found: u64,
        supported: u32,
    },
}

/// Errors from a store lookup.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content not found: {0}")]
    NotFound(ContentId),

    #[error(transparent)]
    Storage(#[from] StorageFailure),
}

/// Typed failures surfaced by the resolution service to the transport layer.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The supplied identifier does not match the identifier grammar.
    #[error("invalid content id: {0}")]
    InvalidFormat(#[from] IdError),

    /// The identifier is well-formed but names no stored content.
    #[error("content not found: {0}")]
    NotFound(ContentId),

    #[error("storage failure: {0}")]
    StorageFailure(#[from] StorageFailure),
}

impl RelayError {
    /// Get the standardized reason code for this error.
    pub fn reason_code(&self) -> &'static str {
        match self {
            RelayError::InvalidFormat(_) => "invalid_format",
            RelayError::NotFound(_) => "not_found",
            RelayError::StorageFailure(_) => "storage_failure",
        }
    }

    /// Returns true for failures caused by the requester rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RelayError::InvalidFormat(_) | RelayError::NotFound(_))
    }
}

impl From<StoreError> for RelayError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => RelayError::NotFound(id),
            StoreError::Storage(failure) => RelayError::StorageFailure(failure),
        }
    }
}
