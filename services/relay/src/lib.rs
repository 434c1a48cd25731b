//! Content relay: content addressing and resolution.
//!
//! This crate:
//! - Mints opaque identifiers for content posted in a monitored source
//! - Persists the identifier → locator mapping durably
//! - Resolves identifiers presented through deep links back into locators
//!
//! The messaging transport (receiving updates, copying messages, replying)
//! sits outside this crate and talks to it through [`ResolutionService`].

pub mod config;
pub mod error;
pub mod link;
pub mod record;
pub mod service;
pub mod store;
pub mod telemetry;

pub use config::{Config, LogFormat};
pub use error::{RelayError, StorageFailure, StoreError};
pub use link::{start_payload, DeepLink};
pub use record::{ContentRecord, STORE_VERSION};
pub use service::ResolutionService;
pub use store::{ContentStore, FileContentStore, MemoryContentStore};

pub use relay_id::{ContentId, IdError, ItemRef, Locator, SourceId};
