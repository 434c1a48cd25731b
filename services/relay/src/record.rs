//! Content records and the persisted store document.
//!
//! The document on disk is a single JSON object:
//!
//! ```json
//! {
//!   "version": 1,
//!   "records": {
//!     "q3Zx0_Lm-aQ": {
//!       "source_id": -1001234567890,
//!       "item_ref": 42,
//!       "created_at": "2026-10-18T09:30:00.000000Z"
//!     }
//!   }
//! }
//! ```
//!
//! Older stores have no `version` field: the whole document is the record
//! map, entries use `chat_id`/`message_id`, and `created_at` carries no
//! offset. Those are still read and get rewritten in the current layout on
//! the next write.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use relay_id::{ContentId, ItemRef, Locator, SourceId};
use serde::{Deserialize, Serialize};

/// Persisted store document format version.
pub const STORE_VERSION: u32 = 1;

/// One resolved entry: an identifier and the content it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    pub id: ContentId,
    pub locator: Locator,
    pub created_at: DateTime<Utc>,
}

impl ContentRecord {
    pub fn source_id(&self) -> SourceId {
        self.locator.source_id
    }

    pub fn item_ref(&self) -> ItemRef {
        self.locator.item_ref
    }
}

/// A record as stored under its identifier key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(alias = "chat_id")]
    pub source_id: SourceId,
    #[serde(alias = "message_id")]
    pub item_ref: ItemRef,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl StoredRecord {
    pub fn new(locator: Locator, created_at: DateTime<Utc>) -> Self {
        Self {
            source_id: locator.source_id,
            item_ref: locator.item_ref,
            created_at,
        }
    }

    pub fn to_record(&self, id: ContentId) -> ContentRecord {
        ContentRecord {
            id,
            locator: Locator::new(self.source_id, self.item_ref),
            created_at: self.created_at,
        }
    }
}

/// The full persisted mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub version: u32,
    pub records: BTreeMap<ContentId, StoredRecord>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            records: BTreeMap::new(),
        }
    }
}

/// Why a document could not be decoded.
#[derive(Debug)]
pub enum DecodeError {
    /// Not JSON, or not shaped like any known layout.
    Malformed(serde_json::Error),
    /// Declares a version newer than [`STORE_VERSION`].
    UnsupportedVersion(u64),
}

impl StoreDocument {
    /// Decodes either the versioned layout or the legacy bare map.
    ///
    /// `version` can never be a record key (it is shorter than any valid
    /// identifier), so its presence alone tells the two layouts apart.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(DecodeError::Malformed)?;

        match value.get("version").and_then(serde_json::Value::as_u64) {
            Some(found) if found > u64::from(STORE_VERSION) => {
                Err(DecodeError::UnsupportedVersion(found))
            }
            Some(_) => serde_json::from_value(value).map_err(DecodeError::Malformed),
            None => {
                let records: BTreeMap<ContentId, StoredRecord> =
                    serde_json::from_value(value).map_err(DecodeError::Malformed)?;
                Ok(Self {
                    version: STORE_VERSION,
                    records,
                })
            }
        }
    }

    pub fn record(&self, id: &ContentId) -> Option<ContentRecord> {
        self.records.get(id).map(|stored| stored.to_record(id.clone()))
    }
}

/// RFC 3339 on write; also accepts offset-less ISO-8601 (read as UTC).
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&s) {
            return Ok(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
