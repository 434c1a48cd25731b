//! Typed locator parts.
//!
//! A locator points at the original content: the source location it was
//! posted in and the item within that location. Both are plain integers on
//! the wire, wrapped here so they cannot be swapped by accident.

use serde::{Deserialize, Serialize};

/// Identifies the source location (e.g. a private channel).
///
/// Platform chat identifiers are frequently negative, so this is signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(i64);

impl SourceId {
    /// Creates a new SourceId from an i64.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying i64 value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SourceId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<SourceId> for i64 {
    fn from(id: SourceId) -> Self {
        id.0
    }
}

/// Identifies a single item within a source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemRef(i64);

impl ItemRef {
    /// Creates a new ItemRef from an i64.
    #[must_use]
    pub const fn new(item: i64) -> Self {
        Self(item)
    }

    /// Returns the underlying i64 value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemRef {
    fn from(item: i64) -> Self {
        Self(item)
    }
}

impl From<ItemRef> for i64 {
    fn from(item: ItemRef) -> Self {
        item.0
    }
}

/// Where a piece of content lives: source location plus item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locator {
    pub source_id: SourceId,
    pub item_ref: ItemRef,
}

impl Locator {
    #[must_use]
    pub const fn new(source_id: SourceId, item_ref: ItemRef) -> Self {
        Self { source_id, item_ref }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.source_id, self.item_ref)
    }
}
