//! # relay-id
//!
//! Content identifier generation, parsing, and validation for the content relay.
//!
//! ## Design Principles
//!
//! - Content IDs are always system-generated; user input is only ever parsed
//! - Every externally supplied string is validated before it reaches storage
//! - IDs are opaque: they encode nothing about the content they name
//! - Locator parts are typed to prevent mixing a source with an item
//!
//! ## ID Format
//!
//! A content ID is 8 random bytes encoded as unpadded base64url, e.g.
//! `q3Zx0_Lm-aQ`. The accepted grammar is wider than what the generator
//! emits: one or more of `[A-Za-z0-9_-]`, at least 8 characters long.
//!
//! This format provides:
//! - URL safety (usable verbatim in a `?start=` query parameter)
//! - Unguessability (64 bits from a CSPRNG)
//! - Compactness (11 characters)

mod content;
mod error;
mod types;

pub use content::{is_valid, ContentId, GENERATED_LEN, MIN_LEN, RANDOM_BYTES};
pub use error::IdError;
pub use types::{ItemRef, Locator, SourceId};
