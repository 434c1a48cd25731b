//! The content identifier: generation and validation.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::Rng;

use crate::IdError;

/// Random bytes per generated ID (64 bits of entropy).
pub const RANDOM_BYTES: usize = 8;

/// Length of a generated ID: 8 bytes as unpadded base64url.
pub const GENERATED_LEN: usize = 11;

/// Minimum length accepted from external input.
pub const MIN_LEN: usize = 8;

/// An opaque, URL-safe identifier naming one stored content record.
///
/// Values are either freshly generated or parsed from input that passed
/// [`is_valid`]; there is no way to construct an unvalidated `ContentId`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentId(String);

impl ContentId {
    /// Generates a fresh ID from the thread-local CSPRNG.
    ///
    /// No collision check is made against any store; the 64-bit entropy
    /// budget is the only defense. Panics if the OS entropy source is
    /// unavailable, which leaves the process unable to mint IDs at all.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; RANDOM_BYTES];
        rand::rng().fill(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Parses an externally supplied ID.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        validate(s)?;
        Ok(Self(s.to_owned()))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Returns true if `candidate` matches `[A-Za-z0-9_-]{8,}`.
pub fn is_valid(candidate: &str) -> bool {
    validate(candidate).is_ok()
}

fn validate(s: &str) -> Result<(), IdError> {
    if s.is_empty() {
        return Err(IdError::Empty);
    }

    if let Some((position, character)) = s
        .chars()
        .enumerate()
        .find(|(_, c)| !is_id_char(*c))
    {
        return Err(IdError::InvalidCharacter {
            character,
            position,
        });
    }

    // Every accepted char is ASCII, so byte length equals char count here.
    if s.len() < MIN_LEN {
        return Err(IdError::TooShort {
            len: s.len(),
            min: MIN_LEN,
        });
    }

    Ok(())
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ContentId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for ContentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ContentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_generated_id_shape() {
        let id = ContentId::generate();
        assert_eq!(id.as_str().len(), GENERATED_LEN);
        assert!(is_valid(id.as_str()));
    }

    #[test]
    fn test_generated_ids_unique() {
        let ids: HashSet<ContentId> = (0..10_000).map(|_| ContentId::generate()).collect();
        assert_eq!(ids.len(), 10_000, "Duplicate content IDs generated!");
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = ContentId::generate();
        let parsed: ContentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ContentId::parse(""), Err(IdError::Empty));
    }

    #[test]
    fn test_parse_too_short() {
        let err = ContentId::parse("short").unwrap_err();
        assert_eq!(err, IdError::TooShort { len: 5, min: MIN_LEN });
        assert!(err.is_length_error());
    }

    #[test]
    fn test_parse_invalid_character() {
        let err = ContentId::parse("abcd/efgh").unwrap_err();
        assert_eq!(
            err,
            IdError::InvalidCharacter {
                character: '/',
                position: 4
            }
        );
    }

    #[test]
    fn test_parse_rejects_url_unsafe_input() {
        for candidate in [
            "AAAAAAAA=",
            "AAAA AAAA",
            "AAAA+AAAA",
            "AAAA&x=1AA",
            "../../etc/passwd",
            "AAAAAAAA%00",
            "AAAAAAAé",
        ] {
            assert!(!is_valid(candidate), "{candidate:?} should be rejected");
        }
    }

    #[test]
    fn test_minimum_length_boundary() {
        assert!(!is_valid("AAAAAAA"));
        assert!(is_valid("AAAAAAAA"));
        assert!(is_valid(&"A".repeat(512)));
    }

    #[test]
    fn test_json_roundtrip() {
        let id = ContentId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: ContentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_json_rejects_invalid() {
        let result: Result<ContentId, _> = serde_json::from_str("\"bad id!\"");
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn prop_grammar_accepted(s in "[A-Za-z0-9_-]{8,64}") {
            prop_assert!(is_valid(&s));
        }

        #[test]
        fn prop_short_rejected(s in "[A-Za-z0-9_-]{0,7}") {
            prop_assert!(!is_valid(&s));
        }

        #[test]
        fn prop_foreign_char_rejected(
            head in "[A-Za-z0-9_-]{0,12}",
            bad in "[^A-Za-z0-9_-]",
            tail in "[A-Za-z0-9_-]{0,12}",
        ) {
            let candidate = format!("{head}{bad}{tail}");
            prop_assert!(!is_valid(&candidate));
        }
    }
}
