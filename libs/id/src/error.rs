//! Error types for content ID parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or validating content IDs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The ID string is empty.
    #[error("ID cannot be empty")]
    Empty,

    /// The ID is shorter than the minimum length.
    #[error("ID too short: expected at least {min} characters, got {len}")]
    TooShort { len: usize, min: usize },

    /// The ID contains a character outside `[A-Za-z0-9_-]`.
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },
}

impl IdError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdError::Empty)
    }

    /// Returns true if this error indicates a length violation.
    pub fn is_length_error(&self) -> bool {
        matches!(self, IdError::Empty | IdError::TooShort { .. })
    }
}
