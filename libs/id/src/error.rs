//! Error types for ID parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or validating IDs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The ID string is empty.
    #[error("ID cannot be empty")]
    Empty,

    /// The ID is longer than [`crate::MAX_ID_LEN`].
    #[error("ID too long: {len} bytes (max {max})")]
    TooLong { len: usize, max: usize },

    /// The ID contains a character reserved by the list encodings.
    #[error("invalid character {ch:?} in {kind} ID '{id}'")]
    InvalidCharacter {
        kind: &'static str,
        id: String,
        ch: char,
    },
}

impl IdError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdError::Empty)
    }
}
