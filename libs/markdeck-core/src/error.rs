//! Error types for markdeck-core.
//!
//! Parsing, validation and scheduling are infallible; errors only arise at
//! the edges where callers hand in unchecked values or try to persist a deck.

use thiserror::Error;

use crate::validator::ValidationReport;

/// Errors from review inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("quality {0} is out of range (expected 0-5)")]
    QualityOutOfRange(u8),
}

/// Errors when building or updating a deck.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("deck markdown is invalid ({} errors)", .0.error_count())]
    Invalid(ValidationReport),

    #[error("deck has no name and the markdown has no title")]
    MissingName,
}

/// Result type alias using DeckError.
pub type Result<T> = std::result::Result<T, DeckError>;
