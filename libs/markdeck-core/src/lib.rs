//! Core flashcard library: turns deck markdown into cards and schedules
//! their reviews.
//!
//! Provides:
//! - Inline content tokenizer for safe rendering of card text
//! - Line grammar shared by the card parser and the validator
//! - Lenient markdown-to-card parser and strict validator
//! - SM-2 scheduling with answer-time adjustment
//! - Queries over review records (due cards, retention, schedule)
//! - Decks with validated creation and markdown export

pub mod algorithm;
pub mod content;
pub mod deck;
pub mod error;
pub mod export;
pub mod grammar;
pub mod ids;
pub mod parser;
pub mod review;
pub mod types;
pub mod validator;

pub use algorithm::{calculate_next_review, initialize_card, SpacedRepetitionAlgorithm};
pub use content::{parse_content, ContentPart, ContentParts};
pub use deck::{Deck, DeckInfo, DeckSettings};
pub use error::{DeckError, ReviewError};
pub use ids::CardIdStrategy;
pub use parser::{parse, parse_document, ParseOptions, ParsedDocument};
pub use review::{
    calculate_retention, get_due_cards, get_review_schedule, RetentionStats, ScheduleDay,
    MAX_SCHEDULE_DAYS,
};
pub use types::{
    Card, CardMetadata, CardOption, CardReview, CardType, Diagnostic, DiagnosticKind, Difficulty,
    Quality, ReviewPerformance,
};
pub use validator::{validate, validate_with, ValidationLimits, ValidationReport};
