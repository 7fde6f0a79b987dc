//! Core types for the flashcard pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

/// Kind of flashcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardType {
    Simple,
    MultipleChoice,
    TrueFalse,
}

impl CardType {
    /// Get the card type name as written in the dialect.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::MultipleChoice => "multiple-choice",
            Self::TrueFalse => "true-false",
        }
    }
}

/// A single choice of a multiple-choice card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardOption {
    pub text: String,
    pub is_correct: bool,
}

/// Difficulty hint attached by the author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Optional extra information about a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

/// A flashcard produced by the parser.
///
/// `front` and `back` are never empty. For multiple-choice cards `back` is
/// the text of the correct option and `options` holds at least two choices
/// with exactly one marked correct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<CardOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CardMetadata>,
    /// 1-based line of the card's defining line in the source markdown.
    pub line: usize,
}

impl Card {
    /// The correct option of a multiple-choice card.
    pub fn correct_option(&self) -> Option<&CardOption> {
        self.options
            .as_ref()
            .and_then(|options| options.iter().find(|o| o.is_correct))
    }

    /// Whether two cards carry the same content, ignoring id and position.
    pub fn same_content(&self, other: &Card) -> bool {
        self.front == other.front
            && self.back == other.back
            && self.card_type == other.card_type
            && self.category == other.category
            && self.options == other.options
    }
}

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    Error,
    Warning,
    Info,
}

/// A message about the markdown, optionally tied to a 1-based line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    #[serde(rename = "type")]
    pub kind: DiagnosticKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            kind: DiagnosticKind::Error,
            message: message.into(),
            line,
        }
    }

    pub fn warning(message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            kind: DiagnosticKind::Warning,
            message: message.into(),
            line,
        }
    }

    pub fn info(message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            kind: DiagnosticKind::Info,
            message: message.into(),
            line,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }
}

/// Spaced repetition state of one card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardReview {
    pub card_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
    pub next_review: DateTime<Utc>,
    /// Days until the next review, at least 1.
    pub interval: u32,
    /// Consecutive successful reviews since the last lapse.
    pub repetitions: u32,
    /// Never below 1.3.
    pub ease_factor: f64,
    pub lapses: u32,
}

/// Self-rated recall quality on the 0-5 SM-2 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;

    /// Create a quality rating, rejecting values above 5.
    pub fn new(value: u8) -> Result<Self, ReviewError> {
        if value > Self::MAX {
            return Err(ReviewError::QualityOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Ratings below 3 count as a lapse.
    pub fn is_success(self) -> bool {
        self.0 >= 3
    }
}

impl TryFrom<u8> for Quality {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Outcome of one quiz interaction, fed to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewPerformance {
    pub quality: Quality,
    /// Seconds spent answering.
    pub time_spent: f64,
    #[serde(default)]
    pub hints_used: bool,
}
