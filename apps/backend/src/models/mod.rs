//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export shared types from markdeck-core
pub use markdeck_core::{
    Card, CardIdStrategy, CardReview, ContentPart, Deck, DeckInfo, Diagnostic, ParsedDocument,
    Quality, RetentionStats, ReviewPerformance, ScheduleDay, ValidationReport,
};

use crate::error::ApiError;

// === Content ===

#[derive(Debug, Clone, Deserialize)]
pub struct ParseContentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseContentResponse {
    pub parts: Vec<ContentPart>,
}

// === Decks ===

/// Markdown submitted for parsing or validation.
#[derive(Debug, Clone, Deserialize)]
pub struct DeckMarkdownRequest {
    pub markdown: String,
    #[serde(default)]
    pub id_strategy: Option<CardIdStrategy>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeckRequest {
    #[serde(flatten)]
    pub info: DeckInfo,
    pub markdown: String,
    #[serde(default)]
    pub id_strategy: Option<CardIdStrategy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeckResponse {
    pub deck: Deck,
    /// Warnings and info from validation; errors reject the request.
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportDeckRequest {
    #[serde(default)]
    pub title: Option<String>,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDeckResponse {
    pub markdown: String,
}

// === Reviews ===

#[derive(Debug, Clone, Deserialize)]
pub struct InitReviewRequest {
    pub card_id: String,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// Review outcome as sent by clients; quality is range-checked on conversion.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PerformanceInput {
    pub quality: u8,
    pub time_spent: f64,
    #[serde(default)]
    pub hints_used: bool,
}

impl TryFrom<PerformanceInput> for ReviewPerformance {
    type Error = ApiError;

    fn try_from(input: PerformanceInput) -> Result<Self, Self::Error> {
        if !input.time_spent.is_finite() || input.time_spent < 0.0 {
            return Err(ApiError::BadRequest(format!(
                "time_spent must be a non-negative number of seconds, got {}",
                input.time_spent
            )));
        }
        Ok(ReviewPerformance {
            quality: Quality::new(input.quality)?,
            time_spent: input.time_spent,
            hints_used: input.hints_used,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NextReviewRequest {
    pub review: CardReview,
    pub performance: PerformanceInput,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// A set of review records to query.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSetRequest {
    pub reviews: Vec<CardReview>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueReviewsResponse {
    pub count: usize,
    pub due: Vec<CardReview>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRequest {
    pub reviews: Vec<CardReview>,
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub days: Vec<ScheduleDay>,
}
