//! Spaced repetition scheduling.

pub mod sm2;

use crate::types::{CardReview, ReviewPerformance};
use chrono::{DateTime, Utc};

/// Trait for spaced repetition algorithms.
///
/// Implementations are pure: the result depends only on the arguments.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Review record for a card that has never been reviewed.
    fn initialize(&self, card_id: &str, now: DateTime<Utc>) -> CardReview;

    /// Calculate the next review record after a review.
    fn schedule(
        &self,
        current: &CardReview,
        performance: &ReviewPerformance,
        now: DateTime<Utc>,
    ) -> CardReview;
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "sm2" => Some(Box::new(sm2::Sm2::default())),
        _ => None,
    }
}

/// Fresh review record using the default SM-2 parameters.
pub fn initialize_card(card_id: &str, now: DateTime<Utc>) -> CardReview {
    sm2::Sm2::default().initialize(card_id, now)
}

/// Next review record using the default SM-2 parameters.
pub fn calculate_next_review(
    current: &CardReview,
    performance: &ReviewPerformance,
    now: DateTime<Utc>,
) -> CardReview {
    sm2::Sm2::default().schedule(current, performance, now)
}
