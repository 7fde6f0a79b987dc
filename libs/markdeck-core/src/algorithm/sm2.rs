//! SM-2 spaced repetition algorithm.
//!
//! Based on SuperMemo 2 with an adjustment for answer time: very fast
//! answers shorten the next interval, very slow answers lengthen it.

use super::SpacedRepetitionAlgorithm;
use crate::types::{CardReview, ReviewPerformance};
use chrono::{DateTime, Duration, Utc};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    /// Ease subtracted on a lapse.
    pub lapse_penalty: f64,
    /// Answers faster than this (seconds) scale the interval by `fast_multiplier`.
    pub fast_answer_secs: f64,
    /// Answers slower than this (seconds) scale the interval by `slow_multiplier`.
    pub slow_answer_secs: f64,
    pub fast_multiplier: f64,
    pub slow_multiplier: f64,
    /// Upper bound on the interval in days.
    pub maximum_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            lapse_penalty: 0.2,
            fast_answer_secs: 5.0,
            slow_answer_secs: 30.0,
            fast_multiplier: 0.8,
            slow_multiplier: 1.2,
            maximum_interval: 36_500,
        }
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initialize(&self, card_id: &str, now: DateTime<Utc>) -> CardReview {
        CardReview {
            card_id: card_id.to_string(),
            last_review: None,
            next_review: days_after(now, 1),
            interval: 1,
            repetitions: 0,
            ease_factor: self.initial_ease,
            lapses: 0,
        }
    }

    fn schedule(
        &self,
        current: &CardReview,
        performance: &ReviewPerformance,
        now: DateTime<Utc>,
    ) -> CardReview {
        if !performance.quality.is_success() {
            return CardReview {
                card_id: current.card_id.clone(),
                last_review: Some(now),
                next_review: days_after(now, 1),
                interval: 1,
                repetitions: 0,
                ease_factor: (current.ease_factor - self.lapse_penalty).max(self.minimum_ease),
                lapses: current.lapses.saturating_add(1),
            };
        }

        let ease_factor = self.next_ease(current.ease_factor, performance.quality.value());
        let interval = match current.repetitions {
            0 => 1,
            1 => 6,
            _ => round_days(f64::from(current.interval) * ease_factor),
        };
        let interval = self
            .adjust_for_time(interval, performance.time_spent)
            .min(self.maximum_interval.max(1));

        CardReview {
            card_id: current.card_id.clone(),
            last_review: Some(now),
            next_review: days_after(now, interval),
            interval,
            repetitions: current.repetitions.saturating_add(1),
            ease_factor,
            lapses: current.lapses,
        }
    }
}

impl Sm2 {
    /// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), floored.
    fn next_ease(&self, ease: f64, quality: u8) -> f64 {
        let miss = f64::from(5 - quality);
        (ease + (0.1 - miss * (0.08 + miss * 0.02))).max(self.minimum_ease)
    }

    fn adjust_for_time(&self, interval: u32, time_spent: f64) -> u32 {
        if time_spent < self.fast_answer_secs {
            round_days(f64::from(interval) * self.fast_multiplier)
        } else if time_spent > self.slow_answer_secs {
            round_days(f64::from(interval) * self.slow_multiplier)
        } else {
            interval
        }
    }
}

/// `now` plus whole days, saturating at the latest representable time.
fn days_after(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Round to whole days, never below one.
fn round_days(days: f64) -> u32 {
    let rounded = days.round();
    if rounded < 1.0 {
        1
    } else if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}
