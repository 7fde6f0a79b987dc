//! Read-only queries over a set of review records.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CardReview;

/// Interval (days) above which a card counts as mastered.
pub const MASTERED_INTERVAL: u32 = 21;

/// Ease factor below which a card counts as struggling.
pub const STRUGGLING_EASE: f64 = 2.0;

/// Longest window `get_review_schedule` will build.
pub const MAX_SCHEDULE_DAYS: u32 = 366;

/// Aggregate retention figures for a set of cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionStats {
    pub total: usize,
    pub average_ease: f64,
    pub average_interval: f64,
    pub mastered: usize,
    pub struggling: usize,
    /// Successful repetitions / (successful repetitions + lapses), 0 when
    /// nothing has been reviewed.
    pub retention_rate: f64,
}

/// Number of reviews falling due on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub date: NaiveDate,
    pub count: usize,
}

/// Records whose next review is at or before `now`, in input order.
pub fn get_due_cards(reviews: &[CardReview], now: DateTime<Utc>) -> Vec<&CardReview> {
    reviews.iter().filter(|r| r.next_review <= now).collect()
}

pub fn calculate_retention(reviews: &[CardReview]) -> RetentionStats {
    if reviews.is_empty() {
        return RetentionStats {
            total: 0,
            average_ease: 2.5,
            average_interval: 0.0,
            mastered: 0,
            struggling: 0,
            retention_rate: 0.0,
        };
    }

    let total = reviews.len();
    let ease_sum: f64 = reviews.iter().map(|r| r.ease_factor).sum();
    let interval_sum: f64 = reviews.iter().map(|r| f64::from(r.interval)).sum();
    let successes: u64 = reviews.iter().map(|r| u64::from(r.repetitions)).sum();
    let lapses: u64 = reviews.iter().map(|r| u64::from(r.lapses)).sum();

    let retention_rate = if successes + lapses == 0 {
        0.0
    } else {
        successes as f64 / (successes + lapses) as f64
    };

    RetentionStats {
        total,
        average_ease: ease_sum / total as f64,
        average_interval: interval_sum / total as f64,
        mastered: reviews
            .iter()
            .filter(|r| r.interval > MASTERED_INTERVAL)
            .count(),
        struggling: reviews
            .iter()
            .filter(|r| r.ease_factor < STRUGGLING_EASE)
            .count(),
        retention_rate,
    }
}

/// Reviews due per UTC calendar day for `days` days starting today.
///
/// Every day in the window is present, with zero when nothing is due.
/// Reviews already overdue or beyond the window are not counted. The window
/// is capped at [`MAX_SCHEDULE_DAYS`] and ends early at the last
/// representable date.
pub fn get_review_schedule(
    reviews: &[CardReview],
    days: u32,
    now: DateTime<Utc>,
) -> Vec<ScheduleDay> {
    let today = now.date_naive();
    let mut schedule: Vec<ScheduleDay> = (0..days.min(MAX_SCHEDULE_DAYS))
        .map_while(|offset| today.checked_add_days(Days::new(u64::from(offset))))
        .map(|date| ScheduleDay { date, count: 0 })
        .collect();

    for review in reviews {
        let offset = (review.next_review.date_naive() - today).num_days();
        if let Ok(idx) = usize::try_from(offset) {
            if let Some(day) = schedule.get_mut(idx) {
                day.count += 1;
            }
        }
    }

    schedule
}
