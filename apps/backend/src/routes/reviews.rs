//! Review scheduling endpoints
//!
//! Records are supplied by the caller and returned updated; nothing is
//! stored here.

use axum::{extract::State, Json};
use chrono::Utc;
use markdeck_core::{calculate_retention, get_due_cards, get_review_schedule};

use crate::config::MAX_SCHEDULE_DAYS;
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// POST /api/reviews/init
pub async fn init(
    State(state): State<AppState>,
    Json(request): Json<InitReviewRequest>,
) -> Result<Json<CardReview>> {
    if request.card_id.trim().is_empty() {
        return Err(ApiError::BadRequest("card_id must not be empty".to_string()));
    }
    let now = request.now.unwrap_or_else(Utc::now);
    Ok(Json(state.algorithm.initialize(&request.card_id, now)))
}

/// POST /api/reviews/next
pub async fn next(
    State(state): State<AppState>,
    Json(request): Json<NextReviewRequest>,
) -> Result<Json<CardReview>> {
    let performance = ReviewPerformance::try_from(request.performance)?;
    let now = request.now.unwrap_or_else(Utc::now);

    let updated = state.algorithm.schedule(&request.review, &performance, now);
    tracing::debug!(
        card = %updated.card_id,
        quality = performance.quality.value(),
        interval = updated.interval,
        "scheduled review"
    );
    Ok(Json(updated))
}

/// POST /api/reviews/due
pub async fn due(Json(request): Json<ReviewSetRequest>) -> Json<DueReviewsResponse> {
    let now = request.now.unwrap_or_else(Utc::now);
    let due: Vec<CardReview> = get_due_cards(&request.reviews, now)
        .into_iter()
        .cloned()
        .collect();

    Json(DueReviewsResponse {
        count: due.len(),
        due,
    })
}

/// POST /api/reviews/retention
pub async fn retention(Json(request): Json<ReviewSetRequest>) -> Json<RetentionStats> {
    Json(calculate_retention(&request.reviews))
}

/// POST /api/reviews/schedule
pub async fn schedule(
    State(state): State<AppState>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>> {
    let days = request.days.unwrap_or(state.config.schedule_days);
    if days > MAX_SCHEDULE_DAYS {
        return Err(ApiError::BadRequest(format!(
            "days must be at most {}",
            MAX_SCHEDULE_DAYS
        )));
    }
    let now = request.now.unwrap_or_else(Utc::now);

    Ok(Json(ScheduleResponse {
        days: get_review_schedule(&request.reviews, days, now),
    }))
}
