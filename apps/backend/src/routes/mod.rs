//! HTTP route handlers

pub mod content;
pub mod decks;
pub mod reviews;

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for unknown paths
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
