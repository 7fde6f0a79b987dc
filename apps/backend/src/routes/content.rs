//! Content endpoints

use axum::Json;
use markdeck_core::parse_content;

use crate::models::*;

/// POST /api/content/parse
pub async fn parse(Json(request): Json<ParseContentRequest>) -> Json<ParseContentResponse> {
    Json(ParseContentResponse {
        parts: parse_content(&request.content),
    })
}
