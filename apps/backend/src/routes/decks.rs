//! Deck endpoints

use axum::{extract::State, Json};
use chrono::Utc;
use markdeck_core::{export, parse_document, validate, DiagnosticKind, ParseOptions};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

fn parse_options(state: &AppState, requested: Option<CardIdStrategy>) -> ParseOptions {
    ParseOptions {
        id_strategy: requested.unwrap_or_else(|| state.config.card_ids.clone()),
    }
}

/// POST /api/decks/parse
pub async fn parse(
    State(state): State<AppState>,
    Json(request): Json<DeckMarkdownRequest>,
) -> Json<ParsedDocument> {
    let options = parse_options(&state, request.id_strategy);
    Json(parse_document(&request.markdown, &options))
}

/// POST /api/decks/validate
pub async fn validate_markdown(Json(request): Json<DeckMarkdownRequest>) -> Json<ValidationReport> {
    Json(validate(&request.markdown))
}

/// POST /api/decks
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateDeckRequest>,
) -> Result<Json<CreateDeckResponse>> {
    let options = parse_options(&state, request.id_strategy);
    let (deck, report) = Deck::from_markdown(request.info, &request.markdown, &options, Utc::now())
        .inspect_err(|e| tracing::info!(error = %e, "rejected deck"))?;

    tracing::info!(deck = %deck.id, cards = deck.cards.len(), "created deck");

    let diagnostics = report
        .diagnostics
        .into_iter()
        .filter(|d| d.kind != DiagnosticKind::Error)
        .collect();
    Ok(Json(CreateDeckResponse { deck, diagnostics }))
}

/// POST /api/decks/export
pub async fn export_markdown(Json(request): Json<ExportDeckRequest>) -> Json<ExportDeckResponse> {
    Json(ExportDeckResponse {
        markdown: export::to_markdown(request.title.as_deref(), &request.cards),
    })
}
