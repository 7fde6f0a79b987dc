pub mod config;
pub mod error;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use markdeck_core::algorithm::{sm2::Sm2, SpacedRepetitionAlgorithm};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub algorithm: Arc<dyn SpacedRepetitionAlgorithm>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            algorithm: Arc::new(Sm2::default()),
        }
    }
}

/// Build the router with all routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Content routes
        .route("/api/content/parse", post(routes::content::parse))
        // Deck routes
        .route("/api/decks", post(routes::decks::create))
        .route("/api/decks/parse", post(routes::decks::parse))
        .route("/api/decks/validate", post(routes::decks::validate_markdown))
        .route("/api/decks/export", post(routes::decks::export_markdown))
        // Review routes
        .route("/api/reviews/init", post(routes::reviews::init))
        .route("/api/reviews/next", post(routes::reviews::next))
        .route("/api/reviews/due", post(routes::reviews::due))
        .route("/api/reviews/retention", post(routes::reviews::retention))
        .route("/api/reviews/schedule", post(routes::reviews::schedule))
        .fallback(routes::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let addr = config.addr();
    tracing::info!(card_ids = ?config.card_ids, "Loaded configuration");

    let app = router(AppState::new(config));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
