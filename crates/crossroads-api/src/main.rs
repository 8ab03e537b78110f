//! Crossroads API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crossroads_api::config::AppConfig;
use crossroads_api::error::AppError;
use crossroads_api::routes;
use crossroads_api::state::AppState;
use crossroads_content::Deck;
use crossroads_core::clock::SystemClock;
use crossroads_event_store::MemoryEventRepository;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Crossroads API server");

    let config = AppConfig::from_env()?;

    // Load the scenario deck once at process start.
    let deck = match &config.deck_path {
        Some(path) => {
            let source = std::fs::read_to_string(path).map_err(|e| {
                AppError::Config(format!("DECK_PATH {} is unreadable: {e}", path.display()))
            })?;
            Deck::from_yaml(&source)?
        }
        None => Deck::builtin(),
    };
    tracing::info!(
        title = deck.title(),
        scenarios = deck.scenario_count(),
        version_hash = deck.version_hash(),
        "deck loaded"
    );

    // Build application state over the process-local event store.
    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(MemoryEventRepository::new()),
        Arc::new(deck),
        config.advance_mode,
    );

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/sessions", routes::session::router())
        .nest("/api/v1/results", routes::results::router())
        .nest("/api/v1/content", routes::content::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
