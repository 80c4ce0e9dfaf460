//! `GazaPay` voice banking backend
//!
//! Serves a rule-based dialogue state machine that turns speech transcripts
//! into transfer, withdraw, recharge and balance actions.

mod api;
mod dialogue;
mod session;

use api::{create_router, AppState};
use dialogue::DialogueConfig;
use session::{DialogueService, DEFAULT_SESSION_CAPACITY};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gazapay=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let port: u16 = std::env::var("GAZAPAY_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let capacity: usize = std::env::var("GAZAPAY_SESSION_CAPACITY")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(DEFAULT_SESSION_CAPACITY);

    let dialogue_config = match std::env::var("GAZAPAY_DIALOGUE_CONFIG") {
        Ok(path) => {
            tracing::info!(path = %path, "Loading dialogue config");
            DialogueConfig::load(&path)?
        }
        Err(_) => DialogueConfig::default(),
    };

    tracing::info!(
        session_capacity = capacity,
        mock_balance = dialogue_config.mock_balance,
        "Dialogue service initialized"
    );

    let state = AppState::new(DialogueService::new(dialogue_config, capacity));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("GazaPay dialogue server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
