//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you only want the REST server (with
//! OpenAPI/Swagger UI) and its own log filter. The workspace's main `promptdesk-run` binary serves
//! the same router.

use api_rest::{app, AppState};
use promptdesk_core::config::{auto_save_interval_from_env_value, database_url_from_env_value};
use promptdesk_core::CoreConfig;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the PromptDesk REST API server
///
/// # Environment Variables
/// - `PROMPTDESK_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `PROMPTDESK_DATABASE_URL`: SQLite URL (default: "sqlite://promptdesk.db")
/// - `PROMPTDESK_AUTO_SAVE_SECS`: Draft session auto-save period (default: 300)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the database cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("promptdesk_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("PROMPTDESK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::new(
        database_url_from_env_value(std::env::var("PROMPTDESK_DATABASE_URL").ok()),
        auto_save_interval_from_env_value(std::env::var("PROMPTDESK_AUTO_SAVE_SECS").ok())?,
    )?);

    let state = AppState::connect(cfg).await?;

    tracing::info!("-- Starting PromptDesk REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state.clone()))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    state.shutdown_sessions().await;
    Ok(())
}
