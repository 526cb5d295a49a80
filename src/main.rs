use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{app, AppState};
use promptdesk_core::config::{auto_save_interval_from_env_value, database_url_from_env_value};
use promptdesk_core::CoreConfig;

/// Main entry point for the PromptDesk application
///
/// Opens the database, seeds the settings hub from the stored settings and serves the REST API
/// until ctrl-c. On shutdown every open draft session has its auto-save timer stopped.
///
/// # Environment Variables
/// - `PROMPTDESK_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PROMPTDESK_DATABASE_URL`: SQLite URL (default: "sqlite://promptdesk.db")
/// - `PROMPTDESK_AUTO_SAVE_SECS`: Draft session auto-save period in seconds (default: 300)
///
/// # Returns
/// * `Ok(())` - If the server starts, runs and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, database startup or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("promptdesk_run=info".parse()?)
                .add_directive("promptdesk_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("PROMPTDESK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::new(
        database_url_from_env_value(std::env::var("PROMPTDESK_DATABASE_URL").ok()),
        auto_save_interval_from_env_value(std::env::var("PROMPTDESK_AUTO_SAVE_SECS").ok())?,
    )?);

    tracing::info!("++ Opening database {}", cfg.database_url());
    let state = AppState::connect(cfg).await?;

    tracing::info!("++ Starting PromptDesk REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("++ Shutting down");
    state.shutdown_sessions().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {:?}", e);
        std::future::pending::<()>().await;
    }
}
