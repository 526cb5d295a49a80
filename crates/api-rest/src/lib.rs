//! # API REST
//!
//! REST API implementation for PromptDesk.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for wire types and `promptdesk-core` for everything else.

#![warn(rust_2018_idioms)]

mod handlers;

use axum::{
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};
use promptdesk_core::{
    db, CoreConfig, DataService, DraftRepository, DraftSession, PromptDeskError,
    PromptService, RecordId, SettingsHub, SettingsService,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::wire;

pub use handlers::ApiError;

/// Application state shared across REST API handlers
///
/// Services are cheap to clone (they share one connection pool). Open draft sessions are kept
/// by id until deleted, until they sit idle past the configured timeout, or until
/// [`AppState::shutdown_sessions`] runs.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    hub: SettingsHub,
    drafts: DraftRepository,
    prompts: PromptService,
    settings: SettingsService,
    data: DataService,
    sessions: Arc<RwLock<HashMap<RecordId, Arc<DraftSession>>>>,
    sweeper: CancellationToken,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, pool: db::SqlitePool, hub: SettingsHub) -> Self {
        Self {
            cfg,
            drafts: DraftRepository::new(pool.clone()),
            prompts: PromptService::new(pool.clone()),
            settings: SettingsService::new(pool.clone(), hub.clone()),
            data: DataService::new(pool, hub.clone()),
            hub,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            sweeper: CancellationToken::new(),
        }
    }

    /// Connect to the configured database, seed the settings hub from the stored settings and
    /// start the idle session sweeper.
    pub async fn connect(cfg: Arc<CoreConfig>) -> Result<Self, PromptDeskError> {
        let pool = db::connect(&cfg).await?;
        let hub = SettingsHub::default();
        let state = Self::new(cfg, pool, hub);
        let stored = state.settings.get().await?;
        state.hub.publish(stored.settings);
        state.spawn_idle_sweeper();
        Ok(state)
    }

    /// Every auto-save period, close sessions idle for longer than the configured timeout.
    ///
    /// Runs until [`AppState::shutdown_sessions`].
    pub fn spawn_idle_sweeper(&self) {
        let state = self.clone();
        let token = self.sweeper.clone();
        let period = self.cfg.auto_save_interval();
        let max_idle = self.cfg.session_idle_timeout();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(max_idle_secs = max_idle.as_secs(), "-- Idle session sweeper started");

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        state.expire_idle_sessions(max_idle).await;
                    }
                }
            }
        });
    }

    /// Close and forget every session idle for at least `max_idle`. Unsaved edits are dropped.
    pub async fn expire_idle_sessions(&self, max_idle: Duration) -> usize {
        let expired: Vec<Arc<DraftSession>> = {
            let mut sessions = self.sessions.write().await;
            let ids: Vec<RecordId> = sessions
                .iter()
                .filter(|(_, session)| session.idle_for() >= max_idle)
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| sessions.remove(id)).collect()
        };

        for session in &expired {
            session.shutdown().await;
            tracing::info!(session_id = %session.id(), "-- Closed idle draft session");
        }
        expired.len()
    }

    pub fn settings_hub(&self) -> &SettingsHub {
        &self.hub
    }

    pub async fn open_session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Stop the idle sweeper and the auto-save timer of every open session, then forget them.
    pub async fn shutdown_sessions(&self) {
        self.sweeper.cancel();
        let sessions: Vec<Arc<DraftSession>> =
            self.sessions.write().await.drain().map(|(_, s)| s).collect();
        let count = sessions.len();
        for session in sessions {
            session.shutdown().await;
        }
        tracing::info!(count, "-- Closed draft sessions");
    }

    /// Look up an open session and mark it active.
    async fn session(&self, id: RecordId) -> Result<Arc<DraftSession>, ApiError> {
        let session = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or((StatusCode::NOT_FOUND, "Session not found"))?;
        session.touch();
        Ok(session)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::drafts::list_drafts,
        handlers::drafts::create_draft,
        handlers::drafts::save_drafts,
        handlers::drafts::delete_draft,
        handlers::prompts::list_prompts,
        handlers::prompts::create_prompt,
        handlers::prompts::get_prompt,
        handlers::prompts::update_prompt,
        handlers::prompts::delete_prompt,
        handlers::prompts::toggle_favorite,
        handlers::settings::get_settings,
        handlers::settings::update_settings,
        handlers::data::export_data,
        handlers::data::import_data,
        handlers::data::clear_data,
        handlers::sessions::open_session,
        handlers::sessions::get_session,
        handlers::sessions::close_session,
        handlers::sessions::create_session_draft,
        handlers::sessions::update_session_draft,
        handlers::sessions::delete_session_draft,
        handlers::sessions::set_active_draft,
        handlers::sessions::save_session,
    ),
    components(schemas(
        wire::HealthRes,
        wire::MessageRes,
        wire::Draft,
        wire::DraftState,
        wire::CreateDraftReq,
        wire::DraftInput,
        wire::SaveDraftsReq,
        wire::DraftField,
        wire::UpdateDraftFieldReq,
        wire::SetActiveDraftReq,
        wire::SessionRes,
        wire::Prompt,
        wire::CreatePromptReq,
        wire::UpdatePromptReq,
        wire::Settings,
        wire::SettingsRecord,
        wire::SettingsPatch,
        wire::ExportFormat,
        wire::ExportBundle,
        wire::ImportRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with OpenAPI docs and permissive CORS.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/drafts",
            get(handlers::drafts::list_drafts)
                .post(handlers::drafts::create_draft)
                .put(handlers::drafts::save_drafts),
        )
        .route("/drafts/:id", delete(handlers::drafts::delete_draft))
        .route(
            "/prompts",
            get(handlers::prompts::list_prompts).post(handlers::prompts::create_prompt),
        )
        .route(
            "/prompts/:id",
            get(handlers::prompts::get_prompt)
                .put(handlers::prompts::update_prompt)
                .delete(handlers::prompts::delete_prompt),
        )
        .route(
            "/prompts/:id/favorite",
            post(handlers::prompts::toggle_favorite),
        )
        .route(
            "/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .route("/data", delete(handlers::data::clear_data))
        .route("/data/export", get(handlers::data::export_data))
        .route("/data/import", post(handlers::data::import_data))
        .route("/sessions", post(handlers::sessions::open_session))
        .route(
            "/sessions/:id",
            get(handlers::sessions::get_session).delete(handlers::sessions::close_session),
        )
        .route(
            "/sessions/:id/drafts",
            post(handlers::sessions::create_session_draft),
        )
        .route(
            "/sessions/:id/drafts/:draft_id",
            axum::routing::patch(handlers::sessions::update_session_draft)
                .delete(handlers::sessions::delete_session_draft),
        )
        .route("/sessions/:id/active", put(handlers::sessions::set_active_draft))
        .route("/sessions/:id/save", post(handlers::sessions::save_session))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
