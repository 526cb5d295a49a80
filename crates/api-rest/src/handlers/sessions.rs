//! Draft editing sessions over HTTP.
//!
//! A session lives in server memory from `POST /sessions` until `DELETE /sessions/{id}` or server
//! shutdown. A session no client has touched for three auto-save periods is closed as well.
//! Field edits are held in the session; only save, create and delete reach the database.

use super::{map_error, parse_id, ApiError};
use crate::AppState;
use api_shared::wire;
use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
};
use promptdesk_core::{DraftSession, SaveTrigger};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session opened with the stored drafts loaded", body = wire::SessionRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Open a session: load every draft and start the auto-save timer.
#[axum::debug_handler]
pub(crate) async fn open_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<wire::SessionRes>), ApiError> {
    let session = DraftSession::open(
        Arc::new(state.drafts.clone()),
        Some(state.hub.subscribe()),
        state.cfg.auto_save_interval(),
    )
    .await
    .map_err(|e| map_error("Open session", e))?;

    let snapshot = session.snapshot().await;
    state
        .sessions
        .write()
        .await
        .insert(session.id(), Arc::new(session));

    Ok((StatusCode::CREATED, Json(snapshot)))
}

#[utoipa::path(
    get,
    path = "/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session state", body = wire::SessionRes),
        (status = 404, description = "Session not found")
    )
)]
#[axum::debug_handler]
pub(crate) async fn get_session(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<wire::SessionRes>, ApiError> {
    let session = state.session(parse_id(&id)?).await?;
    Ok(Json(session.snapshot().await))
}

#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session closed; unsaved edits are discarded", body = wire::MessageRes),
        (status = 404, description = "Session not found")
    )
)]
#[axum::debug_handler]
pub(crate) async fn close_session(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<wire::MessageRes>, ApiError> {
    let id = parse_id(&id)?;
    let session = state
        .sessions
        .write()
        .await
        .remove(&id)
        .ok_or((StatusCode::NOT_FOUND, "Session not found"))?;

    session.shutdown().await;
    Ok(Json(wire::MessageRes {
        message: "Session closed".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/drafts",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 201, description = "New draft created and selected", body = wire::Draft),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn create_session_draft(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<(StatusCode, Json<wire::Draft>), ApiError> {
    let session = state.session(parse_id(&id)?).await?;
    match session.create_new_draft().await {
        Ok(draft) => Ok((StatusCode::CREATED, Json(draft))),
        Err(e) => Err(map_error("Create session draft", e)),
    }
}

#[utoipa::path(
    patch,
    path = "/sessions/{id}/drafts/{draft_id}",
    params(
        ("id" = String, Path, description = "Session id"),
        ("draft_id" = String, Path, description = "Draft id")
    ),
    request_body = wire::UpdateDraftFieldReq,
    responses(
        (status = 200, description = "Edited draft with its recomputed dirty flag", body = wire::DraftState),
        (status = 404, description = "Session or draft not found")
    )
)]
#[axum::debug_handler]
pub(crate) async fn update_session_draft(
    State(state): State<AppState>,
    AxumPath((id, draft_id)): AxumPath<(String, String)>,
    Json(req): Json<wire::UpdateDraftFieldReq>,
) -> Result<Json<wire::DraftState>, ApiError> {
    let session = state.session(parse_id(&id)?).await?;
    session
        .update_draft(parse_id(&draft_id)?, req.field, req.value)
        .await
        .map(Json)
        .map_err(|e| map_error("Update session draft", e))
}

#[utoipa::path(
    delete,
    path = "/sessions/{id}/drafts/{draft_id}",
    params(
        ("id" = String, Path, description = "Session id"),
        ("draft_id" = String, Path, description = "Draft id")
    ),
    responses(
        (status = 200, description = "Draft deleted from the store and the session", body = wire::SessionRes),
        (status = 404, description = "Session or draft not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn delete_session_draft(
    State(state): State<AppState>,
    AxumPath((id, draft_id)): AxumPath<(String, String)>,
) -> Result<Json<wire::SessionRes>, ApiError> {
    let session = state.session(parse_id(&id)?).await?;
    session
        .delete_draft(parse_id(&draft_id)?)
        .await
        .map_err(|e| map_error("Delete session draft", e))?;
    Ok(Json(session.snapshot().await))
}

#[utoipa::path(
    put,
    path = "/sessions/{id}/active",
    params(("id" = String, Path, description = "Session id")),
    request_body = wire::SetActiveDraftReq,
    responses(
        (status = 200, description = "Selection changed", body = wire::SessionRes),
        (status = 404, description = "Session or draft not found")
    )
)]
#[axum::debug_handler]
pub(crate) async fn set_active_draft(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<wire::SetActiveDraftReq>,
) -> Result<Json<wire::SessionRes>, ApiError> {
    let session = state.session(parse_id(&id)?).await?;
    session
        .set_active(req.draft_id)
        .await
        .map_err(|e| map_error("Set active draft", e))?;
    Ok(Json(session.snapshot().await))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/save",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Every draft saved; all clean", body = wire::SessionRes),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Save failed; session unchanged")
    )
)]
#[axum::debug_handler]
pub(crate) async fn save_session(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<wire::SessionRes>, ApiError> {
    let session = state.session(parse_id(&id)?).await?;
    session
        .save_all(SaveTrigger::Manual)
        .await
        .map_err(|e| map_error("Save session", e))?;
    Ok(Json(session.snapshot().await))
}
