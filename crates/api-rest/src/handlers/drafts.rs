use super::{map_error, parse_id, ApiError};
use crate::AppState;
use api_shared::wire;
use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
};

#[utoipa::path(
    get,
    path = "/drafts",
    responses(
        (status = 200, description = "All drafts, most recently updated first", body = [wire::Draft]),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_drafts(
    State(state): State<AppState>,
) -> Result<Json<Vec<wire::Draft>>, ApiError> {
    state
        .drafts
        .list()
        .await
        .map(Json)
        .map_err(|e| map_error("List drafts", e))
}

#[utoipa::path(
    post,
    path = "/drafts",
    request_body = wire::CreateDraftReq,
    responses(
        (status = 201, description = "Draft created", body = wire::Draft),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn create_draft(
    State(state): State<AppState>,
    Json(req): Json<wire::CreateDraftReq>,
) -> Result<(StatusCode, Json<wire::Draft>), ApiError> {
    match state.drafts.create(req).await {
        Ok(draft) => Ok((StatusCode::CREATED, Json(draft))),
        Err(e) => Err(map_error("Create draft", e)),
    }
}

#[utoipa::path(
    put,
    path = "/drafts",
    request_body = wire::SaveDraftsReq,
    responses(
        (status = 200, description = "Drafts saved in one transaction, in request order", body = [wire::Draft]),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
/// Batch save
///
/// Updates drafts whose id exists and inserts the rest with the given id. Either every draft is
/// written or none is.
#[axum::debug_handler]
pub(crate) async fn save_drafts(
    State(state): State<AppState>,
    Json(req): Json<wire::SaveDraftsReq>,
) -> Result<Json<Vec<wire::Draft>>, ApiError> {
    state
        .drafts
        .batch_upsert(req.drafts)
        .await
        .map(Json)
        .map_err(|e| map_error("Save drafts", e))
}

#[utoipa::path(
    delete,
    path = "/drafts/{id}",
    params(("id" = String, Path, description = "Draft id")),
    responses(
        (status = 200, description = "Draft deleted", body = wire::MessageRes),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Draft not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn delete_draft(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<wire::MessageRes>, ApiError> {
    let id = parse_id(&id)?;
    match state.drafts.delete(id).await {
        Ok(()) => Ok(Json(wire::MessageRes {
            message: "Draft deleted successfully".into(),
        })),
        Err(e) => Err(map_error("Delete draft", e)),
    }
}
