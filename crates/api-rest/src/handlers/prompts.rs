use super::{map_error, parse_id, ApiError};
use crate::AppState;
use api_shared::wire;
use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::Json,
};

#[utoipa::path(
    get,
    path = "/prompts",
    params(wire::ListPromptsQuery),
    responses(
        (status = 200, description = "Matching prompts, most recently updated first", body = [wire::Prompt]),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_prompts(
    State(state): State<AppState>,
    Query(query): Query<wire::ListPromptsQuery>,
) -> Result<Json<Vec<wire::Prompt>>, ApiError> {
    state
        .prompts
        .list(&query)
        .await
        .map(Json)
        .map_err(|e| map_error("List prompts", e))
}

#[utoipa::path(
    post,
    path = "/prompts",
    request_body = wire::CreatePromptReq,
    responses(
        (status = 201, description = "Prompt created", body = wire::Prompt),
        (status = 400, description = "Title and content are required"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn create_prompt(
    State(state): State<AppState>,
    Json(req): Json<wire::CreatePromptReq>,
) -> Result<(StatusCode, Json<wire::Prompt>), ApiError> {
    match state.prompts.create(req).await {
        Ok(prompt) => Ok((StatusCode::CREATED, Json(prompt))),
        Err(e) => Err(map_error("Create prompt", e)),
    }
}

#[utoipa::path(
    get,
    path = "/prompts/{id}",
    params(("id" = String, Path, description = "Prompt id")),
    responses(
        (status = 200, description = "The prompt", body = wire::Prompt),
        (status = 404, description = "Prompt not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn get_prompt(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<wire::Prompt>, ApiError> {
    let id = parse_id(&id)?;
    state
        .prompts
        .get(id)
        .await
        .map(Json)
        .map_err(|e| map_error("Get prompt", e))
}

#[utoipa::path(
    put,
    path = "/prompts/{id}",
    params(("id" = String, Path, description = "Prompt id")),
    request_body = wire::UpdatePromptReq,
    responses(
        (status = 200, description = "Prompt updated", body = wire::Prompt),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Prompt not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Partial update; absent fields keep their stored values.
#[axum::debug_handler]
pub(crate) async fn update_prompt(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<wire::UpdatePromptReq>,
) -> Result<Json<wire::Prompt>, ApiError> {
    let id = parse_id(&id)?;
    state
        .prompts
        .update(id, req)
        .await
        .map(Json)
        .map_err(|e| map_error("Update prompt", e))
}

#[utoipa::path(
    delete,
    path = "/prompts/{id}",
    params(("id" = String, Path, description = "Prompt id")),
    responses(
        (status = 200, description = "Prompt deleted", body = wire::MessageRes),
        (status = 404, description = "Prompt not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn delete_prompt(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<wire::MessageRes>, ApiError> {
    let id = parse_id(&id)?;
    match state.prompts.delete(id).await {
        Ok(()) => Ok(Json(wire::MessageRes {
            message: "Prompt deleted successfully".into(),
        })),
        Err(e) => Err(map_error("Delete prompt", e)),
    }
}

#[utoipa::path(
    post,
    path = "/prompts/{id}/favorite",
    params(("id" = String, Path, description = "Prompt id")),
    responses(
        (status = 200, description = "Favourite flag flipped", body = wire::Prompt),
        (status = 404, description = "Prompt not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn toggle_favorite(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<wire::Prompt>, ApiError> {
    let id = parse_id(&id)?;
    state
        .prompts
        .toggle_favorite(id)
        .await
        .map(Json)
        .map_err(|e| map_error("Toggle favorite", e))
}
