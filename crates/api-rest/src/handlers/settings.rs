use super::{map_error, ApiError};
use crate::AppState;
use api_shared::wire;
use axum::{extract::State, response::Json};

#[utoipa::path(
    get,
    path = "/settings",
    responses(
        (status = 200, description = "Current settings (defaults are created on first read)", body = wire::SettingsRecord),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<wire::SettingsRecord>, ApiError> {
    state
        .settings
        .get()
        .await
        .map(Json)
        .map_err(|e| map_error("Get settings", e))
}

#[utoipa::path(
    put,
    path = "/settings",
    request_body = wire::SettingsPatch,
    responses(
        (status = 200, description = "Settings updated", body = wire::SettingsRecord),
        (status = 400, description = "Value out of range"),
        (status = 500, description = "Internal server error")
    )
)]
/// Merge the given fields into the stored settings.
///
/// `id`, `createdAt` and `updatedAt` in the body are ignored. Open draft sessions see the new
/// values immediately.
#[axum::debug_handler]
pub(crate) async fn update_settings(
    State(state): State<AppState>,
    Json(patch): Json<wire::SettingsPatch>,
) -> Result<Json<wire::SettingsRecord>, ApiError> {
    state
        .settings
        .update(patch)
        .await
        .map(Json)
        .map_err(|e| map_error("Update settings", e))
}
