use super::{map_error, ApiError};
use crate::AppState;
use api_shared::wire;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use promptdesk_core::repositories::data::parse_bundle;

#[utoipa::path(
    get,
    path = "/data/export",
    params(wire::ExportQuery),
    responses(
        (status = 200, description = "Export bundle as a JSON or YAML attachment", body = wire::ExportBundle),
        (status = 500, description = "Internal server error")
    )
)]
/// Download every prompt, draft and the settings.
///
/// Without `format` the stored `exportFormat` setting decides.
#[axum::debug_handler]
pub(crate) async fn export_data(
    State(state): State<AppState>,
    Query(query): Query<wire::ExportQuery>,
) -> Result<Response, ApiError> {
    let (format, body) = state
        .data
        .export(query.format)
        .await
        .map_err(|e| map_error("Export data", e))?;

    let filename = format!(
        "promptdesk-export-{}.{}",
        chrono::Utc::now().format("%Y-%m-%d"),
        format.extension()
    );
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|e| {
            tracing::error!("Export header error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(format.content_type())),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/data/import",
    request_body(content = wire::ExportBundle, description = "A bundle produced by /data/export, JSON or YAML"),
    responses(
        (status = 200, description = "Import counts", body = wire::ImportRes),
        (status = 400, description = "Malformed or invalid bundle"),
        (status = 500, description = "Internal server error")
    )
)]
/// Restore a bundle in one transaction. Records are upserted by id with their own timestamps.
#[axum::debug_handler]
pub(crate) async fn import_data(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<wire::ImportRes>, ApiError> {
    let bundle = parse_bundle(&body, None).map_err(|e| {
        tracing::warn!("Import bundle rejected: {}", e);
        (StatusCode::BAD_REQUEST, "Invalid bundle")
    })?;

    state
        .data
        .import(bundle)
        .await
        .map(Json)
        .map_err(|e| map_error("Import data", e))
}

#[utoipa::path(
    delete,
    path = "/data",
    responses(
        (status = 200, description = "All data cleared", body = wire::MessageRes),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn clear_data(
    State(state): State<AppState>,
) -> Result<Json<wire::MessageRes>, ApiError> {
    match state.data.clear_all().await {
        Ok(()) => Ok(Json(wire::MessageRes {
            message: "All data cleared".into(),
        })),
        Err(e) => Err(map_error("Clear data", e)),
    }
}
