//! Request handlers, grouped by resource.

pub(crate) mod data;
pub(crate) mod drafts;
pub(crate) mod prompts;
pub(crate) mod sessions;
pub(crate) mod settings;

use crate::AppState;
use api_shared::{wire, HealthService};
use axum::{extract::State, http::StatusCode, response::Json};
use promptdesk_core::{PromptDeskError, RecordId};

/// Error half of every handler result.
pub type ApiError = (StatusCode, &'static str);

/// Log a core error and map it onto a status.
///
/// Missing targets are 404, rejected input is 400, and anything from the store is a generic 500.
pub(crate) fn map_error(context: &'static str, e: PromptDeskError) -> ApiError {
    match e {
        PromptDeskError::NotFound { .. } => {
            tracing::warn!("{} not found: {}", context, e);
            (StatusCode::NOT_FOUND, "Not found")
        }
        PromptDeskError::InvalidInput(_) => {
            tracing::warn!("{} rejected: {}", context, e);
            (StatusCode::BAD_REQUEST, "Invalid input")
        }
        _ => {
            tracing::error!("{} error: {:?}", context, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

pub(crate) fn parse_id(raw: &str) -> Result<RecordId, ApiError> {
    RecordId::parse(raw).map_err(|e| {
        tracing::warn!("Invalid record id {:?}: {}", raw, e);
        (StatusCode::BAD_REQUEST, "Invalid id")
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = wire::HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub(crate) async fn health(State(_state): State<AppState>) -> Json<wire::HealthRes> {
    Json(HealthService::check_health())
}
