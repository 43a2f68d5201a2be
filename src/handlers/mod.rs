// Handlers module
// HTTP handlers for the REST API

pub mod auth;
pub mod catalog;
pub mod lists;
pub mod progress;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{debug, warn};

use crate::{error::ApiError, state::AppState};

/// Body of an `Option<Json<T>>` extractor. A missing, non-JSON or mistyped body
/// becomes a validation error with `message` instead of axum's plain-text rejection.
pub(crate) fn require_payload<T>(payload: Option<Json<T>>, message: &str) -> Result<T, ApiError> {
    match payload {
        Some(Json(payload)) => Ok(payload),
        None => {
            debug!("Rejected request body: {}", message);
            Err(ApiError::validation(message))
        }
    }
}

/// Health check handler
/// Returns "OK" while the storage backend answers, 503 otherwise
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
        }
    }
}
