// Vocabulary list handlers
// The signed-in user's own word lists and their practice sessions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    error::ApiError,
    handlers::require_payload,
    models::{
        CreateListRequest, ListSummary, PracticeRequest, PracticeSession, ProgressColor,
    },
    state::AppState,
};

fn parse_list_id(list_id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(list_id.trim())
        .map_err(|_| ApiError::Validation("Invalid list ID format".to_string()))
}

/// Create a vocabulary list
/// POST /api/lists
pub async fn create_list(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Option<Json<CreateListRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = require_payload(payload, "A list needs a title and a words array")?;
    let list = request.into_list(current.id).map_err(ApiError::Validation)?;
    let list = state.store.create_list(list).await?;

    info!("User {} created list {} with {} words", current.id, list.id, list.words.len());
    Ok((StatusCode::CREATED, Json(list)))
}

/// The caller's lists with progress, newest first
/// GET /api/lists
pub async fn get_lists(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let overviews = state.store.list_overviews(current.id).await?;

    let summaries: Vec<ListSummary> = overviews
        .into_iter()
        .map(|overview| {
            let progress = overview.stats.progress();
            ListSummary {
                id: overview.id,
                title: overview.title,
                total_words: overview.stats.total_words as usize,
                progress,
                color: ProgressColor::for_progress(progress),
                created_at: overview.created_at,
            }
        })
        .collect();

    info!("Retrieved {} lists for user {}", summaries.len(), current.id);
    Ok((StatusCode::OK, Json(summaries)))
}

/// GET /api/lists/:id
pub async fn get_list(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(list_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_list_id(&list_id)?;

    let list = state
        .store
        .get_list(current.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("List with id {}", id)))?;

    Ok((StatusCode::OK, Json(list)))
}

/// DELETE /api/lists/:id
pub async fn delete_list(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(list_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_list_id(&list_id)?;
    info!("User {} deleting list {}", current.id, id);

    if !state.store.delete_list(current.id, id).await? {
        return Err(ApiError::not_found(format!("List with id {}", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Record the outcome of a practice run
/// POST /api/lists/:id/practice
pub async fn record_practice(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(list_id): Path<String>,
    payload: Option<Json<PracticeRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_list_id(&list_id)?;
    let request = require_payload(payload, "Correct and incorrect counts must be non-negative numbers")?;

    let list = state
        .store
        .get_list(current.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("List with id {}", id)))?;

    request.validate(list.words.len()).map_err(ApiError::Validation)?;

    let session = state
        .store
        .record_practice(PracticeSession::new(list.id, current.id, request.correct, request.incorrect))
        .await?;

    info!(
        "User {} practised list {}: {} correct, {} incorrect",
        current.id, list.id, session.correct, session.incorrect
    );
    Ok((StatusCode::CREATED, Json(session)))
}
