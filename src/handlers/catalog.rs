// Catalog handlers
// Read-only access to the built-in levels, flashcards and stories

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{auth::CurrentUser, catalog, error::ApiError, models::Level};

/// List proficiency levels
/// GET /api/levels
pub async fn list_levels() -> impl IntoResponse {
    (StatusCode::OK, Json(catalog::levels()))
}

/// Flashcards of one level
/// GET /api/levels/:level/vocabulary
pub async fn level_vocabulary(
    current: CurrentUser,
    Path(level): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let level: Level = level.parse().map_err(ApiError::Validation)?;
    info!("User {} fetching {} vocabulary", current.id, level);

    Ok((StatusCode::OK, Json(catalog::vocabulary_for(level))))
}

/// List audio stories
/// GET /api/stories
pub async fn list_stories() -> impl IntoResponse {
    (StatusCode::OK, Json(catalog::stories()))
}

/// GET /api/stories/:id
pub async fn get_story(Path(story_id): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let story = catalog::story(&story_id)
        .ok_or_else(|| ApiError::not_found(format!("Story with id {}", story_id)))?;

    Ok((StatusCode::OK, Json(story)))
}
