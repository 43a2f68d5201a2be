// Progress handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::CurrentUser,
    error::ApiError,
    models::{progress::ListStats, DashboardSummary, LearnerProgress, Level},
    state::AppState,
};

/// Query parameters for the learner board
#[derive(Debug, Deserialize)]
pub struct LearnersQuery {
    pub level: Option<String>,
}

/// Signed-in user's overview
/// GET /api/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let overviews = state.store.list_overviews(current.id).await?;
    let totals = state.store.answer_totals(current.id).await?;

    let stats: Vec<ListStats> = overviews.iter().map(|o| o.stats).collect();
    let summary = DashboardSummary::compute(&stats, totals);

    Ok((StatusCode::OK, Json(summary)))
}

/// Learners ranked by mastery, optionally for one level
/// GET /api/progress?level=<level>
pub async fn learners(
    State(state): State<AppState>,
    Query(params): Query<LearnersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let level = params
        .level
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .map(str::parse::<Level>)
        .transpose()
        .map_err(ApiError::Validation)?;

    let mut board: Vec<LearnerProgress> = state
        .store
        .learners(level)
        .await?
        .into_iter()
        .map(|(user, totals)| LearnerProgress::new(user.id, user.username, user.level, totals))
        .collect();

    board.sort_by(|a, b| b.progress.cmp(&a.progress).then_with(|| a.username.cmp(&b.username)));

    info!("Retrieved {} learners", board.len());
    Ok((StatusCode::OK, Json(board)))
}
