use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::{
    auth::require_session,
    handlers::{
        auth::{login, logout, me, register, update_me},
        catalog::{get_story, level_vocabulary, list_levels, list_stories},
        health_check,
        lists::{create_list, delete_list, get_list, get_lists, record_practice},
        progress::{dashboard, learners},
    },
    state::AppState,
};

/// All endpoints, without the outer middleware stack
pub fn create_router(state: AppState) -> Router {
    // Routes that only make sense for a signed-in user
    let signed_in = Router::new()
        .route("/api/auth/me", get(me).patch(update_me))
        .route("/api/levels/:level/vocabulary", get(level_vocabulary))
        .route("/api/lists", post(create_list).get(get_lists))
        .route("/api/lists/:id", get(get_list).delete(delete_list))
        .route("/api/lists/:id/practice", post(record_practice))
        .route("/api/dashboard", get(dashboard))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/levels", get(list_levels))
        .route("/api/stories", get(list_stories))
        .route("/api/stories/:id", get(get_story))
        .route("/api/progress", get(learners))
        .merge(signed_in)
        .with_state(state)
}
