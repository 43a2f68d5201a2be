// Auth handlers
// Registration, sign-in, sign-out and the current user's profile

use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{
    auth::{
        clear_session_cookie,
        password::{hash_password_blocking, verify_password_blocking},
        session_cookie, CurrentUser,
    },
    error::ApiError,
    handlers::require_payload,
    models::{
        user::UpdateProfileRequest, Level, LoginRequest, PublicUser, RegisterRequest, User,
    },
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: PublicUser,
}

/// Register a new account
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = require_payload(payload, "All fields are required")?;
    let new_user = request.validate().map_err(ApiError::Validation)?;
    info!("Registering new user with email: {}", new_user.email);

    if state.store.user_exists(&new_user.email, &new_user.username).await? {
        return Err(ApiError::conflict("User already exists"));
    }

    let password_hash = hash_password_blocking(new_user.password).await?;
    let user = state
        .store
        .create_user(User::new(new_user.username, new_user.email, password_hash))
        .await?;

    info!("Successfully registered user with id: {}", user.id);
    Ok((StatusCode::CREATED, Json(user.to_public())))
}

/// Sign in and receive the session cookie
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Option<Json<LoginRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = require_payload(payload, "All fields are required")?;
    let credentials = request.validate().map_err(ApiError::Validation)?;

    let user = state.store.find_user_by_email(&credentials.email).await?;

    // Unknown email and wrong password produce the same response after the same work.
    let stored_hash = password_hash_to_check(user.as_ref(), &state.decoy_hash).to_string();
    let verified = verify_password_blocking(credentials.password, stored_hash).await?;

    let user = match user {
        Some(user) if verified => user,
        Some(user) => {
            info!("Login rejected for user id: {}", user.id);
            return Err(ApiError::InvalidCredentials);
        }
        None => {
            info!("Login rejected for unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let token = state.sessions.issue(&user)?;
    state.store.record_login(user.id, Utc::now()).await?;

    let cookie = session_cookie(&token, state.sessions.ttl(), state.sessions.secure_cookies())
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("invalid session cookie: {}", e)))?;

    info!("User {} signed in", user.id);
    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(LoginResponse { user: user.to_public() }),
    ))
}

/// Sign out by expiring the session cookie
/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(SET_COOKIE, clear_session_cookie(state.sessions.secure_cookies()))],
        Json(json!({ "message": "Logged out successfully" })),
    )
}

/// Current user's profile
/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .find_user_by_id(current.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok((StatusCode::OK, Json(user.to_profile())))
}

/// Change the current user's proficiency level
/// PATCH /api/auth/me
pub async fn update_me(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Option<Json<UpdateProfileRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = require_payload(payload, "Level is required")?;
    let level: Level = request.level.parse().map_err(ApiError::Validation)?;
    info!("Updating level of user {} to {}", current.id, level);

    let user = state
        .store
        .update_level(current.id, level)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok((StatusCode::OK, Json(user.to_profile())))
}

/// The hash a login attempt is verified against: the account's own, or the decoy.
fn password_hash_to_check<'a>(user: Option<&'a User>, decoy_hash: &'a str) -> &'a str {
    user.map_or(decoy_hash, |user| user.password_hash.as_str())
}
