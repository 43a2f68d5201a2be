//! Credentials, session tokens and the guard for signed-in routes.

pub mod cookie;
pub mod password;
pub mod token;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub use cookie::{clear_session_cookie, extract_session_token, session_cookie, SESSION_COOKIE_NAME};
pub use password::{hash_password, verify_password};
pub use token::{Claims, SessionKeys};

/// The signed-in user behind a request, taken from a verified session token.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl CurrentUser {
    fn from_headers(parts: &Parts, sessions: &SessionKeys) -> Result<Self, ApiError> {
        let token = extract_session_token(&parts.headers).ok_or(ApiError::Unauthorized)?;

        let (id, claims) = sessions.verify(&token).map_err(|e| {
            debug!("Rejected session token: {:#}", e);
            ApiError::Unauthorized
        })?;

        Ok(CurrentUser {
            id,
            username: claims.username,
            email: claims.email,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Already resolved by `require_session`.
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        CurrentUser::from_headers(parts, &state.sessions)
    }
}

/// Rejects requests without a valid session with 401.
/// A token that was presented but failed verification also gets its cookie cleared.
pub async fn require_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    match CurrentUser::from_headers(&parts, &state.sessions) {
        Ok(user) => {
            parts.extensions.insert(user);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(err) => {
            let presented = extract_session_token(&parts.headers).is_some();
            let mut response = err.into_response();
            if presented {
                response
                    .headers_mut()
                    .insert(SET_COOKIE, clear_session_cookie(state.sessions.secure_cookies()));
            }
            response
        }
    }
}
