//! Auth API endpoints (demo session provider).

use axum::{extract::State, http::HeaderMap, Extension, Json};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{CredentialsRequest, SessionResponse, User};
use crate::AppState;

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// POST /api/auth/register - Create an account and open a session.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> ApiResult<SessionResponse> {
    match state.sessions.register(&request.email, &request.password) {
        Ok(session) => success(session),
        Err(e) => Err(e),
    }
}

/// POST /api/auth/login - Authenticate and open a session.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> ApiResult<SessionResponse> {
    match state.sessions.login(&request.email, &request.password) {
        Ok(session) => success(session),
        Err(e) => Err(e),
    }
}

/// POST /api/auth/steam - Mocked Steam account link for the session user.
pub async fn link_steam(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<User> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("Missing or invalid session token".to_string()))?;

    match state.sessions.link_steam(&token) {
        Ok(user) => success(user),
        Err(e) => Err(e),
    }
}

/// POST /api/auth/logout - Close the current session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<()> {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.logout(&token);
    }
    success(())
}

/// GET /api/auth/me - The session's user.
pub async fn me(Extension(user): Extension<User>) -> ApiResult<User> {
    success(user)
}
