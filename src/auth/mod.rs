//! Demo session authentication.
//!
//! The original product mocks its auth provider; this module keeps that
//! contract: an in-memory user registry issuing opaque bearer tokens, with
//! a mocked Steam account link. Token comparison is constant-time to avoid
//! timing leaks even in demo mode.

use std::collections::HashMap;
use std::sync::RwLock;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::errors::{codes, AppError, ErrorDetails, ErrorResponse};
use crate::models::{SessionResponse, User};

struct StoredUser {
    user: User,
    password: String,
}

/// In-memory registry of users and their active sessions.
#[derive(Default)]
pub struct SessionStore {
    users: RwLock<HashMap<String, StoredUser>>,
    sessions: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new user and open a session. The display name defaults
    /// to the email local part.
    pub fn register(&self, email: &str, password: &str) -> Result<SessionResponse, AppError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation("A valid email is required".to_string()));
        }
        if password.len() < 6 {
            return Err(AppError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }

        let mut users = self.users.write().expect("user registry lock poisoned");
        if users.contains_key(&email) {
            return Err(AppError::Validation("Email is already registered".to_string()));
        }

        let display_name = email.split('@').next().unwrap_or(&email).to_string();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.clone(),
            display_name,
            avatar_url: None,
            steam_id: None,
        };

        users.insert(
            email,
            StoredUser {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        drop(users);

        Ok(self.open_session(user))
    }

    /// Authenticate by email and password and open a fresh session.
    pub fn login(&self, email: &str, password: &str) -> Result<SessionResponse, AppError> {
        let email = email.trim().to_lowercase();
        let users = self.users.read().expect("user registry lock poisoned");

        let stored = users
            .get(&email)
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        if !constant_time_compare(password, &stored.password) {
            return Err(AppError::Unauthorized("Invalid email or password".to_string()));
        }

        let user = stored.user.clone();
        drop(users);

        Ok(self.open_session(user))
    }

    /// Mocked Steam account link: attaches a synthetic steam id to the
    /// session's user. A real implementation would run the OpenID round
    /// trip server-side.
    pub fn link_steam(&self, token: &str) -> Result<User, AppError> {
        let user = self
            .user_for_token(token)
            .ok_or_else(|| AppError::Unauthorized("Missing or invalid session token".to_string()))?;

        let mut users = self.users.write().expect("user registry lock poisoned");
        let stored = users
            .get_mut(&user.email)
            .ok_or_else(|| AppError::Internal("Session user vanished".to_string()))?;

        if stored.user.steam_id.is_none() {
            stored.user.steam_id = Some(format!("demo-steam-{}", &stored.user.id[..8]));
        }

        Ok(stored.user.clone())
    }

    /// Close a session. Unknown tokens are ignored.
    pub fn logout(&self, token: &str) {
        self.sessions
            .write()
            .expect("session lock poisoned")
            .remove(token);
    }

    /// Resolve a bearer token to its user, comparing tokens in constant
    /// time.
    pub fn user_for_token(&self, token: &str) -> Option<User> {
        let sessions = self.sessions.read().expect("session lock poisoned");
        let user_id = sessions
            .iter()
            .find(|(stored, _)| constant_time_compare(token, stored))
            .map(|(_, user_id)| user_id.clone())?;
        drop(sessions);

        let users = self.users.read().expect("user registry lock poisoned");
        users
            .values()
            .find(|stored| stored.user.id == user_id)
            .map(|stored| stored.user.clone())
    }

    fn open_session(&self, user: User) -> SessionResponse {
        let token = format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple());
        self.sessions
            .write()
            .expect("session lock poisoned")
            .insert(token.clone(), user.id.clone());

        SessionResponse { token, user }
    }
}

/// Session middleware: resolves the bearer token and stashes the user in
/// request extensions for handlers to extract.
pub async fn session_auth_layer(
    sessions: std::sync::Arc<SessionStore>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string());

    match token.and_then(|t| sessions.user_for_token(&t)) {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => unauthorized_response("Missing or invalid session token"),
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        },
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
