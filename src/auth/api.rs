//! Authentication API Endpoints
//! Mission: Provide the login, verify, and logout flows

use crate::audit::models::AuditAction;
use crate::auth::{
    middleware::{extract_token, TOKEN_COOKIE},
    models::{LoginRequest, LoginResponse, UserResponse},
};
use crate::routes::AppState;
use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::{error, info, warn};

/// Session cookie lifetime; matches the token TTL.
const TOKEN_MAX_AGE_SECS: i64 = 24 * 60 * 60;

fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        TOKEN_COOKIE, token, TOKEN_MAX_AGE_SECS
    )
}

fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0", TOKEN_COOKIE)
}

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AuthApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(AuthApiError::MissingFields);
    }

    info!("🔐 Login attempt: {}", payload.username);

    // bcrypt comparison is CPU-bound; keep it off the async executor
    let store = state.user_store.clone();
    let username = payload.username.clone();
    let verified = tokio::task::spawn_blocking(move || {
        store.verify_credentials(&username, &payload.password)
    })
    .await
    .map_err(|_| AuthApiError::Internal)?
    .map_err(|e| {
        error!("Credential check failed: {:#}", e);
        AuthApiError::Internal
    })?;

    let Some(user) = verified else {
        warn!("❌ Failed login attempt: {}", payload.username);
        return Err(AuthApiError::InvalidCredentials);
    };

    let token = state.jwt.issue(&user).map_err(|e| {
        error!("Token issuance failed: {:#}", e);
        AuthApiError::Internal
    })?;

    state.audit.record(
        AuditAction::Login,
        "Successful login",
        user.username.clone(),
        Some(addr.ip()),
    );

    info!("✅ Login successful: {} ({})", user.username, user.role.as_str());

    Ok((
        AppendHeaders([(header::SET_COOKIE, session_cookie(&token))]),
        Json(LoginResponse {
            success: true,
            user: UserResponse::from_user(&user),
        }),
    )
        .into_response())
}

/// Token check endpoint - GET /api/auth/verify
///
/// Reads the token from either transport; no guard middleware, the
/// response shape carries the result.
pub async fn verify(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(token) = extract_token(&headers) else {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "valid": false }))).into_response();
    };

    match state.jwt.verify(&token) {
        Ok(claims) => Json(json!({ "valid": true, "user": claims })).into_response(),
        Err(_) => (StatusCode::FORBIDDEN, Json(json!({ "valid": false }))).into_response(),
    }
}

/// Logout endpoint - POST /api/auth/logout
///
/// Clears the session cookie. There is no server-side revocation; a
/// bearer-holding client keeps access until natural expiry.
pub async fn logout(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    if let Some(token) = extract_token(&headers) {
        if let Ok(claims) = state.jwt.verify(&token) {
            state.audit.record(
                AuditAction::Logout,
                "Logged out",
                claims.username,
                Some(addr.ip()),
            );
        }
    }

    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie())]),
        Json(json!({ "success": true })),
    )
        .into_response()
}

/// Auth API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthApiError {
    MissingFields,
    InvalidCredentials,
    Internal,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::MissingFields => {
                (StatusCode::BAD_REQUEST, "Username and password required")
            }
            // One generic message whether the username is unknown or the
            // password mismatched
            AuthApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AuthApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
