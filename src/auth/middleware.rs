//! Access Guard Middleware
//! Mission: Gate admin routes on a valid session token with the admin role

use crate::auth::{
    jwt::{JwtHandler, TokenError},
    models::{Claims, UserRole},
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use std::sync::Arc;

/// Name of the session cookie set on login.
pub const TOKEN_COOKIE: &str = "token";

/// Pull the session token out of a request.
///
/// The `Authorization: Bearer` header wins; the `token` cookie is the
/// fallback. Every guarded route goes through this one function so the
/// two transports can never drift apart.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| t.to_string());

    from_header.or_else(|| {
        CookieJar::from_headers(headers)
            .get(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
    })
}

/// Extract, verify, and role-check a request's session token.
fn authorize(jwt: &JwtHandler, headers: &HeaderMap) -> Result<Claims, AuthError> {
    let token = extract_token(headers).ok_or(AuthError::MissingToken)?;

    let claims = jwt.verify(&token).map_err(|err| match err {
        TokenError::Expired => AuthError::ExpiredToken,
        TokenError::InvalidSignature | TokenError::Malformed => AuthError::InvalidToken,
    })?;

    if claims.role != UserRole::Admin {
        return Err(AuthError::Forbidden);
    }

    Ok(claims)
}

/// Guard for `/api/*` routes. Denials are structured JSON.
///
/// On success the verified claims are attached to the request extensions
/// for downstream handlers (audit attribution).
pub async fn require_admin_api(
    State(jwt): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = authorize(&jwt, req.headers())?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Guard for admin page routes. Denials redirect to the login page.
pub async fn require_admin_page(
    State(jwt): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Response {
    match authorize(&jwt, req.headers()) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(_) => Redirect::to("/admin/login").into_response(),
    }
}

/// Access guard denial reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Access token required"),
            AuthError::InvalidToken | AuthError::ExpiredToken => {
                (StatusCode::FORBIDDEN, "Invalid or expired token")
            }
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Admin access required"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::User;
    use axum::http::HeaderValue;
    use chrono::Utc;

    fn test_user(role: UserRole) -> User {
        User {
            id: 3,
            username: "alaa".to_string(),
            password_hash: "hash".to_string(),
            role,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );

        assert_eq!(extract_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token=xyz789"));

        assert_eq!(extract_token(&headers), Some("xyz789".to_string()));
    }

    #[test]
    fn test_header_takes_precedence_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("token=from-cookie"),
        );

        assert_eq!(extract_token(&headers), Some("from-header".to_string()));
    }

    #[test]
    fn test_extract_token_none_when_absent() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        // Non-bearer authorization schemes are ignored
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_authorize_maps_failures() {
        let jwt = JwtHandler::new("test-secret".to_string());

        let headers = HeaderMap::new();
        assert_eq!(
            authorize(&jwt, &headers).unwrap_err(),
            AuthError::MissingToken
        );

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token=garbage"));
        assert_eq!(
            authorize(&jwt, &headers).unwrap_err(),
            AuthError::InvalidToken
        );

        let expired = JwtHandler::with_ttl_hours("test-secret".to_string(), -2)
            .issue(&test_user(UserRole::Admin))
            .unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("token={}", expired)).unwrap(),
        );
        assert_eq!(
            authorize(&jwt, &headers).unwrap_err(),
            AuthError::ExpiredToken
        );
    }

    #[test]
    fn test_authorize_rejects_non_admin_role() {
        let jwt = JwtHandler::new("test-secret".to_string());
        let token = jwt.issue(&test_user(UserRole::Editor)).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );

        assert_eq!(authorize(&jwt, &headers).unwrap_err(), AuthError::Forbidden);
    }

    #[test]
    fn test_authorize_accepts_admin() {
        let jwt = JwtHandler::new("test-secret".to_string());
        let token = jwt.issue(&test_user(UserRole::Admin)).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("token={}", token)).unwrap(),
        );

        let claims = authorize(&jwt, &headers).unwrap();
        assert_eq!(claims.username, "alaa");
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            AuthError::MissingToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::ExpiredToken.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
