//! Router Assembly
//! Mission: Wire every endpoint to its guard, limiter, and handlers

use crate::{
    audit::{api as audit_api, AuditLog},
    auth::{api as auth_api, middleware as auth_guard, JwtHandler, UserStore},
    config::Config,
    content::{activities, news, sections, whatsapp, ContentStore},
    middleware::{rate_limit_middleware, request_logging, RateLimiter},
    pages, upload,
};
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub user_store: Arc<UserStore>,
    pub jwt: Arc<JwtHandler>,
    pub audit: AuditLog,
    pub content: Arc<ContentStore>,
    pub config: Arc<Config>,
}

/// Create the full application router.
///
/// The two rate limiters are passed in rather than constructed here so
/// callers (and tests) control their policies and lifetimes.
pub fn create_router(
    state: AppState,
    login_limiter: RateLimiter,
    api_limiter: RateLimiter,
) -> Router {
    let public_api = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/auth/verify", get(auth_api::verify))
        .route("/api/auth/logout", post(auth_api::logout))
        .route("/api/news", get(news::list_news))
        .route("/api/news/:id", get(news::get_news))
        .route("/api/sections", get(sections::list_sections))
        .route("/api/sections/:id", get(sections::get_section))
        .route("/api/activities", get(activities::list_activities))
        .route("/api/activities/:id", get(activities::get_activity))
        .route("/api/whatsapp", get(whatsapp::list_posts));

    // Login gets its own, stricter limiter on top of the general one
    let login_api = Router::new()
        .route("/api/auth/login", post(auth_api::login))
        .route_layer(from_fn_with_state(login_limiter, rate_limit_middleware));

    let admin_api = Router::new()
        .route("/api/news", post(news::create_news))
        .route(
            "/api/news/:id",
            put(news::update_news).delete(news::delete_news),
        )
        .route("/api/news/sync/whatsapp", post(news::sync_whatsapp))
        .route("/api/sections/:id", put(sections::update_section))
        .route("/api/activities", post(activities::create_activity))
        .route(
            "/api/activities/:id",
            put(activities::update_activity).delete(activities::delete_activity),
        )
        .route("/api/whatsapp", post(whatsapp::create_post))
        .route("/api/whatsapp/:id", delete(whatsapp::delete_post))
        .route("/api/audit", get(audit_api::list_audit_logs))
        .route("/api/audit/export", get(audit_api::export_audit_logs))
        .route("/api/upload", post(upload::upload_image))
        .route_layer(from_fn_with_state(
            state.jwt.clone(),
            auth_guard::require_admin_api,
        ))
        .layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES));

    // Admin panel pages: everything except the login page redirects
    // anonymous visitors to it
    let guarded_pages = Router::new()
        .route("/admin", get(pages::admin_dashboard))
        .route("/admin/*path", get(pages::admin_dashboard))
        .route_layer(from_fn_with_state(
            state.jwt.clone(),
            auth_guard::require_admin_page,
        ));
    let admin_pages = Router::new()
        .route("/admin/login", get(pages::admin_login))
        .merge(guarded_pages);

    let limited = Router::new()
        .merge(public_api)
        .merge(login_api)
        .merge(admin_api)
        .merge(admin_pages)
        .layer(from_fn_with_state(api_limiter, rate_limit_middleware));

    Router::new()
        .merge(limited)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Al-Sadiqoon API is running",
    }))
}

// ===== Error Handling =====

/// Response error for the data routes.
#[derive(Debug)]
pub enum ApiError {
    Database(anyhow::Error),
    NotFound(String),
    BadRequest(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Database(err) => {
                // Internal detail stays in the server log
                tracing::error!("Database error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
