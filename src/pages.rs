//! Admin Page Routes
//! Mission: Serve the admin panel shell behind the redirect-mode guard

use crate::routes::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::path::Path;
use tracing::warn;

/// Admin dashboard shell - GET /admin and /admin/** (guarded upstream)
pub async fn admin_dashboard(State(state): State<AppState>) -> Response {
    serve_page(&state.config.static_dir, "admin.html").await
}

/// Login page - GET /admin/login (public)
pub async fn admin_login(State(state): State<AppState>) -> Response {
    serve_page(&state.config.static_dir, "admin-login.html").await
}

async fn serve_page(static_dir: &Path, name: &str) -> Response {
    match tokio::fs::read_to_string(static_dir.join(name)).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!(page = name, error = %e, "Admin page asset missing");
            (StatusCode::NOT_FOUND, "Page not found").into_response()
        }
    }
}
