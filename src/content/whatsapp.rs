//! WhatsApp Feed Endpoints
//! Mission: Public feed reads and guarded post management

use crate::audit::models::AuditAction;
use crate::auth::models::Claims;
use crate::content::models::WhatsappPost;
use crate::routes::{ApiError, AppState};
use axum::{
    extract::{ConnectInfo, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Limit number of results
    limit: Option<i64>,
}

/// Feed posts, newest first - GET /api/whatsapp (public)
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<Vec<WhatsappPost>>, ApiError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 500);
    Ok(Json(state.content.list_whatsapp_posts(limit)?))
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: Option<String>,
    pub image: Option<String>,
    pub external_link: Option<String>,
    /// Original post time, if known
    pub date: Option<String>,
}

/// Add a feed post - POST /api/whatsapp (guarded)
pub async fn create_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.content.is_none() && payload.image.is_none() {
        return Err(ApiError::BadRequest("Content or image required".to_string()));
    }

    let id = state.content.insert_whatsapp_post(
        payload.content.as_deref(),
        payload.image.as_deref(),
        payload.external_link.as_deref(),
        payload.date.as_deref(),
    )?;

    state.audit.record(
        AuditAction::Create,
        format!("WhatsApp post #{} created", id),
        claims.username,
        Some(addr.ip()),
    );

    Ok(Json(json!({ "success": true, "id": id })))
}

/// Remove a feed post - DELETE /api/whatsapp/:id (guarded)
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !state.content.delete_whatsapp_post(id)? {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }

    state.audit.record(
        AuditAction::Delete,
        format!("WhatsApp post #{} deleted", id),
        claims.username,
        Some(addr.ip()),
    );

    Ok(Json(json!({ "success": true })))
}
