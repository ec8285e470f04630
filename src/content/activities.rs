//! Activity API Endpoints
//! Mission: Public activity reads and guarded mutations

use crate::audit::models::AuditAction;
use crate::auth::models::Claims;
use crate::content::models::Activity;
use crate::routes::{ApiError, AppState};
use axum::{
    extract::{ConnectInfo, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;

#[derive(Debug, Deserialize)]
pub struct ActivitiesQuery {
    /// Limit number of results
    limit: Option<i64>,
}

/// Activities, latest first - GET /api/activities (public)
pub async fn list_activities(
    State(state): State<AppState>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<Vec<Activity>>, ApiError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 500);
    Ok(Json(state.content.list_activities(limit)?))
}

/// Single activity - GET /api/activities/:id (public)
pub async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Activity>, ApiError> {
    state
        .content
        .get_activity(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct ActivityRequest {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
}

/// Create an activity - POST /api/activities (guarded)
pub async fn create_activity(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<ActivityRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.title.is_empty() {
        return Err(ApiError::BadRequest("Title required".to_string()));
    }

    let id = state.content.insert_activity(
        &payload.title,
        payload.description.as_deref(),
        payload.image.as_deref(),
        payload.date.as_deref(),
        payload.location.as_deref(),
    )?;

    state.audit.record(
        AuditAction::Create,
        format!("Activity #{} created: {}", id, payload.title),
        claims.username,
        Some(addr.ip()),
    );

    Ok(Json(json!({ "success": true, "id": id })))
}

/// Update an activity - PUT /api/activities/:id (guarded)
pub async fn update_activity(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(id): Path<i64>,
    Json(payload): Json<ActivityRequest>,
) -> Result<Json<Value>, ApiError> {
    let changed = state.content.update_activity(
        id,
        &payload.title,
        payload.description.as_deref(),
        payload.image.as_deref(),
        payload.date.as_deref(),
        payload.location.as_deref(),
    )?;

    if !changed {
        return Err(ApiError::NotFound("Activity not found".to_string()));
    }

    state.audit.record(
        AuditAction::Update,
        format!("Activity #{} updated", id),
        claims.username,
        Some(addr.ip()),
    );

    Ok(Json(json!({ "success": true })))
}

/// Delete an activity - DELETE /api/activities/:id (guarded)
pub async fn delete_activity(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !state.content.delete_activity(id)? {
        return Err(ApiError::NotFound("Activity not found".to_string()));
    }

    state.audit.record(
        AuditAction::Delete,
        format!("Activity #{} deleted", id),
        claims.username,
        Some(addr.ip()),
    );

    Ok(Json(json!({ "success": true })))
}
