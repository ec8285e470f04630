//! Section API Endpoints
//! Mission: Public reads and guarded edits of the static page sections

use crate::audit::models::AuditAction;
use crate::auth::models::Claims;
use crate::content::models::Section;
use crate::routes::{ApiError, AppState};
use axum::{
    extract::{ConnectInfo, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;

/// Active sections in display order - GET /api/sections (public)
pub async fn list_sections(
    State(state): State<AppState>,
) -> Result<Json<Vec<Section>>, ApiError> {
    Ok(Json(state.content.list_sections()?))
}

/// Single section by slug - GET /api/sections/:slug (public)
pub async fn get_section(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Section>, ApiError> {
    state
        .content
        .get_section_by_slug(&slug)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Section not found".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSectionRequest {
    pub name: String,
    pub content: Option<String>,
    pub order_index: i64,
    pub is_active: bool,
}

/// Update a section - PUT /api/sections/:id (guarded)
pub async fn update_section(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSectionRequest>,
) -> Result<Json<Value>, ApiError> {
    let changed = state.content.update_section(
        id,
        &payload.name,
        payload.content.as_deref(),
        payload.order_index,
        payload.is_active,
    )?;

    if !changed {
        return Err(ApiError::NotFound("Section not found".to_string()));
    }

    state.audit.record(
        AuditAction::Update,
        format!("Section #{} updated: {}", id, payload.name),
        claims.username,
        Some(addr.ip()),
    );

    Ok(Json(json!({ "success": true })))
}
