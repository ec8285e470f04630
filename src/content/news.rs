//! News API Endpoints
//! Mission: Public news reads, guarded mutations, and the WhatsApp feed sync

use crate::audit::models::AuditAction;
use crate::auth::models::Claims;
use crate::content::models::{NewNews, News};
use crate::routes::{ApiError, AppState};
use axum::{
    extract::{ConnectInfo, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    /// Filter by category
    category: Option<String>,
    /// Limit number of results
    limit: Option<i64>,
}

/// All news, newest first - GET /api/news (public)
pub async fn list_news(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> Result<Json<Vec<News>>, ApiError> {
    let limit = params.limit.unwrap_or(50).clamp(1, 500);
    let news = state
        .content
        .list_news(params.category.as_deref(), limit)?;
    Ok(Json(news))
}

/// Single news item - GET /api/news/:id (public)
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<News>, ApiError> {
    state
        .content
        .get_news(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("News not found".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct CreateNewsRequest {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
}

/// Create news - POST /api/news (guarded)
pub async fn create_news(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<CreateNewsRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.title.is_empty() || payload.content.is_empty() {
        return Err(ApiError::BadRequest("Title and content required".to_string()));
    }

    let id = state.content.insert_news(&NewNews {
        title: payload.title.clone(),
        content: payload.content,
        image: payload.image,
        category: payload.category,
        source: payload.source,
        published_date: None,
    })?;

    state.audit.record(
        AuditAction::Create,
        format!("News #{} created: {}", id, payload.title),
        claims.username,
        Some(addr.ip()),
    );

    Ok(Json(json!({ "success": true, "id": id })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateNewsRequest {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub category: Option<String>,
}

/// Update news - PUT /api/news/:id (guarded)
pub async fn update_news(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateNewsRequest>,
) -> Result<Json<Value>, ApiError> {
    let changed = state.content.update_news(
        id,
        &payload.title,
        &payload.content,
        payload.image.as_deref(),
        payload.category.as_deref(),
    )?;

    if !changed {
        return Err(ApiError::NotFound("News not found".to_string()));
    }

    state.audit.record(
        AuditAction::Update,
        format!("News #{} updated", id),
        claims.username,
        Some(addr.ip()),
    );

    Ok(Json(json!({ "success": true })))
}

/// Delete news - DELETE /api/news/:id (guarded)
pub async fn delete_news(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !state.content.delete_news(id)? {
        return Err(ApiError::NotFound("News not found".to_string()));
    }

    state.audit.record(
        AuditAction::Delete,
        format!("News #{} deleted", id),
        claims.username,
        Some(addr.ip()),
    );

    Ok(Json(json!({ "success": true })))
}

/// One item of the incoming WhatsApp feed.
struct FeedItem {
    title: &'static str,
    content: &'static str,
    category: &'static str,
}

// TODO: replace the sample feed with the WhatsApp Business API client once
// the organization's account credentials are provisioned.
fn fetch_feed() -> Vec<FeedItem> {
    vec![
        FeedItem {
            title: "الصادقون: الحكومة ماضية في تنفيذ برنامجها الوزاري",
            content: "أكدت كتلة الصادقون النيابية، اليوم الخميس، أن الحكومة الحالية ماضية في تنفيذ برنامجها الوزاري...",
            category: "اخبار الصادقون",
        },
        FeedItem {
            title: "نائب عن الصادقون يدعو لمنح المحافظات صلاحيات أوسع",
            content: "دعا النائب عن كتلة الصادقون النيابية، إلى منح المحافظات صلاحيات أوسع...",
            category: "بيانات",
        },
    ]
}

/// Pull the WhatsApp feed into the news table - POST /api/news/sync/whatsapp (guarded)
///
/// Items already present (matched by title) are skipped.
pub async fn sync_whatsapp(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Json<Value>, ApiError> {
    let mut added = 0;

    for item in fetch_feed() {
        if state.content.news_title_exists(item.title)? {
            continue;
        }

        state.content.insert_news(&NewNews {
            title: item.title.to_string(),
            content: item.content.to_string(),
            image: Some("/images/news-placeholder.jpg".to_string()),
            category: Some(item.category.to_string()),
            source: Some("whatsapp".to_string()),
            published_date: None,
        })?;
        added += 1;
    }

    if added > 0 {
        info!("📱 WhatsApp sync added {} news item(s)", added);
    }

    state.audit.record(
        AuditAction::Sync,
        format!("Synced {} posts from WhatsApp feed", added),
        claims.username,
        Some(addr.ip()),
    );

    Ok(Json(json!({
        "success": true,
        "count": added,
        "message": format!("تمت مزامنة {} خبر جديد من واتساب", added),
    })))
}
