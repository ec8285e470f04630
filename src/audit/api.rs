//! Audit Trail API Endpoints
//! Mission: Query and export the audit trail for the admin panel

use crate::audit::{csv::export_csv, models::AuditEntry, store::AuditQuery};
use crate::routes::{ApiError, AppState};
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AuditQueryParams {
    /// Limit number of results
    limit: Option<i64>,
    /// Filter by exact action (LOGIN, DELETE, ...)
    action: Option<String>,
    /// Filter by exact performer
    user: Option<String>,
    /// Case-insensitive substring across action, details, performer
    search: Option<String>,
}

impl AuditQueryParams {
    fn into_query(self, default_limit: i64, cap: i64) -> AuditQuery {
        AuditQuery {
            limit: self.limit.unwrap_or(default_limit).clamp(1, cap),
            action: self.action.filter(|s| !s.is_empty()),
            user: self.user.filter(|s| !s.is_empty()),
            search: self.search.filter(|s| !s.is_empty()),
        }
    }
}

/// Recent audit entries - GET /api/audit
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(params): Query<AuditQueryParams>,
) -> Result<Json<Vec<AuditEntry>>, ApiError> {
    let entries = state.audit.query(&params.into_query(50, 500))?;
    Ok(Json(entries))
}

/// CSV export of the trail - GET /api/audit/export
pub async fn export_audit_logs(
    State(state): State<AppState>,
    Query(params): Query<AuditQueryParams>,
) -> Result<Response, ApiError> {
    let entries = state.audit.query(&params.into_query(1000, 10_000))?;
    let csv = export_csv(&entries);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"audit_logs.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
