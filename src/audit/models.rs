//! Audit Trail Models
//! Mission: Define the security-relevant action record

use serde::{Deserialize, Serialize};

/// Kinds of security-relevant actions worth a trail entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuditAction {
    #[serde(rename = "LOGIN")]
    Login,
    #[serde(rename = "LOGOUT")]
    Logout,
    #[serde(rename = "CREATE")]
    Create,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
    #[serde(rename = "UPLOAD")]
    Upload,
    #[serde(rename = "SYNC")]
    Sync,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "LOGIN",
            AuditAction::Logout => "LOGOUT",
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Upload => "UPLOAD",
            AuditAction::Sync => "SYNC",
        }
    }
}

/// One row of the append-only audit trail.
///
/// Never updated or deleted by the system; insertion order is
/// chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub action: String,
    pub details: String,
    pub performed_by: String,
    pub ip_address: Option<String>,
    pub timestamp: String,
}
