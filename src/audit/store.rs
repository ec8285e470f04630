//! Audit Trail Storage
//! Mission: Append-only record of security-relevant actions in SQLite

use crate::audit::models::{AuditAction, AuditEntry};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::warn;

/// Filters for reading the trail. All provided filters must match.
#[derive(Debug, Default, Clone)]
pub struct AuditQuery {
    pub limit: i64,
    pub action: Option<String>,
    pub user: Option<String>,
    pub search: Option<String>,
}

/// Append-only audit log with SQLite backend.
///
/// Cheap to clone; clones share the same underlying table.
#[derive(Clone)]
pub struct AuditLog {
    db_path: Arc<String>,
}

impl AuditLog {
    /// Open the audit log and initialize the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let log = Self {
            db_path: Arc::new(db_path.to_string()),
        };
        log.init_db()?;
        Ok(log)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(self.db_path.as_str())?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS audit_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                action TEXT NOT NULL,
                details TEXT NOT NULL,
                performed_by TEXT NOT NULL,
                ip_address TEXT,
                timestamp TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Record an action, fire-and-forget.
    ///
    /// The write is dispatched to the blocking pool before the caller's
    /// response goes out; a failed insert is logged at WARN and never
    /// propagated to the triggering handler.
    pub fn record(
        &self,
        action: AuditAction,
        details: impl Into<String>,
        performed_by: impl Into<String>,
        ip: Option<IpAddr>,
    ) {
        let log = self.clone();
        let details = details.into();
        let performed_by = performed_by.into();
        let ip = ip.map(|i| i.to_string());

        tokio::task::spawn_blocking(move || {
            if let Err(e) = log.insert(action, &details, &performed_by, ip.as_deref()) {
                warn!(
                    action = action.as_str(),
                    error = %e,
                    "Failed to write audit entry"
                );
            }
        });
    }

    /// Synchronous insert; `record` is the normal entry point.
    pub fn insert(
        &self,
        action: AuditAction,
        details: &str,
        performed_by: &str,
        ip_address: Option<&str>,
    ) -> Result<()> {
        let conn = Connection::open(self.db_path.as_str())?;

        conn.execute(
            "INSERT INTO audit_logs (action, details, performed_by, ip_address, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                action.as_str(),
                details,
                performed_by,
                ip_address,
                Utc::now().to_rfc3339(),
            ],
        )
        .context("Failed to insert audit entry")?;

        Ok(())
    }

    /// Read the trail, newest first. Filters are conjunctive; `search`
    /// matches case-insensitively against action, details, or
    /// performed_by.
    pub fn query(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>> {
        let conn = Connection::open(self.db_path.as_str())?;

        let search_like = query
            .search
            .as_ref()
            .map(|s| format!("%{}%", s.to_lowercase()));

        let mut stmt = conn.prepare(
            "SELECT id, action, details, performed_by, ip_address, timestamp
             FROM audit_logs
             WHERE (?1 IS NULL OR action = ?1)
               AND (?2 IS NULL OR performed_by = ?2)
               AND (?3 IS NULL
                    OR lower(action) LIKE ?3
                    OR lower(details) LIKE ?3
                    OR lower(performed_by) LIKE ?3)
             ORDER BY timestamp DESC, id DESC
             LIMIT ?4",
        )?;

        let entries = stmt
            .query_map(
                params![query.action, query.user, search_like, query.limit],
                |row| {
                    Ok(AuditEntry {
                        id: row.get(0)?,
                        action: row.get(1)?,
                        details: row.get(2)?,
                        performed_by: row.get(3)?,
                        ip_address: row.get(4)?,
                        timestamp: row.get(5)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_log() -> (AuditLog, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let log = AuditLog::new(temp_file.path().to_str().unwrap()).unwrap();
        (log, temp_file)
    }

    fn query_all(log: &AuditLog) -> Vec<AuditEntry> {
        log.query(&AuditQuery {
            limit: 100,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_insert_and_query_newest_first() {
        let (log, _temp) = create_test_log();

        log.insert(AuditAction::Login, "Successful login", "alaa", Some("10.0.0.1"))
            .unwrap();
        log.insert(AuditAction::Delete, "News #4 deleted", "alaa", Some("10.0.0.1"))
            .unwrap();
        log.insert(AuditAction::Logout, "Logged out", "alaa", None)
            .unwrap();

        let entries = query_all(&log);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].action, "LOGOUT");
        assert_eq!(entries[1].action, "DELETE");
        assert_eq!(entries[2].action, "LOGIN");
        assert_eq!(entries[2].ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_limit_caps_results() {
        let (log, _temp) = create_test_log();

        for i in 0..10 {
            log.insert(AuditAction::Update, &format!("News #{} updated", i), "alaa", None)
                .unwrap();
        }

        let entries = log
            .query(&AuditQuery {
                limit: 4,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].details, "News #9 updated");
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let (log, _temp) = create_test_log();

        log.insert(AuditAction::Create, "News #1 created", "alaa", None)
            .unwrap();
        log.insert(AuditAction::Create, "News #2 created", "hassan", None)
            .unwrap();
        log.insert(AuditAction::Delete, "News #1 deleted", "alaa", None)
            .unwrap();

        let entries = log
            .query(&AuditQuery {
                limit: 100,
                action: Some("CREATE".to_string()),
                user: Some("alaa".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].details, "News #1 created");
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let (log, _temp) = create_test_log();

        log.insert(AuditAction::Upload, "Image uploaded: banner.webp", "alaa", None)
            .unwrap();
        log.insert(AuditAction::Sync, "Synced 2 posts from WhatsApp feed", "system", None)
            .unwrap();

        // Matches details
        let entries = log
            .query(&AuditQuery {
                limit: 100,
                search: Some("BANNER".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "UPLOAD");

        // Matches performed_by
        let entries = log
            .query(&AuditQuery {
                limit: 100,
                search: Some("System".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(entries.len(), 1);

        // Matches action
        let entries = log
            .query(&AuditQuery {
                limit: 100,
                search: Some("sync".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_record_is_fire_and_forget() {
        let (log, _temp) = create_test_log();

        log.record(
            AuditAction::Login,
            "Successful login",
            "alaa",
            Some("192.168.1.9".parse().unwrap()),
        );

        // The write happens on the blocking pool; poll briefly
        for _ in 0..50 {
            if !query_all(&log).is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        let entries = query_all(&log);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].performed_by, "alaa");
        assert_eq!(entries[0].ip_address.as_deref(), Some("192.168.1.9"));
    }
}
