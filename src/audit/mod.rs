//! Audit Trail Module
//! Mission: Append-only record of security-relevant actions, queryable and exportable

pub mod api;
pub mod csv;
pub mod models;
pub mod store;

pub use models::{AuditAction, AuditEntry};
pub use store::{AuditLog, AuditQuery};
