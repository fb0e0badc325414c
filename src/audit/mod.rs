//! SQLite-based audit log of vault operations.
//!
//! Stores a record of every vault operation (init, add, backup, remove,
//! etc.) in a local SQLite database at `<vault root>/audit.db`.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::debug;

use crate::errors::{ResteasyError, Result};

/// File name of the audit database in the vault root.
pub const AUDIT_DB_FILENAME: &str = "audit.db";

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub repository: Option<String>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `<vault root>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened. Callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(vault_root: &Path) -> Option<Self> {
        let db_path = Self::db_path(vault_root);
        let conn = Connection::open(&db_path).ok()?;

        // Set restrictive permissions on the audit database (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                operation   TEXT NOT NULL,
                repository  TEXT,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Fire-and-forget: errors are only logged at debug level.
    pub fn log(&self, operation: &str, repository: Option<&str>, details: Option<&str>) {
        let now = Utc::now().to_rfc3339();
        if let Err(e) = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, repository, details)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![now, operation, repository, details],
        ) {
            debug!(error = %e, "audit log write failed");
        }
    }

    /// Query the most recent `limit` entries, newest first.
    pub fn query(&self, limit: usize) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, repository, details
                 FROM audit_log
                 ORDER BY id DESC
                 LIMIT ?1",
            )
            .map_err(|e| ResteasyError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map([limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    repository: row.get(3)?,
                    details: row.get(4)?,
                })
            })
            .map_err(|e| ResteasyError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| ResteasyError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Return the path to the audit database.
    pub fn db_path(vault_root: &Path) -> PathBuf {
        vault_root.join(AUDIT_DB_FILENAME)
    }
}

/// Convenience helper: log an audit event for the vault at `vault_root`.
///
/// Opens the audit database, logs the event, and silently ignores any errors.
/// Never fails the parent operation.
pub fn log_audit(vault_root: &Path, op: &str, repository: Option<&str>, details: Option<&str>) {
    if let Some(audit) = AuditLog::open(vault_root) {
        audit.log(op, repository, details);
    }
}
