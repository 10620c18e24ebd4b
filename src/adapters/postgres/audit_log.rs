//! PostgreSQL implementation of the AuditLog port.
//!
//! Insert-only; there is no update or delete statement in this file.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::settlement::AuditEntry;
use crate::ports::AuditLog;

/// PostgreSQL implementation of the AuditLog port.
pub struct PostgresAuditLog {
    pool: PgPool,
}

impl PostgresAuditLog {
    /// Creates a new audit log over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    action: String,
    performed_by: String,
    performed_at: DateTime<Utc>,
    reason: Option<String>,
    previous_value: Option<String>,
    new_value: Option<String>,
}

impl From<AuditRow> for AuditEntry {
    fn from(row: AuditRow) -> Self {
        AuditEntry {
            action: row.action,
            performed_by: row.performed_by,
            performed_at: Timestamp::from_datetime(row.performed_at),
            reason: row.reason,
            previous_value: row.previous_value,
            new_value: row.new_value,
        }
    }
}

#[async_trait]
impl AuditLog for PostgresAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO audit_entries (
                action, performed_by, performed_at, reason, previous_value, new_value
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&entry.action)
        .bind(&entry.performed_by)
        .bind(*entry.performed_at.as_datetime())
        .bind(entry.reason.as_deref())
        .bind(entry.previous_value.as_deref())
        .bind(entry.new_value.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to append audit entry: {}", e)))?;

        Ok(())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<AuditEntry>, DomainError> {
        let rows: Vec<AuditRow> = sqlx::query_as(
            r#"
            SELECT action, performed_by, performed_at, reason, previous_value, new_value
            FROM audit_entries
            ORDER BY performed_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list audit entries: {}", e)))?;

        Ok(rows.into_iter().map(AuditEntry::from).collect())
    }
}
