//! AuditLog port - append-only audit trail.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::settlement::AuditEntry;

/// Port for the append-only audit trail.
///
/// There is deliberately no update or delete operation.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Appends one entry.
    async fn append(&self, entry: &AuditEntry) -> Result<(), DomainError>;

    /// Recent entries, newest first, up to `limit`.
    async fn recent(&self, limit: u32) -> Result<Vec<AuditEntry>, DomainError>;
}
