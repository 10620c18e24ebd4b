//! PostgreSQL implementation of the ProcessedEventStore port.
//!
//! Insert-wins idempotency: `ON CONFLICT DO NOTHING` on the primary key,
//! so two concurrent deliveries marking the same event both succeed.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, EventId, Timestamp};
use crate::ports::ProcessedEventStore;

/// PostgreSQL implementation of the ProcessedEventStore port.
pub struct PostgresProcessedEventStore {
    pool: PgPool,
}

impl PostgresProcessedEventStore {
    /// Creates a new store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcessedEventStore for PostgresProcessedEventStore {
    async fn contains(
        &self,
        event_id: &EventId,
        handler_name: &str,
    ) -> Result<bool, DomainError> {
        let row: Option<(i32,)> = sqlx::query_as(
            r#"
            SELECT 1 FROM processed_events
            WHERE event_id = $1 AND handler_name = $2
            "#,
        )
        .bind(event_id.as_str())
        .bind(handler_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to check processed event: {}", e)))?;

        Ok(row.is_some())
    }

    async fn mark_processed(
        &self,
        event_id: &EventId,
        handler_name: &str,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO processed_events (event_id, handler_name, processed_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (event_id, handler_name) DO NOTHING
            "#,
        )
        .bind(event_id.as_str())
        .bind(handler_name)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to mark event processed: {}", e)))?;

        Ok(())
    }

    async fn delete_before(&self, timestamp: Timestamp) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM processed_events WHERE processed_at < $1")
            .bind(*timestamp.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to delete processed events: {}", e))
            })?;

        Ok(result.rows_affected())
    }
}
