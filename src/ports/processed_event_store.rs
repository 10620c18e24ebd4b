//! ProcessedEventStore port - Interface for tracking processed webhook events.
//!
//! Gateway delivery is at-least-once: the same event arrives again on
//! retries, redeliveries, and crashes between apply and acknowledge. This
//! store records which event ids a handler has fully applied so a second
//! delivery returns success without re-mutating the ledger. It complements
//! the ledger's field-equality guards; together a partially-applied prior
//! delivery still converges on retry.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventId, Timestamp};

/// Port for tracking which gateway events have been processed by which
/// handlers.
///
/// # Example
///
/// ```ignore
/// // Check if already processed before handling
/// if store.contains(&event_id, "GatewayWebhook").await? {
///     return Ok(IngestOutcome::AlreadyProcessed);
/// }
///
/// // Apply ledger transitions...
///
/// // Mark as processed after successful handling
/// store.mark_processed(&event_id, "GatewayWebhook").await?;
/// ```
#[async_trait]
pub trait ProcessedEventStore: Send + Sync {
    /// Check if an event has been processed by a specific handler.
    async fn contains(&self, event_id: &EventId, handler_name: &str)
        -> Result<bool, DomainError>;

    /// Mark an event as processed by a specific handler.
    ///
    /// Called AFTER successful handling. Must itself be idempotent
    /// (insert-wins), since the mark can race with a concurrent delivery.
    async fn mark_processed(
        &self,
        event_id: &EventId,
        handler_name: &str,
    ) -> Result<(), DomainError>;

    /// Delete entries older than the given timestamp (retention policy).
    ///
    /// Returns the number of entries deleted.
    async fn delete_before(&self, timestamp: Timestamp) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory implementation for testing
    struct InMemoryProcessedEventStore {
        processed: Arc<RwLock<HashSet<(String, String)>>>,
    }

    impl InMemoryProcessedEventStore {
        fn new() -> Self {
            Self {
                processed: Arc::new(RwLock::new(HashSet::new())),
            }
        }
    }

    #[async_trait]
    impl ProcessedEventStore for InMemoryProcessedEventStore {
        async fn contains(
            &self,
            event_id: &EventId,
            handler_name: &str,
        ) -> Result<bool, DomainError> {
            let key = (event_id.as_str().to_string(), handler_name.to_string());
            Ok(self.processed.read().await.contains(&key))
        }

        async fn mark_processed(
            &self,
            event_id: &EventId,
            handler_name: &str,
        ) -> Result<(), DomainError> {
            let key = (event_id.as_str().to_string(), handler_name.to_string());
            self.processed.write().await.insert(key);
            Ok(())
        }

        async fn delete_before(&self, _timestamp: Timestamp) -> Result<u64, DomainError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn contains_returns_false_for_new_event() {
        let store = InMemoryProcessedEventStore::new();
        let event_id = EventId::from_string("evt_301922");

        let result = store.contains(&event_id, "GatewayWebhook").await.unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn contains_returns_true_after_mark_processed() {
        let store = InMemoryProcessedEventStore::new();
        let event_id = EventId::from_string("evt_301922");

        store.mark_processed(&event_id, "GatewayWebhook").await.unwrap();
        let result = store.contains(&event_id, "GatewayWebhook").await.unwrap();

        assert!(result);
    }

    #[tokio::test]
    async fn different_handlers_track_separately() {
        let store = InMemoryProcessedEventStore::new();
        let event_id = EventId::from_string("evt_77");

        store.mark_processed(&event_id, "GatewayWebhook").await.unwrap();

        assert!(store.contains(&event_id, "GatewayWebhook").await.unwrap());
        assert!(!store.contains(&event_id, "SettlementVerify").await.unwrap());
    }

    #[tokio::test]
    async fn mark_processed_is_idempotent() {
        let store = InMemoryProcessedEventStore::new();
        let event_id = EventId::from_string("evt_88");

        store.mark_processed(&event_id, "GatewayWebhook").await.unwrap();
        store.mark_processed(&event_id, "GatewayWebhook").await.unwrap();

        assert!(store.contains(&event_id, "GatewayWebhook").await.unwrap());
    }
}
