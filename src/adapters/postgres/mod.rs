//! PostgreSQL adapters for the persistence ports.

mod audit_log;
mod outstanding_reader;
mod payment_request_repository;
mod processed_event_store;
mod transaction_ledger;

pub use audit_log::PostgresAuditLog;
pub use outstanding_reader::PostgresOutstandingReader;
pub use payment_request_repository::PostgresPaymentRequestRepository;
pub use processed_event_store::PostgresProcessedEventStore;
pub use transaction_ledger::PostgresTransactionLedger;
