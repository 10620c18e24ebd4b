//! Port interfaces between the application layer and the outside world.

mod audit_log;
mod outstanding_reader;
mod payment_gateway;
mod payment_request_repository;
mod processed_event_store;
mod transaction_ledger;

pub use audit_log::AuditLog;
pub use outstanding_reader::{MethodBreakdown, OutstandingReader, OutstandingSummary};
pub use payment_gateway::{
    ChargeStatus, GatewayError, GatewayErrorCode, InitializePaymentRequest, InitializedPayment,
    PaymentGateway, VerifiedPayment,
};
pub use payment_request_repository::PaymentRequestRepository;
pub use processed_event_store::ProcessedEventStore;
pub use transaction_ledger::TransactionLedger;
