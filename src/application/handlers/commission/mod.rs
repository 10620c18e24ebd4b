//! Command and query handlers for the commission engine.

mod get_outstanding;
mod ingest_webhook;
mod initialize_payment;
mod mark_overdue;
mod record_payment;
mod settlement_batch;
mod submit_manual_payment;
mod verify_manual_payment;
mod verify_payment;

pub use get_outstanding::{GetOutstandingHandler, GetOutstandingQuery, OutstandingResult};
pub use ingest_webhook::{IngestGatewayWebhookHandler, IngestOutcome, IngestWebhookCommand};
pub use initialize_payment::{
    InitializeCommissionPaymentCommand, InitializeCommissionPaymentHandler,
};
pub use mark_overdue::MarkOverdueHandler;
pub use record_payment::{RecordBookingPaymentCommand, RecordBookingPaymentHandler};
pub use settlement_batch::AMOUNT_EPSILON;
pub use submit_manual_payment::{SubmitManualPaymentCommand, SubmitManualPaymentHandler};
pub use verify_manual_payment::{
    VerificationDecision, VerifyManualPaymentCommand, VerifyManualPaymentHandler,
};
pub use verify_payment::{
    VerifyCommissionPaymentCommand, VerifyCommissionPaymentHandler, VerifyPaymentOutcome,
};
