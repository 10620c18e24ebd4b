//! Manual settlement workflow: payment requests and audit records.

mod audit;
mod payment_request;

pub use audit::AuditEntry;
pub use payment_request::{CommissionPaymentRequest, RequestStatus};
