//! Foundation value objects and traits shared across the domain.

mod errors;
mod ids;
mod money;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{BookingId, BusinessId, EmailAddress, EventId, PaymentRequestId, TransactionId};
pub use money::Money;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
