//! Commission engine: rate determination, the money split, and the
//! transaction ledger's entity and status machines.

mod calculator;
mod errors;
mod payment_method;
mod rate_table;
mod service_type;
mod status;
mod tier;
mod transaction;

pub use calculator::{CommissionBreakdown, CommissionCalculator};
pub use errors::CommissionError;
pub use payment_method::PaymentMethod;
pub use rate_table::{CommissionRates, RateTable};
pub use service_type::ServiceType;
pub use status::{CommissionStatus, PaymentStatus, PayoutStatus};
pub use tier::ProviderTier;
pub use transaction::{CommissionMetadata, CommissionStatusDetails, PaymentTransaction};
