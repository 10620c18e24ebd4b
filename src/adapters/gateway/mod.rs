//! Payment gateway adapters.

mod http_gateway;
mod mock_gateway;

pub use http_gateway::{GatewayConfig, HttpPaymentGateway};
pub use mock_gateway::{settled_payment, MockPaymentGateway};
