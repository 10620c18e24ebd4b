//! Gateway webhook verification and event classification.

mod errors;
mod event;
mod verifier;

pub use errors::WebhookError;
pub use event::{
    GatewayCustomer, GatewayEvent, GatewayEventData, GatewayEventKind, SettlementMetadata,
};
pub use verifier::WebhookVerifier;

#[cfg(test)]
pub use verifier::compute_test_signature;
