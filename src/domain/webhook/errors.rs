//! Error types for webhook verification and parsing.

use thiserror::Error;

/// Errors from webhook signature verification and envelope parsing.
#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    /// Signature digest does not match, or the header is not valid hex.
    #[error("Webhook signature verification failed")]
    InvalidSignature,

    /// The `X-Signature` header is absent.
    #[error("Missing webhook signature header")]
    MissingSignature,

    /// The payload is not a valid event envelope.
    #[error("Failed to parse webhook payload: {0}")]
    ParseError(String),
}
