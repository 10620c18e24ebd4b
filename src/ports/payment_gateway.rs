//! Payment gateway port for the external payment-initialization API.
//!
//! The gateway hosts the card checkout: commission settlements are
//! initialized here, paid by the provider on the gateway's page, and
//! confirmed back either by webhook or by an explicit verify call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, Money};
use crate::domain::webhook::SettlementMetadata;

/// Port for payment gateway integrations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Initializes a commission settlement payment.
    ///
    /// Returns the gateway's checkout URL and the reference under which the
    /// charge will later be reported.
    async fn initialize_payment(
        &self,
        request: InitializePaymentRequest,
    ) -> Result<InitializedPayment, GatewayError>;

    /// Looks up the current status of a charge by its reference.
    async fn verify_payment(&self, reference: &str) -> Result<VerifiedPayment, GatewayError>;
}

/// Request to initialize a settlement charge.
#[derive(Debug, Clone, Serialize)]
pub struct InitializePaymentRequest {
    /// Provider paying the commission.
    pub email: EmailAddress,

    /// Amount in major currency units.
    pub amount: Money,

    /// Settlement metadata echoed back in the charge webhook.
    pub metadata: SettlementMetadata,
}

/// A successfully initialized charge.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializedPayment {
    /// URL the provider completes payment at.
    pub authorization_url: String,

    /// Gateway reference for the charge.
    pub reference: String,
}

/// Gateway-reported status of a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    /// Charge completed successfully.
    Success,
    /// Charge failed.
    Failed,
    /// Charge not yet completed.
    Pending,
    /// Customer abandoned the checkout.
    Abandoned,
}

/// Result of a charge verification lookup.
#[derive(Debug, Clone)]
pub struct VerifiedPayment {
    pub reference: String,
    pub status: ChargeStatus,
    /// Amount in major currency units, if the gateway reports it.
    pub amount: Option<Money>,
    /// Metadata attached at initialization time.
    pub metadata: Option<serde_json::Value>,
}

impl VerifiedPayment {
    /// Settlement metadata attached at initialization, if present.
    pub fn settlement_metadata(&self) -> Option<SettlementMetadata> {
        let value = self.metadata.clone()?;
        serde_json::from_value(value).ok()
    }
}

/// Errors from gateway operations.
#[derive(Debug, Clone)]
pub struct GatewayError {
    /// Error code for categorization.
    pub code: GatewayErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl GatewayError {
    /// Create a new gateway error.
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::NetworkError, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::AuthenticationError, message)
    }

    /// Create a not-found error for a charge reference.
    pub fn reference_not_found(reference: &str) -> Self {
        Self::new(
            GatewayErrorCode::NotFound,
            format!("charge {} not found", reference),
        )
    }

    /// Create a provider-side API error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

impl From<GatewayError> for DomainError {
    fn from(err: GatewayError) -> Self {
        DomainError::new(ErrorCode::GatewayError, err.message)
    }
}

/// Gateway error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Charge reference unknown to the gateway.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Gateway API error.
    ProviderError,
}

impl GatewayErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayErrorCode::NetworkError | GatewayErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GatewayErrorCode::NetworkError => "network_error",
            GatewayErrorCode::AuthenticationError => "authentication_error",
            GatewayErrorCode::NotFound => "not_found",
            GatewayErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            GatewayErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
