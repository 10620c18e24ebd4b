//! Error type for commission operations.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, Money, ValidationError};

/// Errors surfaced by the commission engine's application handlers.
///
/// The taxonomy matches the HTTP boundary: validation and mismatches are
/// client errors, signature failures are 401, infrastructure failures are
/// retryable 5xx. State-machine conflicts never appear here; the ledger
/// treats them as idempotent no-ops.
#[derive(Debug, Clone, Error)]
pub enum CommissionError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation failed for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("Submitted amount {submitted} does not match outstanding commission {expected}")]
    AmountMismatch { submitted: Money, expected: Money },

    #[error("Webhook signature verification failed")]
    InvalidWebhookSignature,

    #[error("Not authorized: {0}")]
    Forbidden(String),

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl CommissionError {
    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CommissionError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a not-found error for a named resource.
    pub fn not_found(resource: impl Into<String>) -> Self {
        CommissionError::NotFound(resource.into())
    }

    /// Creates an authorization error.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        CommissionError::Forbidden(reason.into())
    }

    /// Creates an infrastructure error.
    pub fn infrastructure(message: impl Into<String>) -> Self {
        CommissionError::Infrastructure(message.into())
    }

    /// True for transient failures the caller should retry (5xx).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CommissionError::Infrastructure(_) | CommissionError::Gateway(_)
        )
    }
}

impl From<ValidationError> for CommissionError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::EmptyField { field }
            | ValidationError::NonPositiveAmount { field, .. }
            | ValidationError::InvalidFormat { field, .. } => CommissionError::Validation {
                field: field.clone(),
                reason: err.to_string(),
            },
        }
    }
}

impl From<DomainError> for CommissionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::TransactionNotFound | ErrorCode::PaymentRequestNotFound => {
                CommissionError::NotFound(err.message)
            }
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::InvalidFormat => CommissionError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "request".to_string()),
                reason: err.message,
            },
            ErrorCode::Unauthorized | ErrorCode::Forbidden => {
                CommissionError::Forbidden(err.message)
            }
            ErrorCode::GatewayError => CommissionError::Gateway(err.message),
            _ => CommissionError::Infrastructure(err.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amount_mismatch_displays_both_sides() {
        let err = CommissionError::AmountMismatch {
            submitted: Money::new(dec!(50.00)),
            expected: Money::new(dec!(49.00)),
        };
        let text = err.to_string();
        assert!(text.contains("50.00"));
        assert!(text.contains("49.00"));
    }

    #[test]
    fn transient_covers_infrastructure_and_gateway() {
        assert!(CommissionError::infrastructure("db down").is_transient());
        assert!(CommissionError::Gateway("timeout".into()).is_transient());
        assert!(!CommissionError::InvalidWebhookSignature.is_transient());
        assert!(!CommissionError::validation("amount", "must be positive").is_transient());
    }

    #[test]
    fn domain_error_not_found_maps_to_not_found() {
        let err = DomainError::new(ErrorCode::TransactionNotFound, "Transaction missing");
        assert!(matches!(
            CommissionError::from(err),
            CommissionError::NotFound(_)
        ));
    }

    #[test]
    fn domain_error_database_maps_to_infrastructure() {
        let err = DomainError::database("connection reset");
        assert!(matches!(
            CommissionError::from(err),
            CommissionError::Infrastructure(_)
        ));
    }
}
