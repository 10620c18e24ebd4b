//! Manual commission payment requests.
//!
//! A provider self-reports a cash-commission settlement against a set of
//! ledger rows. The request sits in a verification queue until an admin
//! confirms or rejects it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    EmailAddress, Money, PaymentRequestId, StateMachine, Timestamp, TransactionId,
    ValidationError,
};

/// Verification state of a manual payment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted by the provider, awaiting an admin decision.
    PendingVerification,
    /// Admin confirmed the settlement. Terminal.
    Verified,
    /// Admin rejected the settlement. Terminal.
    Rejected,
}

impl RequestStatus {
    /// Stable string form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::PendingVerification => "pending_verification",
            RequestStatus::Verified => "verified",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl StateMachine for RequestStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use RequestStatus::*;
        matches!(
            (self, target),
            (PendingVerification, Verified) | (PendingVerification, Rejected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use RequestStatus::*;
        match self {
            PendingVerification => vec![Verified, Rejected],
            Verified => vec![],
            Rejected => vec![],
        }
    }
}

/// A provider's self-reported cash-commission settlement.
#[derive(Debug, Clone, PartialEq)]
pub struct CommissionPaymentRequest {
    pub id: PaymentRequestId,
    pub provider_email: EmailAddress,
    /// Amount the provider claims to have settled. Always re-verified
    /// against the ledger before acceptance.
    pub amount: Money,
    /// Ledger rows this settlement covers.
    pub transaction_ids: Vec<TransactionId>,
    /// Provider-supplied reference (bank slip, deposit id).
    pub reference: String,
    pub status: RequestStatus,
    pub submitted_at: Timestamp,
    pub verified_at: Option<Timestamp>,
    pub verified_by: Option<String>,
}

impl CommissionPaymentRequest {
    /// Creates a new request in `PendingVerification`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the amount is not positive, no
    /// transactions are referenced, or the reference is empty.
    pub fn submit(
        provider_email: EmailAddress,
        amount: Money,
        transaction_ids: Vec<TransactionId>,
        reference: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let reference = reference.into();
        if !amount.is_positive() {
            return Err(ValidationError::non_positive_amount("amount", amount));
        }
        if transaction_ids.is_empty() {
            return Err(ValidationError::empty_field("transaction_ids"));
        }
        if reference.trim().is_empty() {
            return Err(ValidationError::empty_field("reference"));
        }

        Ok(Self {
            id: PaymentRequestId::new(),
            provider_email,
            amount,
            transaction_ids,
            reference,
            status: RequestStatus::PendingVerification,
            submitted_at: Timestamp::now(),
            verified_at: None,
            verified_by: None,
        })
    }

    /// Marks the request verified by the given admin.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the request is no longer pending.
    pub fn verify(&mut self, admin: impl Into<String>, at: Timestamp) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(RequestStatus::Verified)?;
        self.verified_by = Some(admin.into());
        self.verified_at = Some(at);
        Ok(())
    }

    /// Marks the request rejected by the given admin.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the request is no longer pending.
    pub fn reject(&mut self, admin: impl Into<String>, at: Timestamp) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(RequestStatus::Rejected)?;
        self.verified_by = Some(admin.into());
        self.verified_at = Some(at);
        Ok(())
    }
}
