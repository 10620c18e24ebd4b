//! Status state machines for the transaction ledger.
//!
//! Three independent lifecycles live on each ledger row: the customer
//! payment, the platform's commission collection, and the provider payout.
//! Each is a closed enum with an explicit transition table; the ledger
//! validates the edge before writing, never by overwriting the field.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Lifecycle of the underlying customer payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting gateway confirmation.
    Pending,
    /// Charge confirmed by the gateway (or taken in person for cash).
    Completed,
    /// Charge failed at the gateway.
    Failed,
}

impl PaymentStatus {
    /// Stable string form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            (Pending, Completed) | (Pending, Failed)
            // A retried charge may succeed after a failure
                | (Failed, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Completed, Failed],
            Failed => vec![Completed],
            Completed => vec![],
        }
    }
}

/// Lifecycle of the platform's commission collection.
///
/// Independent of [`PaymentStatus`]: a cash booking's payment completes in
/// person while its commission stays outstanding for weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    /// Commission not yet collected (cash) or not yet confirmed (card).
    Pending,
    /// Provider self-reported a settlement; awaiting admin verification.
    PendingVerification,
    /// Outstanding past the configured threshold.
    Overdue,
    /// Commission is in the platform's hands. Terminal.
    Collected,
}

impl CommissionStatus {
    /// Stable string form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionStatus::Pending => "pending",
            CommissionStatus::PendingVerification => "pending_verification",
            CommissionStatus::Overdue => "overdue",
            CommissionStatus::Collected => "collected",
        }
    }

    /// True while the commission still counts toward the provider's
    /// outstanding balance.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, CommissionStatus::Pending | CommissionStatus::Overdue)
    }
}

impl StateMachine for CommissionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CommissionStatus::*;
        matches!(
            (self, target),
            // From PENDING
            (Pending, Collected)
                | (Pending, PendingVerification)
                | (Pending, Overdue)
            // From OVERDUE: manual settlement, or batch settlement webhook
                | (Overdue, PendingVerification)
                | (Overdue, Collected)
            // From PENDING_VERIFICATION: admin decision
                | (PendingVerification, Collected)
                | (PendingVerification, Pending)
                | (PendingVerification, Overdue)
            // COLLECTED is terminal
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CommissionStatus::*;
        match self {
            Pending => vec![Collected, PendingVerification, Overdue],
            Overdue => vec![PendingVerification, Collected],
            PendingVerification => vec![Collected, Pending, Overdue],
            Collected => vec![],
        }
    }
}

/// Lifecycle of the provider payout transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    /// Transfer not yet confirmed.
    Pending,
    /// Transfer landed in the provider's account.
    Completed,
    /// Transfer failed at the gateway.
    Failed,
}

impl PayoutStatus {
    /// Stable string form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Completed => "completed",
            PayoutStatus::Failed => "failed",
        }
    }
}

impl StateMachine for PayoutStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PayoutStatus::*;
        matches!(
            (self, target),
            (Pending, Completed) | (Pending, Failed)
            // Retried transfers may succeed later
                | (Failed, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PayoutStatus::*;
        match self {
            Pending => vec![Completed, Failed],
            Failed => vec![Completed],
            Completed => vec![],
        }
    }
}
