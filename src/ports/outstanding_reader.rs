//! OutstandingReader port - read model over the ledger for dashboards.
//!
//! Never a source of truth: implementations derive every answer from the
//! ledger at call time, so the summary can never drift from the rows.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{DomainError, EmailAddress, Money};

/// Per-payment-method slice of a provider's history.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MethodBreakdown {
    pub cash_count: u64,
    pub cash_amount: Money,
    pub card_count: u64,
    pub card_amount: Money,
}

/// Per-provider commission summary for dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct OutstandingSummary {
    pub provider_email: EmailAddress,

    /// Sum of `commission_owed` over outstanding cash transactions.
    /// Always equals what the ledger rows themselves sum to.
    pub total_owed: Money,

    /// Number of outstanding transactions.
    pub transaction_count: u64,

    /// Outstanding transactions older than the overdue threshold
    /// (includes `Pending` rows the sweep has not yet visited).
    pub overdue_count: u64,
    pub overdue_amount: Money,

    /// Provider's lifetime earnings: sum of payouts on completed payments.
    pub total_earned: Money,

    /// Counts and gross amounts by payment method.
    pub breakdown: MethodBreakdown,
}

/// Port for the per-provider outstanding commission read model.
#[async_trait]
pub trait OutstandingReader: Send + Sync {
    /// Builds the summary for one provider.
    ///
    /// `overdue_threshold_days` is configuration, passed at call time.
    async fn outstanding_summary(
        &self,
        provider_email: &EmailAddress,
        overdue_threshold_days: i64,
    ) -> Result<OutstandingSummary, DomainError>;
}
