//! TransactionLedger port - the only write path to the payment ledger.
//!
//! All status mutations go through dedicated conditional-update operations.
//! `update_commission_status` is a compare-and-swap: the write applies only
//! if the stored status is a valid predecessor of the target in the
//! commission state machine; otherwise the stored row is returned unchanged.
//! Repeated application of the same transition is therefore harmless, which
//! is the sole concurrency-correctness mechanism — webhook deliveries and
//! manual updates coordinate only through the store.

use async_trait::async_trait;

use crate::domain::commission::{
    CommissionStatus, CommissionStatusDetails, PaymentStatus, PaymentTransaction, PayoutStatus,
};
use crate::domain::foundation::{BookingId, DomainError, EmailAddress, Timestamp, TransactionId};

/// Port for the payment transaction ledger.
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    /// Persists a newly created transaction.
    ///
    /// A transaction is created exactly once; attempting to re-create an
    /// id is a `DomainError`.
    async fn create(&self, transaction: &PaymentTransaction) -> Result<(), DomainError>;

    /// Fetches a transaction by id.
    async fn find_by_id(
        &self,
        id: &TransactionId,
    ) -> Result<Option<PaymentTransaction>, DomainError>;

    /// Fetches the transaction for a booking, if any.
    async fn find_by_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<PaymentTransaction>, DomainError>;

    /// Fetches the transaction recorded against a gateway charge reference.
    async fn find_by_payment_reference(
        &self,
        reference: &str,
    ) -> Result<Option<PaymentTransaction>, DomainError>;

    /// Compare-and-swap commission status change.
    ///
    /// Applies the transition only if the stored status is a valid
    /// predecessor of `new_status`; otherwise returns the stored row
    /// unchanged (idempotent no-op, logged by implementations). When the
    /// target is `Collected`, implementations must zero `commission_owed`
    /// and record the reference/paid date from `details` in the same
    /// atomic write.
    async fn update_commission_status(
        &self,
        id: &TransactionId,
        new_status: CommissionStatus,
        details: CommissionStatusDetails,
    ) -> Result<PaymentTransaction, DomainError>;

    /// Conditional payment-status change, recording the gateway reference.
    ///
    /// Same no-op discipline as `update_commission_status`.
    async fn update_payment_status(
        &self,
        id: &TransactionId,
        new_status: PaymentStatus,
        reference: Option<String>,
    ) -> Result<PaymentTransaction, DomainError>;

    /// Conditional payout-status change for the transaction matching a
    /// payout reference. Returns `None` if no transaction matches.
    async fn update_payout_status_by_reference(
        &self,
        payout_reference: &str,
        new_status: PayoutStatus,
    ) -> Result<Option<PaymentTransaction>, DomainError>;

    /// Cash transactions for a provider whose commission is still
    /// outstanding (`Pending` or `Overdue`).
    async fn outstanding_for_provider(
        &self,
        provider_email: &EmailAddress,
    ) -> Result<Vec<PaymentTransaction>, DomainError>;

    /// Sweeps `Pending` cash commissions created before `cutoff` to
    /// `Overdue`. Returns the number of rows transitioned.
    async fn mark_overdue(&self, cutoff: Timestamp) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_ledger_is_object_safe() {
        fn _accepts_dyn(_ledger: &dyn TransactionLedger) {}
    }
}
