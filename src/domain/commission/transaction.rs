//! The PaymentTransaction ledger entry.
//!
//! One row per completed booking payment. Created exactly once, never
//! deleted; only the three status lifecycles and their reference/timestamp
//! fields ever change, and only through the ledger's dedicated operations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    BookingId, BusinessId, EmailAddress, Money, Timestamp, TransactionId, ValidationError,
};

use super::{
    CommissionBreakdown, CommissionStatus, PaymentMethod, PaymentStatus, PayoutStatus,
    ProviderTier, ServiceType,
};

/// Frozen snapshot of the rate inputs at calculation time.
///
/// Persisted alongside the transaction so audits can explain the applied
/// rate even after the rate table changes. Never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionMetadata {
    pub tier: ProviderTier,
    pub service_type: ServiceType,
    pub rate: Decimal,
}

/// A ledger row for one booking payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentTransaction {
    pub id: TransactionId,
    pub booking_id: BookingId,
    pub business_id: BusinessId,
    pub provider_email: EmailAddress,
    pub customer_email: EmailAddress,

    pub total_amount: Money,
    pub platform_commission: Money,
    pub provider_payout: Money,
    pub commission_owed: Money,

    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub commission_status: CommissionStatus,

    /// Gateway charge reference, recorded when the charge webhook lands.
    pub payment_method_reference: Option<String>,
    /// Gateway or manual reference for the commission settlement.
    pub commission_payment_reference: Option<String>,
    pub commission_paid_date: Option<Timestamp>,

    pub payout_status: PayoutStatus,
    pub payout_reference: Option<String>,

    pub metadata: CommissionMetadata,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PaymentTransaction {
    /// Creates a new ledger entry for a completed booking payment.
    ///
    /// The money fields come from a [`CommissionBreakdown`] so the sum
    /// invariant is established at construction and the metadata snapshot
    /// is frozen from the same inputs.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the gross amount is not positive.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        booking_id: BookingId,
        business_id: BusinessId,
        provider_email: EmailAddress,
        customer_email: EmailAddress,
        total_amount: Money,
        breakdown: CommissionBreakdown,
        payment_method: PaymentMethod,
        tier: ProviderTier,
        service_type: ServiceType,
    ) -> Result<Self, ValidationError> {
        if !total_amount.is_positive() {
            return Err(ValidationError::non_positive_amount(
                "total_amount",
                total_amount,
            ));
        }

        let now = Timestamp::now();
        Ok(Self {
            id: TransactionId::new(),
            booking_id,
            business_id,
            provider_email,
            customer_email,
            total_amount,
            platform_commission: breakdown.platform_commission,
            provider_payout: breakdown.provider_payout,
            commission_owed: breakdown.commission_owed,
            payment_method,
            payment_status: PaymentStatus::Pending,
            commission_status: CommissionStatus::Pending,
            payment_method_reference: None,
            commission_payment_reference: None,
            commission_paid_date: None,
            payout_status: PayoutStatus::Pending,
            payout_reference: None,
            metadata: CommissionMetadata {
                tier,
                service_type,
                rate: breakdown.rate,
            },
            created_at: now,
            updated_at: now,
        })
    }

    /// True if the gateway deducts the commission at settlement, so a
    /// successful charge webhook also collects the commission.
    pub fn auto_collects_commission(&self) -> bool {
        self.payment_method == PaymentMethod::Card
    }

    /// Field-equality idempotency guard for charge webhooks: this exact
    /// gateway reference has already been applied as a successful charge.
    pub fn charge_already_applied(&self, reference: &str) -> bool {
        self.payment_status == PaymentStatus::Completed
            && self.payment_method_reference.as_deref() == Some(reference)
    }

    /// Field-equality idempotency guard for commission settlements: this
    /// settlement reference has already been recorded and collected.
    pub fn settlement_already_applied(&self, reference: &str) -> bool {
        self.commission_status == CommissionStatus::Collected
            && self.commission_payment_reference.as_deref() == Some(reference)
    }

    /// Whether this row's commission would be overdue at `now` given a
    /// threshold in days, based on its creation time.
    pub fn is_past_overdue_threshold(&self, now: Timestamp, threshold_days: i64) -> bool {
        self.created_at.days_until(&now) > threshold_days
    }
}

/// Detail payload for a commission status change.
///
/// Carried alongside the target status through the ledger's conditional
/// update so reference and paid-date land in the same atomic write.
#[derive(Debug, Clone, Default)]
pub struct CommissionStatusDetails {
    pub payment_reference: Option<String>,
    pub paid_date: Option<Timestamp>,
}

impl CommissionStatusDetails {
    /// Details for a collection: reference plus the settlement time.
    pub fn collected(reference: impl Into<String>, paid_date: Timestamp) -> Self {
        Self {
            payment_reference: Some(reference.into()),
            paid_date: Some(paid_date),
        }
    }

    /// Empty details, for transitions that carry no reference.
    pub fn none() -> Self {
        Self::default()
    }
}
