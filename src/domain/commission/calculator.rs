//! Commission calculator.
//!
//! Derives the platform commission, provider payout, and commission owed
//! for a gross booking amount. Rounding happens exactly once, on the
//! platform commission; the payout is the remainder, so the split always
//! sums back to the gross amount.

use rust_decimal::Decimal;

use crate::domain::foundation::{Money, ValidationError};

use super::{PaymentMethod, ProviderTier, RateTable, ServiceType};

/// The computed money split for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionBreakdown {
    /// Rate applied, as configured at calculation time.
    pub rate: Decimal,
    /// Platform's share, rounded half-up to the minor unit.
    pub platform_commission: Money,
    /// Provider's share: gross minus commission, never rounded separately.
    pub provider_payout: Money,
    /// Amount the provider still owes the platform. Zero for card payments,
    /// where the gateway deducts the commission at settlement.
    pub commission_owed: Money,
}

/// Calculator over a rate table.
#[derive(Debug, Clone, Copy)]
pub struct CommissionCalculator {
    table: RateTable,
}

impl CommissionCalculator {
    /// Creates a calculator over the given rate table.
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }

    /// Computes the commission split for a gross amount.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `total_amount` is not strictly positive.
    pub fn calculate(
        &self,
        total_amount: Money,
        tier: ProviderTier,
        service_type: ServiceType,
        payment_method: PaymentMethod,
    ) -> Result<CommissionBreakdown, ValidationError> {
        if !total_amount.is_positive() {
            return Err(ValidationError::non_positive_amount(
                "total_amount",
                total_amount,
            ));
        }

        let rate = self.table.rate(tier, service_type, payment_method);
        let platform_commission = total_amount.apply_rate(rate).round2();
        let provider_payout = total_amount - platform_commission;
        let commission_owed = if payment_method.is_cash() {
            platform_commission
        } else {
            Money::ZERO
        };

        Ok(CommissionBreakdown {
            rate,
            platform_commission,
            provider_payout,
            commission_owed,
        })
    }
}

impl Default for CommissionCalculator {
    fn default() -> Self {
        Self::new(RateTable::default())
    }
}
