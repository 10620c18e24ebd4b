//! Commission rate table.
//!
//! Single source of truth for the rate applied to any transaction. Every
//! call site goes through [`RateTable::rate`]; the chosen rate is frozen
//! into the transaction's metadata snapshot so historical rows stay
//! auditable after the table changes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{PaymentMethod, ProviderTier, ServiceType};

/// Configured commission rates per (tier, service type) cell.
///
/// Values are fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRates {
    /// Standard tier, standard service.
    pub standard: Decimal,
    /// Premium tier, standard service (discounted incentive rate).
    pub premium: Decimal,
    /// Standard tier, emergency callout.
    pub emergency_standard: Decimal,
    /// Premium tier, emergency callout.
    pub emergency_premium: Decimal,
}

impl Default for CommissionRates {
    fn default() -> Self {
        Self {
            standard: dec!(0.18),
            premium: dec!(0.15),
            emergency_standard: dec!(0.20),
            emergency_premium: dec!(0.17),
        }
    }
}

/// Pure lookup from (tier, service type, payment method) to a rate.
#[derive(Debug, Clone, Copy)]
pub struct RateTable {
    rates: CommissionRates,
}

impl RateTable {
    /// Creates a rate table over the given configured rates.
    pub fn new(rates: CommissionRates) -> Self {
        Self { rates }
    }

    /// Returns the commission rate for a transaction.
    ///
    /// Total over the enumerated domain: every combination maps to a rate,
    /// no error paths. The payment method is part of the audited inputs but
    /// does not change the rate; it only decides whether the commission is
    /// deducted at settlement (card) or owed afterwards (cash).
    pub fn rate(
        &self,
        tier: ProviderTier,
        service_type: ServiceType,
        _payment_method: PaymentMethod,
    ) -> Decimal {
        match (tier, service_type) {
            (ProviderTier::Standard, ServiceType::Standard) => self.rates.standard,
            (ProviderTier::Premium, ServiceType::Standard) => self.rates.premium,
            (ProviderTier::Standard, ServiceType::Emergency) => self.rates.emergency_standard,
            (ProviderTier::Premium, ServiceType::Emergency) => self.rates.emergency_premium,
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new(CommissionRates::default())
    }
}
