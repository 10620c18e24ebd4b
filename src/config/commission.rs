//! Commission configuration
//!
//! Rates and the overdue threshold are plain configuration, read at call
//! time; there is no cached mutable rate state anywhere in the process.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::commission::CommissionRates;

use super::error::ValidationError;

/// Commission configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CommissionConfig {
    /// Standard tier, standard service rate
    #[serde(default = "default_standard_rate")]
    pub standard_rate: Decimal,

    /// Premium tier, standard service rate (discounted)
    #[serde(default = "default_premium_rate")]
    pub premium_rate: Decimal,

    /// Standard tier, emergency callout rate
    #[serde(default = "default_emergency_standard_rate")]
    pub emergency_standard_rate: Decimal,

    /// Premium tier, emergency callout rate
    #[serde(default = "default_emergency_premium_rate")]
    pub emergency_premium_rate: Decimal,

    /// Days before an outstanding cash commission becomes overdue
    #[serde(default = "default_overdue_threshold_days")]
    pub overdue_threshold_days: i64,
}

impl CommissionConfig {
    /// The configured rates as the domain rate table input.
    pub fn rates(&self) -> CommissionRates {
        CommissionRates {
            standard: self.standard_rate,
            premium: self.premium_rate,
            emergency_standard: self.emergency_standard_rate,
            emergency_premium: self.emergency_premium_rate,
        }
    }

    /// Validate commission configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let rates = [
            ("standard_rate", self.standard_rate),
            ("premium_rate", self.premium_rate),
            ("emergency_standard_rate", self.emergency_standard_rate),
            ("emergency_premium_rate", self.emergency_premium_rate),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(ValidationError::InvalidCommissionRate(name));
            }
        }
        if self.overdue_threshold_days < 1 {
            return Err(ValidationError::InvalidOverdueThreshold);
        }
        Ok(())
    }
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            standard_rate: default_standard_rate(),
            premium_rate: default_premium_rate(),
            emergency_standard_rate: default_emergency_standard_rate(),
            emergency_premium_rate: default_emergency_premium_rate(),
            overdue_threshold_days: default_overdue_threshold_days(),
        }
    }
}

fn default_standard_rate() -> Decimal {
    CommissionRates::default().standard
}

fn default_premium_rate() -> Decimal {
    CommissionRates::default().premium
}

fn default_emergency_standard_rate() -> Decimal {
    CommissionRates::default().emergency_standard
}

fn default_emergency_premium_rate() -> Decimal {
    CommissionRates::default().emergency_premium
}

fn default_overdue_threshold_days() -> i64 {
    30
}
