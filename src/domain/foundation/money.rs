//! Monetary amount value object.
//!
//! Amounts are fixed-point decimals in a single currency. Rounding to the
//! currency's minor unit uses half-up rounding, applied explicitly by the
//! caller; arithmetic itself never rounds.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A monetary amount in the platform currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// The zero amount.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Creates a Money value from a decimal.
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the inner decimal.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Rounds to two decimal places using half-up rounding.
    ///
    /// Half-up means 0.005 rounds to 0.01, never banker's rounding.
    pub fn round2(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiplies by a dimensionless rate without rounding.
    pub fn apply_rate(&self, rate: Decimal) -> Self {
        Self(self.0 * rate)
    }

    /// True for amounts strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// True for the zero amount.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True if the absolute difference to `other` is within `epsilon`.
    ///
    /// Used to compare client-submitted totals against server-recomputed
    /// ones without being tripped up by minor-unit representation.
    pub fn approx_eq(&self, other: &Money, epsilon: Decimal) -> bool {
        (self.0 - other.0).abs() <= epsilon
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
