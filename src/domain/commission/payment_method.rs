//! Payment method for a booking.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the customer paid for the booking.
///
/// CARD payments settle through the gateway, which deducts the platform
/// commission before payout. CASH payments leave the commission owed by the
/// provider until it is settled separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    /// Stable string form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }

    /// True for cash payments, where commission is collected after the fact.
    pub fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
