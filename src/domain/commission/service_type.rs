//! Service type classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of service a booking was made for.
///
/// Emergency callouts may carry a different commission rate than standard
/// scheduled work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Standard,
    Emergency,
}

impl ServiceType {
    /// Stable string form used in storage and gateway metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Standard => "standard",
            ServiceType::Emergency => "emergency",
        }
    }

    /// Parses a stored service type string.
    ///
    /// Unrecognized values fall back to `Standard` with a log entry rather
    /// than failing the transaction.
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "standard" => ServiceType::Standard,
            "emergency" => ServiceType::Emergency,
            other => {
                tracing::warn!(service_type = other, "unrecognized service type, using standard");
                ServiceType::Standard
            }
        }
    }
}

impl Default for ServiceType {
    fn default() -> Self {
        ServiceType::Standard
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
