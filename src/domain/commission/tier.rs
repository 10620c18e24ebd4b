//! Provider tier classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Commercial tier of a service provider.
///
/// The tier determines which commission rate row applies. PREMIUM is a
/// discounted rate offered as an incentive; STANDARD is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderTier {
    Standard,
    Premium,
}

impl ProviderTier {
    /// Stable string form used in storage and gateway metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderTier::Standard => "standard",
            ProviderTier::Premium => "premium",
        }
    }

    /// Parses a stored tier string.
    ///
    /// Unrecognized values fall back to `Standard`, the documented default,
    /// so a stale or foreign value never fails a transaction. The fallback
    /// is logged for observability.
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "standard" => ProviderTier::Standard,
            "premium" => ProviderTier::Premium,
            other => {
                tracing::warn!(tier = other, "unrecognized provider tier, using standard");
                ProviderTier::Standard
            }
        }
    }
}

impl Default for ProviderTier {
    fn default() -> Self {
        ProviderTier::Standard
    }
}

impl fmt::Display for ProviderTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
