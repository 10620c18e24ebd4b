//! Append-only audit entries.
//!
//! Written for provider-tier changes and manual verification decisions.
//! Entries are never mutated or deleted.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// One immutable audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// What happened, e.g. `provider_tier_changed`.
    pub action: String,
    /// Actor that performed the action.
    pub performed_by: String,
    pub performed_at: Timestamp,
    /// Human-supplied reason, if any.
    pub reason: Option<String>,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
}

impl AuditEntry {
    /// Audit record for a provider tier change.
    pub fn tier_changed(
        performed_by: impl Into<String>,
        previous: impl Into<String>,
        new: impl Into<String>,
        reason: Option<String>,
    ) -> Self {
        Self {
            action: "provider_tier_changed".to_string(),
            performed_by: performed_by.into(),
            performed_at: Timestamp::now(),
            reason,
            previous_value: Some(previous.into()),
            new_value: Some(new.into()),
        }
    }

    /// Audit record for an admin decision on a manual payment request.
    pub fn payment_request_decided(
        performed_by: impl Into<String>,
        request_id: impl Into<String>,
        decision: impl Into<String>,
        reason: Option<String>,
    ) -> Self {
        Self {
            action: "commission_payment_request_decided".to_string(),
            performed_by: performed_by.into(),
            performed_at: Timestamp::now(),
            reason,
            previous_value: Some(request_id.into()),
            new_value: Some(decision.into()),
        }
    }
}
