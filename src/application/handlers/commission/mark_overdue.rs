//! MarkOverdueHandler - ages outstanding commissions past the threshold.
//!
//! Triggered by an admin endpoint or an external scheduler; the engine
//! itself runs no long-lived tasks. The sweep is a single conditional
//! update, safe to run repeatedly.

use std::sync::Arc;

use crate::domain::commission::CommissionError;
use crate::domain::foundation::Timestamp;
use crate::ports::TransactionLedger;

/// Handler for the overdue sweep.
pub struct MarkOverdueHandler {
    ledger: Arc<dyn TransactionLedger>,
    overdue_threshold_days: i64,
}

impl MarkOverdueHandler {
    pub fn new(ledger: Arc<dyn TransactionLedger>, overdue_threshold_days: i64) -> Self {
        Self {
            ledger,
            overdue_threshold_days,
        }
    }

    /// Transitions pending cash commissions older than the threshold to
    /// `Overdue`. Returns the number of rows transitioned.
    pub async fn handle(&self) -> Result<u64, CommissionError> {
        let cutoff = Timestamp::now().minus_days(self.overdue_threshold_days);
        let swept = self.ledger.mark_overdue(cutoff).await?;
        if swept > 0 {
            tracing::info!(swept, "commissions marked overdue");
        }
        Ok(swept)
    }
}
