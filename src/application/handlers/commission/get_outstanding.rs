//! GetOutstandingHandler - per-provider outstanding commission query.

use std::sync::Arc;

use crate::domain::commission::{CommissionError, PaymentTransaction};
use crate::domain::foundation::EmailAddress;
use crate::ports::{OutstandingReader, OutstandingSummary, TransactionLedger};

/// Query for a provider's outstanding commission.
#[derive(Debug, Clone)]
pub struct GetOutstandingQuery {
    pub provider_email: EmailAddress,
}

/// Summary plus the underlying outstanding rows.
#[derive(Debug, Clone)]
pub struct OutstandingResult {
    pub summary: OutstandingSummary,
    pub transactions: Vec<PaymentTransaction>,
}

/// Handler for the outstanding commission read model.
///
/// Derives everything from the ledger on each call; there is no separately
/// maintained counter to drift.
pub struct GetOutstandingHandler {
    ledger: Arc<dyn TransactionLedger>,
    reader: Arc<dyn OutstandingReader>,
    overdue_threshold_days: i64,
}

impl GetOutstandingHandler {
    pub fn new(
        ledger: Arc<dyn TransactionLedger>,
        reader: Arc<dyn OutstandingReader>,
        overdue_threshold_days: i64,
    ) -> Self {
        Self {
            ledger,
            reader,
            overdue_threshold_days,
        }
    }

    pub async fn handle(
        &self,
        query: GetOutstandingQuery,
    ) -> Result<OutstandingResult, CommissionError> {
        let summary = self
            .reader
            .outstanding_summary(&query.provider_email, self.overdue_threshold_days)
            .await?;
        let transactions = self
            .ledger
            .outstanding_for_provider(&query.provider_email)
            .await?;

        Ok(OutstandingResult {
            summary,
            transactions,
        })
    }
}
