//! SubmitManualPaymentHandler - provider self-reports a cash settlement.

use std::sync::Arc;

use crate::domain::commission::{CommissionError, CommissionStatus, CommissionStatusDetails};
use crate::domain::foundation::{EmailAddress, Money, TransactionId};
use crate::domain::settlement::CommissionPaymentRequest;
use crate::ports::{PaymentRequestRepository, TransactionLedger};

use super::settlement_batch::{check_submitted_amount, load_settlement_batch};

/// Command to submit a manual commission payment.
#[derive(Debug, Clone)]
pub struct SubmitManualPaymentCommand {
    pub provider_email: EmailAddress,
    /// Amount the provider claims to have paid.
    pub amount: Money,
    pub transaction_ids: Vec<TransactionId>,
    /// Provider-supplied settlement reference (deposit slip, transfer id).
    pub reference: String,
}

/// Handler for manual settlement submissions.
pub struct SubmitManualPaymentHandler {
    ledger: Arc<dyn TransactionLedger>,
    requests: Arc<dyn PaymentRequestRepository>,
}

impl SubmitManualPaymentHandler {
    pub fn new(
        ledger: Arc<dyn TransactionLedger>,
        requests: Arc<dyn PaymentRequestRepository>,
    ) -> Self {
        Self { ledger, requests }
    }

    pub async fn handle(
        &self,
        cmd: SubmitManualPaymentCommand,
    ) -> Result<CommissionPaymentRequest, CommissionError> {
        // Recompute the owed total server-side; the client amount is a
        // claim, not a fact. Nothing is mutated on mismatch.
        let batch =
            load_settlement_batch(&self.ledger, &cmd.provider_email, &cmd.transaction_ids).await?;
        check_submitted_amount(cmd.amount, batch.total_owed)?;

        let request = CommissionPaymentRequest::submit(
            cmd.provider_email,
            cmd.amount,
            cmd.transaction_ids.clone(),
            cmd.reference,
        )?;
        self.requests.save(&request).await?;

        // Park each transaction in the verification queue. Each member
        // update is an independent CAS, so a retried submission converges.
        for transaction in &batch.transactions {
            self.ledger
                .update_commission_status(
                    &transaction.id,
                    CommissionStatus::PendingVerification,
                    CommissionStatusDetails::none(),
                )
                .await?;
        }

        tracing::info!(
            request_id = %request.id,
            transactions = batch.transactions.len(),
            "manual commission payment submitted"
        );

        Ok(request)
    }
}
