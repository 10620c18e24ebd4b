//! VerifyCommissionPaymentHandler - explicit settlement confirmation.
//!
//! Fallback for when the webhook is delayed or lost: the provider returns
//! from the gateway checkout and asks the platform to look the charge up
//! directly. Applies the same batch collection transition as the webhook
//! path; both paths are idempotent, so whichever lands second is a no-op.

use std::sync::Arc;

use crate::domain::commission::{CommissionError, CommissionStatus, CommissionStatusDetails};
use crate::domain::foundation::{EmailAddress, EventId, Timestamp, TransactionId};
use crate::ports::{ChargeStatus, PaymentGateway, ProcessedEventStore, TransactionLedger};

/// Name under which this handler records processed references.
const HANDLER_NAME: &str = "SettlementVerify";

/// Command to verify a settlement charge by reference.
#[derive(Debug, Clone)]
pub struct VerifyCommissionPaymentCommand {
    pub provider_email: EmailAddress,
    pub reference: String,
}

/// Result of a settlement verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyPaymentOutcome {
    /// Charge succeeded; commission collected on the batch.
    Settled { collected: usize },
    /// Charge has not (yet) succeeded at the gateway.
    NotSettled { status: &'static str },
}

/// Handler for provider-initiated settlement verification.
pub struct VerifyCommissionPaymentHandler {
    ledger: Arc<dyn TransactionLedger>,
    gateway: Arc<dyn PaymentGateway>,
    processed_events: Arc<dyn ProcessedEventStore>,
}

impl VerifyCommissionPaymentHandler {
    pub fn new(
        ledger: Arc<dyn TransactionLedger>,
        gateway: Arc<dyn PaymentGateway>,
        processed_events: Arc<dyn ProcessedEventStore>,
    ) -> Self {
        Self {
            ledger,
            gateway,
            processed_events,
        }
    }

    pub async fn handle(
        &self,
        cmd: VerifyCommissionPaymentCommand,
    ) -> Result<VerifyPaymentOutcome, CommissionError> {
        let payment = self
            .gateway
            .verify_payment(&cmd.reference)
            .await
            .map_err(|e| CommissionError::Gateway(e.to_string()))?;

        match payment.status {
            ChargeStatus::Success => {}
            ChargeStatus::Pending => {
                return Ok(VerifyPaymentOutcome::NotSettled { status: "pending" })
            }
            ChargeStatus::Failed => {
                return Ok(VerifyPaymentOutcome::NotSettled { status: "failed" })
            }
            ChargeStatus::Abandoned => {
                return Ok(VerifyPaymentOutcome::NotSettled { status: "abandoned" })
            }
        }

        let metadata = payment.settlement_metadata().ok_or_else(|| {
            CommissionError::validation("reference", "charge is not a commission settlement")
        })?;

        // The settlement must belong to the caller
        if metadata.provider_email != cmd.provider_email.as_str() {
            return Err(CommissionError::forbidden(
                "settlement belongs to another provider",
            ));
        }

        let paid_date = Timestamp::now();
        let mut collected = 0;
        for raw_id in &metadata.transaction_ids {
            let id: TransactionId = match raw_id.parse() {
                Ok(id) => id,
                Err(_) => {
                    tracing::warn!(transaction_id = %raw_id, "skipping malformed id in settlement");
                    continue;
                }
            };

            let updated = self
                .ledger
                .update_commission_status(
                    &id,
                    CommissionStatus::Collected,
                    CommissionStatusDetails::collected(cmd.reference.clone(), paid_date),
                )
                .await?;

            if updated.commission_status == CommissionStatus::Collected {
                collected += 1;
            }
        }

        // Record the reference so a later webhook for the same charge is
        // dropped at the processed-events layer too
        self.processed_events
            .mark_processed(&EventId::from_string(cmd.reference.clone()), HANDLER_NAME)
            .await?;

        Ok(VerifyPaymentOutcome::Settled { collected })
    }
}
