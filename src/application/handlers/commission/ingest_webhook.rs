//! IngestGatewayWebhookHandler - applies gateway webhook events to the ledger.
//!
//! Deliveries are at-least-once and may arrive concurrently or out of
//! order. Correctness rests on three layers, in order: signature
//! verification before anything else, the processed-events log, and the
//! ledger's compare-and-swap updates (which also cover partially-applied
//! prior deliveries).

use std::sync::Arc;

use crate::domain::commission::{
    CommissionError, CommissionStatus, CommissionStatusDetails, PaymentStatus, PayoutStatus,
};
use crate::domain::foundation::{Timestamp, TransactionId};
use crate::domain::webhook::{GatewayEvent, GatewayEventKind, WebhookError, WebhookVerifier};
use crate::ports::{ProcessedEventStore, TransactionLedger};

/// Name under which this handler records processed events.
const HANDLER_NAME: &str = "GatewayWebhook";

/// Command to ingest one webhook delivery.
#[derive(Debug, Clone)]
pub struct IngestWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Value of the `X-Signature` header, if present.
    pub signature: Option<String>,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Booking charge confirmed; commission collected too if card-based.
    ChargeApplied {
        transaction_id: TransactionId,
        commission_collected: bool,
    },
    /// Batch commission settlement applied to the listed transactions.
    SettlementApplied { collected: usize },
    /// Charge failure recorded; commission untouched.
    ChargeFailureRecorded { transaction_id: TransactionId },
    /// Payout transfer status updated.
    PayoutUpdated { transaction_id: TransactionId },
    /// Event id already in the processed log; nothing re-applied.
    AlreadyProcessed,
    /// Recognized event that matched no ledger row; acknowledged.
    Unmatched,
    /// Event type this system does not act on; acknowledged.
    Ignored { event: String },
}

/// Handler for gateway webhook deliveries.
pub struct IngestGatewayWebhookHandler {
    ledger: Arc<dyn TransactionLedger>,
    processed_events: Arc<dyn ProcessedEventStore>,
    verifier: WebhookVerifier,
}

impl IngestGatewayWebhookHandler {
    pub fn new(
        ledger: Arc<dyn TransactionLedger>,
        processed_events: Arc<dyn ProcessedEventStore>,
        webhook_secret: impl Into<String>,
    ) -> Self {
        Self {
            ledger,
            processed_events,
            verifier: WebhookVerifier::new(webhook_secret),
        }
    }

    pub async fn handle(
        &self,
        cmd: IngestWebhookCommand,
    ) -> Result<IngestOutcome, CommissionError> {
        // 1. Verify signature over the raw body before touching the payload
        let signature = cmd
            .signature
            .as_deref()
            .ok_or(CommissionError::InvalidWebhookSignature)?;

        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, signature)
            .map_err(|e| match e {
                WebhookError::InvalidSignature | WebhookError::MissingSignature => {
                    CommissionError::InvalidWebhookSignature
                }
                WebhookError::ParseError(reason) => {
                    CommissionError::validation("payload", reason)
                }
            })?;

        // 2. Unrecognized events are acknowledged, never errors, so the
        //    gateway does not retry them
        let kind = event.classify();
        if let GatewayEventKind::Unknown(name) = &kind {
            tracing::info!(event = %name, "ignoring unrecognized gateway event");
            return Ok(IngestOutcome::Ignored { event: name.clone() });
        }

        // 3. Processed-events log: drop exact redeliveries up front
        let event_id = event.event_id();
        if let Some(id) = &event_id {
            if self.processed_events.contains(id, HANDLER_NAME).await? {
                tracing::info!(event_id = %id, "gateway event already processed");
                return Ok(IngestOutcome::AlreadyProcessed);
            }
        }

        // 4. Dispatch
        let outcome = match kind {
            GatewayEventKind::ChargeSuccess => self.apply_charge_success(&event).await?,
            GatewayEventKind::ChargeFailed => self.apply_charge_failed(&event).await?,
            GatewayEventKind::TransferSuccess => {
                self.apply_transfer(&event, PayoutStatus::Completed).await?
            }
            GatewayEventKind::TransferFailed => {
                self.apply_transfer(&event, PayoutStatus::Failed).await?
            }
            GatewayEventKind::Unknown(_) => unreachable!("handled above"),
        };

        // 5. Mark processed only after every ledger write succeeded; on a
        //    transient failure the gateway redelivers and the CAS updates
        //    converge
        if let Some(id) = &event_id {
            self.processed_events.mark_processed(id, HANDLER_NAME).await?;
        }

        Ok(outcome)
    }

    async fn apply_charge_success(
        &self,
        event: &GatewayEvent,
    ) -> Result<IngestOutcome, CommissionError> {
        // A charge carrying settlement metadata is a provider paying off
        // commission for a batch of ledger rows
        if let Some(settlement) = event.settlement_metadata() {
            let reference = event.data.reference.clone().ok_or_else(|| {
                CommissionError::validation("reference", "settlement charge without reference")
            })?;
            let collected = self
                .collect_batch(&settlement.transaction_ids, &reference)
                .await?;
            return Ok(IngestOutcome::SettlementApplied { collected });
        }

        // Otherwise it confirms a booking payment
        let reference = match event.data.reference.as_deref() {
            Some(r) => r,
            None => {
                tracing::warn!("charge.success without reference, acknowledging");
                return Ok(IngestOutcome::Unmatched);
            }
        };

        let transaction = match self.ledger.find_by_payment_reference(reference).await? {
            Some(t) => t,
            None => {
                tracing::warn!(reference, "charge.success matched no ledger row");
                return Ok(IngestOutcome::Unmatched);
            }
        };

        // Field-equality guard: this reference already applied as a success
        if transaction.charge_already_applied(reference) {
            return Ok(IngestOutcome::AlreadyProcessed);
        }

        let transaction = self
            .ledger
            .update_payment_status(
                &transaction.id,
                PaymentStatus::Completed,
                Some(reference.to_string()),
            )
            .await?;

        // Card charges settle commission at the processor; cash commission
        // stays outstanding until settled separately
        let mut commission_collected = false;
        if transaction.auto_collects_commission() {
            self.ledger
                .update_commission_status(
                    &transaction.id,
                    CommissionStatus::Collected,
                    CommissionStatusDetails::collected(reference, Timestamp::now()),
                )
                .await?;
            commission_collected = true;
        }

        Ok(IngestOutcome::ChargeApplied {
            transaction_id: transaction.id,
            commission_collected,
        })
    }

    async fn apply_charge_failed(
        &self,
        event: &GatewayEvent,
    ) -> Result<IngestOutcome, CommissionError> {
        let reference = match event.data.reference.as_deref() {
            Some(r) => r,
            None => return Ok(IngestOutcome::Unmatched),
        };

        let transaction = match self.ledger.find_by_payment_reference(reference).await? {
            Some(t) => t,
            None => {
                tracing::warn!(reference, "charge.failed matched no ledger row");
                return Ok(IngestOutcome::Unmatched);
            }
        };

        let transaction = self
            .ledger
            .update_payment_status(
                &transaction.id,
                PaymentStatus::Failed,
                Some(reference.to_string()),
            )
            .await?;

        Ok(IngestOutcome::ChargeFailureRecorded {
            transaction_id: transaction.id,
        })
    }

    async fn apply_transfer(
        &self,
        event: &GatewayEvent,
        new_status: PayoutStatus,
    ) -> Result<IngestOutcome, CommissionError> {
        let reference = match event.data.reference.as_deref() {
            Some(r) => r,
            None => return Ok(IngestOutcome::Unmatched),
        };

        match self
            .ledger
            .update_payout_status_by_reference(reference, new_status)
            .await?
        {
            Some(transaction) => Ok(IngestOutcome::PayoutUpdated {
                transaction_id: transaction.id,
            }),
            None => {
                tracing::warn!(reference, "transfer event matched no ledger row");
                Ok(IngestOutcome::Unmatched)
            }
        }
    }

    /// Collects commission on every transaction in a settlement batch.
    ///
    /// Each member update is an independent CAS, so a redelivered batch
    /// that was partially applied converges to the same end state.
    async fn collect_batch(
        &self,
        transaction_ids: &[String],
        reference: &str,
    ) -> Result<usize, CommissionError> {
        let paid_date = Timestamp::now();
        let mut collected = 0;

        for raw_id in transaction_ids {
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
                    CommissionStatusDetails::collected(reference, paid_date),
                )
                .await?;

            if updated.commission_status == CommissionStatus::Collected {
                collected += 1;
            }
        }

        Ok(collected)
    }
}
