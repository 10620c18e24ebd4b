//! InitializeCommissionPaymentHandler - starts a gateway settlement charge.
//!
//! The provider pays outstanding cash commission by card through the
//! gateway checkout. The submitted amount is verified server-side before
//! anything is delegated; the gateway echoes the settlement metadata back
//! in its `charge.success` webhook, which performs the actual collection.

use std::sync::Arc;

use crate::domain::commission::CommissionError;
use crate::domain::foundation::{EmailAddress, Money, TransactionId};
use crate::domain::webhook::SettlementMetadata;
use crate::ports::{InitializePaymentRequest, InitializedPayment, PaymentGateway, TransactionLedger};

use super::settlement_batch::{check_submitted_amount, load_settlement_batch};

/// Command to initialize a gateway commission payment.
#[derive(Debug, Clone)]
pub struct InitializeCommissionPaymentCommand {
    pub provider_email: EmailAddress,
    pub amount: Money,
    pub transaction_ids: Vec<TransactionId>,
}

/// Handler that initializes settlement charges at the gateway.
pub struct InitializeCommissionPaymentHandler {
    ledger: Arc<dyn TransactionLedger>,
    gateway: Arc<dyn PaymentGateway>,
}

impl InitializeCommissionPaymentHandler {
    pub fn new(ledger: Arc<dyn TransactionLedger>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { ledger, gateway }
    }

    pub async fn handle(
        &self,
        cmd: InitializeCommissionPaymentCommand,
    ) -> Result<InitializedPayment, CommissionError> {
        let batch =
            load_settlement_batch(&self.ledger, &cmd.provider_email, &cmd.transaction_ids).await?;
        check_submitted_amount(cmd.amount, batch.total_owed)?;

        let metadata = SettlementMetadata::new(
            cmd.transaction_ids.iter().map(|id| id.to_string()).collect(),
            cmd.provider_email.as_str(),
        );

        let initialized = self
            .gateway
            .initialize_payment(InitializePaymentRequest {
                email: cmd.provider_email,
                amount: batch.total_owed,
                metadata,
            })
            .await
            .map_err(|e| CommissionError::Gateway(e.to_string()))?;

        tracing::info!(
            reference = %initialized.reference,
            amount = %batch.total_owed,
            "commission settlement initialized at gateway"
        );

        Ok(initialized)
    }
}
