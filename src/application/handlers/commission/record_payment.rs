//! RecordBookingPaymentHandler - creates the ledger entry for a booking.
//!
//! Invoked by the booking flow the moment a payment is confirmed. The
//! commission split is computed once here and frozen into the row's
//! metadata snapshot; it is never recomputed later.

use std::sync::Arc;

use crate::domain::commission::{
    CommissionCalculator, CommissionError, PaymentMethod, PaymentStatus, PaymentTransaction,
    ProviderTier, RateTable, ServiceType,
};
use crate::domain::foundation::{BookingId, BusinessId, EmailAddress, Money};
use crate::ports::TransactionLedger;

/// Command to record a completed booking payment.
#[derive(Debug, Clone)]
pub struct RecordBookingPaymentCommand {
    pub booking_id: BookingId,
    pub business_id: BusinessId,
    pub provider_email: EmailAddress,
    pub customer_email: EmailAddress,
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
    pub tier: ProviderTier,
    pub service_type: ServiceType,
    /// Gateway charge reference for card payments, known at initiation.
    pub payment_reference: Option<String>,
}

/// Handler that creates ledger entries for completed booking payments.
pub struct RecordBookingPaymentHandler {
    ledger: Arc<dyn TransactionLedger>,
    rate_table: RateTable,
}

impl RecordBookingPaymentHandler {
    pub fn new(ledger: Arc<dyn TransactionLedger>, rate_table: RateTable) -> Self {
        Self { ledger, rate_table }
    }

    pub async fn handle(
        &self,
        cmd: RecordBookingPaymentCommand,
    ) -> Result<PaymentTransaction, CommissionError> {
        // One entry per booking: a duplicate call returns the existing row
        if let Some(existing) = self.ledger.find_by_booking(&cmd.booking_id).await? {
            tracing::info!(booking_id = %cmd.booking_id, "ledger entry already exists");
            return Ok(existing);
        }

        let calculator = CommissionCalculator::new(self.rate_table);
        let breakdown = calculator.calculate(
            cmd.total_amount,
            cmd.tier,
            cmd.service_type,
            cmd.payment_method,
        )?;

        let mut transaction = PaymentTransaction::create(
            cmd.booking_id,
            cmd.business_id,
            cmd.provider_email,
            cmd.customer_email,
            cmd.total_amount,
            breakdown,
            cmd.payment_method,
            cmd.tier,
            cmd.service_type,
        )?;
        transaction.payment_method_reference = cmd.payment_reference;

        self.ledger.create(&transaction).await?;

        // Cash changes hands in person; there is no webhook to confirm it
        if cmd.payment_method.is_cash() {
            let transaction = self
                .ledger
                .update_payment_status(&transaction.id, PaymentStatus::Completed, None)
                .await?;
            return Ok(transaction);
        }

        Ok(transaction)
    }
}
