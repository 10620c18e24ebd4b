//! Shared validation for provider-submitted settlement batches.
//!
//! Both the manual submission and the gateway-initialize paths take a
//! client-supplied `{amount, transaction_ids[]}` pair. The expected total
//! is always recomputed server-side from the ledger; the client amount is
//! never authoritative.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use crate::domain::commission::{CommissionError, PaymentTransaction};
use crate::domain::foundation::{EmailAddress, Money, TransactionId};
use crate::ports::TransactionLedger;

/// Tolerance when comparing a submitted total to the recomputed one.
pub const AMOUNT_EPSILON: Decimal = dec!(0.01);

/// A validated batch of outstanding transactions with its recomputed total.
#[derive(Debug, Clone)]
pub struct SettlementBatch {
    pub transactions: Vec<PaymentTransaction>,
    /// Server-side sum of `commission_owed` over the batch.
    pub total_owed: Money,
}

/// Loads the referenced transactions and checks they are settleable by
/// this provider.
///
/// # Errors
///
/// - `NotFound` if any id does not exist
/// - `Forbidden` if a transaction belongs to a different provider
/// - `Validation` if a transaction is not a cash payment or its commission
///   is not outstanding
pub async fn load_settlement_batch(
    ledger: &Arc<dyn TransactionLedger>,
    provider_email: &EmailAddress,
    transaction_ids: &[TransactionId],
) -> Result<SettlementBatch, CommissionError> {
    if transaction_ids.is_empty() {
        return Err(CommissionError::validation(
            "transaction_ids",
            "at least one transaction is required",
        ));
    }

    let mut transactions = Vec::with_capacity(transaction_ids.len());
    for id in transaction_ids {
        let transaction = ledger
            .find_by_id(id)
            .await?
            .ok_or_else(|| CommissionError::not_found(format!("Transaction {}", id)))?;

        if &transaction.provider_email != provider_email {
            return Err(CommissionError::forbidden(format!(
                "transaction {} belongs to another provider",
                id
            )));
        }
        if !transaction.payment_method.is_cash() {
            return Err(CommissionError::validation(
                "transaction_ids",
                format!("transaction {} is not a cash payment", id),
            ));
        }
        if !transaction.commission_status.is_outstanding() {
            return Err(CommissionError::validation(
                "transaction_ids",
                format!("transaction {} has no outstanding commission", id),
            ));
        }

        transactions.push(transaction);
    }

    let total_owed: Money = transactions.iter().map(|t| t.commission_owed).sum();

    Ok(SettlementBatch {
        transactions,
        total_owed,
    })
}

/// Compares the client-submitted amount against the recomputed total.
///
/// # Errors
///
/// `AmountMismatch` if they differ by more than [`AMOUNT_EPSILON`].
pub fn check_submitted_amount(
    submitted: Money,
    total_owed: Money,
) -> Result<(), CommissionError> {
    if submitted.approx_eq(&total_owed, AMOUNT_EPSILON) {
        Ok(())
    } else {
        Err(CommissionError::AmountMismatch {
            submitted,
            expected: total_owed,
        })
    }
}
