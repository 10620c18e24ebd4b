//! VerifyManualPaymentHandler - admin decision on a manual settlement.
//!
//! Confirming collects every referenced transaction's commission.
//! Rejecting returns each transaction to where it would be had the
//! submission never happened: `Pending`, or `Overdue` if it is already
//! past the configured threshold.

use std::sync::Arc;

use crate::domain::commission::{CommissionError, CommissionStatus, CommissionStatusDetails};
use crate::domain::foundation::{PaymentRequestId, Timestamp};
use crate::domain::settlement::{AuditEntry, CommissionPaymentRequest};
use crate::ports::{AuditLog, PaymentRequestRepository, TransactionLedger};

/// Admin decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationDecision {
    Confirm,
    Reject,
}

/// Command carrying the admin decision.
#[derive(Debug, Clone)]
pub struct VerifyManualPaymentCommand {
    pub request_id: PaymentRequestId,
    /// Admin performing the verification.
    pub admin: String,
    pub decision: VerificationDecision,
    pub reason: Option<String>,
}

/// Handler for admin verification of manual settlements.
pub struct VerifyManualPaymentHandler {
    ledger: Arc<dyn TransactionLedger>,
    requests: Arc<dyn PaymentRequestRepository>,
    audit_log: Arc<dyn AuditLog>,
    overdue_threshold_days: i64,
}

impl VerifyManualPaymentHandler {
    pub fn new(
        ledger: Arc<dyn TransactionLedger>,
        requests: Arc<dyn PaymentRequestRepository>,
        audit_log: Arc<dyn AuditLog>,
        overdue_threshold_days: i64,
    ) -> Self {
        Self {
            ledger,
            requests,
            audit_log,
            overdue_threshold_days,
        }
    }

    pub async fn handle(
        &self,
        cmd: VerifyManualPaymentCommand,
    ) -> Result<CommissionPaymentRequest, CommissionError> {
        let mut request = self
            .requests
            .find_by_id(&cmd.request_id)
            .await?
            .ok_or_else(|| {
                CommissionError::not_found(format!("Payment request {}", cmd.request_id))
            })?;

        let now = Timestamp::now();
        match cmd.decision {
            VerificationDecision::Confirm => {
                request.verify(cmd.admin.clone(), now)?;
                self.requests.update(&request).await?;
                self.collect_transactions(&request, now).await?;
            }
            VerificationDecision::Reject => {
                request.reject(cmd.admin.clone(), now)?;
                self.requests.update(&request).await?;
                self.revert_transactions(&request, now).await?;
            }
        }

        let decision = match cmd.decision {
            VerificationDecision::Confirm => "verified",
            VerificationDecision::Reject => "rejected",
        };
        self.audit_log
            .append(&AuditEntry::payment_request_decided(
                cmd.admin,
                request.id.to_string(),
                decision,
                cmd.reason,
            ))
            .await?;

        Ok(request)
    }

    async fn collect_transactions(
        &self,
        request: &CommissionPaymentRequest,
        now: Timestamp,
    ) -> Result<(), CommissionError> {
        for id in &request.transaction_ids {
            self.ledger
                .update_commission_status(
                    id,
                    CommissionStatus::Collected,
                    CommissionStatusDetails::collected(request.reference.clone(), now),
                )
                .await?;
        }
        Ok(())
    }

    async fn revert_transactions(
        &self,
        request: &CommissionPaymentRequest,
        now: Timestamp,
    ) -> Result<(), CommissionError> {
        for id in &request.transaction_ids {
            let Some(transaction) = self.ledger.find_by_id(id).await? else {
                tracing::warn!(transaction_id = %id, "rejected request references missing row");
                continue;
            };

            let target = if transaction.is_past_overdue_threshold(now, self.overdue_threshold_days)
            {
                CommissionStatus::Overdue
            } else {
                CommissionStatus::Pending
            };

            self.ledger
                .update_commission_status(id, target, CommissionStatusDetails::none())
                .await?;
        }
        Ok(())
    }
}
