//! HTTP DTOs for the commission endpoints.
//!
//! JSON request/response structures: the boundary between HTTP and the
//! application layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::handlers::commission::OutstandingResult;
use crate::domain::commission::PaymentTransaction;
use crate::domain::settlement::CommissionPaymentRequest;
use crate::ports::{InitializedPayment, OutstandingSummary};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to record a completed booking payment (internal/admin API).
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPaymentRequest {
    pub booking_id: String,
    pub business_id: String,
    pub provider_email: String,
    pub customer_email: String,
    pub total_amount: Decimal,
    /// `cash` or `card`.
    pub payment_method: String,
    /// Provider tier snapshot at payment time.
    pub tier: String,
    /// Service type snapshot at payment time.
    pub service_type: String,
    /// Gateway charge reference for card payments.
    #[serde(default)]
    pub payment_reference: Option<String>,
}

/// Request to initialize a gateway commission settlement.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializePaymentRequestDto {
    pub amount: Decimal,
    pub transaction_ids: Vec<String>,
}

/// Request to verify a gateway settlement by reference.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentRequestDto {
    pub reference: String,
}

/// Request to submit a manual (cash) commission settlement.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitManualPaymentRequestDto {
    pub amount: Decimal,
    pub transaction_ids: Vec<String>,
    pub reference: String,
}

/// Admin decision on a manual payment request.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyManualPaymentRequestDto {
    /// `confirm` or `reject`.
    pub decision: String,
    #[serde(default)]
    pub reason: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Transaction view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionResponse {
    pub id: String,
    pub booking_id: String,
    pub provider_email: String,
    pub total_amount: Decimal,
    pub platform_commission: Decimal,
    pub provider_payout: Decimal,
    pub commission_owed: Decimal,
    pub payment_method: String,
    pub payment_status: String,
    pub commission_status: String,
    pub payout_status: String,
    pub created_at: String,
}

impl From<PaymentTransaction> for TransactionResponse {
    fn from(txn: PaymentTransaction) -> Self {
        Self {
            id: txn.id.to_string(),
            booking_id: txn.booking_id.to_string(),
            provider_email: txn.provider_email.to_string(),
            total_amount: txn.total_amount.amount(),
            platform_commission: txn.platform_commission.amount(),
            provider_payout: txn.provider_payout.amount(),
            commission_owed: txn.commission_owed.amount(),
            payment_method: txn.payment_method.as_str().to_string(),
            payment_status: txn.payment_status.as_str().to_string(),
            commission_status: txn.commission_status.as_str().to_string(),
            payout_status: txn.payout_status.as_str().to_string(),
            created_at: txn.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Manual payment request view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequestResponse {
    pub id: String,
    pub provider_email: String,
    pub amount: Decimal,
    pub transaction_ids: Vec<String>,
    pub reference: String,
    pub status: String,
    pub submitted_at: String,
    pub verified_at: Option<String>,
    pub verified_by: Option<String>,
}

impl From<CommissionPaymentRequest> for PaymentRequestResponse {
    fn from(request: CommissionPaymentRequest) -> Self {
        Self {
            id: request.id.to_string(),
            provider_email: request.provider_email.to_string(),
            amount: request.amount.amount(),
            transaction_ids: request
                .transaction_ids
                .iter()
                .map(|id| id.to_string())
                .collect(),
            reference: request.reference,
            status: request.status.as_str().to_string(),
            submitted_at: request.submitted_at.as_datetime().to_rfc3339(),
            verified_at: request.verified_at.map(|t| t.as_datetime().to_rfc3339()),
            verified_by: request.verified_by,
        }
    }
}

/// Response for an initialized gateway settlement.
#[derive(Debug, Clone, Serialize)]
pub struct InitializePaymentResponse {
    pub authorization_url: String,
    pub reference: String,
}

impl From<InitializedPayment> for InitializePaymentResponse {
    fn from(payment: InitializedPayment) -> Self {
        Self {
            authorization_url: payment.authorization_url,
            reference: payment.reference,
        }
    }
}

/// Response for a settlement verification lookup.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyPaymentResponse {
    pub settled: bool,
    /// Gateway charge status when not settled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Transactions in collected state after application.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collected: Option<usize>,
}

/// Per-payment-method slice of the outstanding summary.
#[derive(Debug, Clone, Serialize)]
pub struct BreakdownResponse {
    pub cash_count: u64,
    pub cash_amount: Decimal,
    pub card_count: u64,
    pub card_amount: Decimal,
}

/// Outstanding commission summary for dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct OutstandingResponse {
    pub provider_email: String,
    pub total_owed: Decimal,
    pub transaction_count: u64,
    pub overdue_count: u64,
    pub overdue_amount: Decimal,
    pub total_earned: Decimal,
    pub breakdown: BreakdownResponse,
    pub transactions: Vec<TransactionResponse>,
}

impl From<OutstandingResult> for OutstandingResponse {
    fn from(result: OutstandingResult) -> Self {
        let OutstandingSummary {
            provider_email,
            total_owed,
            transaction_count,
            overdue_count,
            overdue_amount,
            total_earned,
            breakdown,
        } = result.summary;

        Self {
            provider_email: provider_email.to_string(),
            total_owed: total_owed.amount(),
            transaction_count,
            overdue_count,
            overdue_amount: overdue_amount.amount(),
            total_earned: total_earned.amount(),
            breakdown: BreakdownResponse {
                cash_count: breakdown.cash_count,
                cash_amount: breakdown.cash_amount.amount(),
                card_count: breakdown.card_count,
                card_amount: breakdown.card_amount.amount(),
            },
            transactions: result
                .transactions
                .into_iter()
                .map(TransactionResponse::from)
                .collect(),
        }
    }
}

/// Response for the overdue sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    pub swept: u64,
}

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
