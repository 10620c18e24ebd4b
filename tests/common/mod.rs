//! Shared in-memory test doubles for the persistence ports.
//!
//! The in-memory ledger reproduces the production adapter's contract:
//! compare-and-swap status updates that validate the state machine edge
//! and fall back to a no-op returning the stored row. All stores share a
//! single mutex-guarded state so the reader derives from the same rows
//! the ledger mutates.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha512;

use artisan_market::domain::commission::{
    CommissionStatus, CommissionStatusDetails, PaymentMethod, PaymentStatus, PaymentTransaction,
    PayoutStatus,
};
use artisan_market::domain::foundation::{
    BookingId, DomainError, EmailAddress, ErrorCode, EventId, Money, StateMachine, Timestamp,
    TransactionId,
};
use artisan_market::domain::settlement::{AuditEntry, CommissionPaymentRequest};
use artisan_market::ports::{
    AuditLog, MethodBreakdown, OutstandingReader, OutstandingSummary, PaymentRequestRepository,
    ProcessedEventStore, TransactionLedger,
};

pub const PROVIDER_EMAIL: &str = "ada.mechanic@example.com";
pub const WEBHOOK_SECRET: &str = "whk_test_secret_001";

/// Computes the hex HMAC-SHA512 signature the gateway would send.
pub fn sign(payload: &[u8], secret: &str) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

pub fn provider() -> EmailAddress {
    EmailAddress::new(PROVIDER_EMAIL).unwrap()
}

pub fn customer() -> EmailAddress {
    EmailAddress::new("customer@example.com").unwrap()
}

// ════════════════════════════════════════════════════════════════════════════════
// In-memory ledger
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<Mutex<Vec<PaymentTransaction>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct insert for test fixtures (bypasses create-once checks).
    pub fn insert(&self, transaction: PaymentTransaction) {
        self.state.lock().unwrap().push(transaction);
    }

    /// Backdates a row's creation time (ageing fixtures).
    pub fn set_created_at(&self, id: &TransactionId, created_at: Timestamp) {
        let mut state = self.state.lock().unwrap();
        if let Some(transaction) = state.iter_mut().find(|t| &t.id == id) {
            transaction.created_at = created_at;
        }
    }

    pub fn get(&self, id: &TransactionId) -> Option<PaymentTransaction> {
        self.state
            .lock()
            .unwrap()
            .iter()
            .find(|t| &t.id == id)
            .cloned()
    }

    pub fn all(&self) -> Vec<PaymentTransaction> {
        self.state.lock().unwrap().clone()
    }

    /// Reader sharing this ledger's rows.
    pub fn reader(&self) -> InMemoryOutstandingReader {
        InMemoryOutstandingReader {
            state: self.state.clone(),
        }
    }
}

#[async_trait]
impl TransactionLedger for InMemoryLedger {
    async fn create(&self, transaction: &PaymentTransaction) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        if state.iter().any(|t| t.id == transaction.id) {
            return Err(DomainError::database("duplicate transaction id"));
        }
        state.push(transaction.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &TransactionId,
    ) -> Result<Option<PaymentTransaction>, DomainError> {
        Ok(self.get(id))
    }

    async fn find_by_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<PaymentTransaction>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .iter()
            .find(|t| &t.booking_id == booking_id)
            .cloned())
    }

    async fn find_by_payment_reference(
        &self,
        reference: &str,
    ) -> Result<Option<PaymentTransaction>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.payment_method_reference.as_deref() == Some(reference))
            .cloned())
    }

    async fn update_commission_status(
        &self,
        id: &TransactionId,
        new_status: CommissionStatus,
        details: CommissionStatusDetails,
    ) -> Result<PaymentTransaction, DomainError> {
        let mut state = self.state.lock().unwrap();
        let transaction = state.iter_mut().find(|t| &t.id == id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::TransactionNotFound,
                format!("Transaction {} not found", id),
            )
        })?;

        // CAS: only a valid predecessor may transition; otherwise no-op
        if transaction.commission_status.can_transition_to(&new_status) {
            transaction.commission_status = new_status;
            if new_status == CommissionStatus::Collected {
                transaction.commission_owed = Money::ZERO;
            }
            if let Some(reference) = details.payment_reference {
                transaction.commission_payment_reference = Some(reference);
            }
            if let Some(paid) = details.paid_date {
                transaction.commission_paid_date = Some(paid);
            }
            transaction.updated_at = Timestamp::now();
        }

        Ok(transaction.clone())
    }

    async fn update_payment_status(
        &self,
        id: &TransactionId,
        new_status: PaymentStatus,
        reference: Option<String>,
    ) -> Result<PaymentTransaction, DomainError> {
        let mut state = self.state.lock().unwrap();
        let transaction = state.iter_mut().find(|t| &t.id == id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::TransactionNotFound,
                format!("Transaction {} not found", id),
            )
        })?;

        if transaction.payment_status.can_transition_to(&new_status) {
            transaction.payment_status = new_status;
            if let Some(reference) = reference {
                transaction.payment_method_reference = Some(reference);
            }
            transaction.updated_at = Timestamp::now();
        }

        Ok(transaction.clone())
    }

    async fn update_payout_status_by_reference(
        &self,
        payout_reference: &str,
        new_status: PayoutStatus,
    ) -> Result<Option<PaymentTransaction>, DomainError> {
        let mut state = self.state.lock().unwrap();
        let Some(transaction) = state
            .iter_mut()
            .find(|t| t.payout_reference.as_deref() == Some(payout_reference))
        else {
            return Ok(None);
        };

        if transaction.payout_status.can_transition_to(&new_status) {
            transaction.payout_status = new_status;
            transaction.updated_at = Timestamp::now();
        }

        Ok(Some(transaction.clone()))
    }

    async fn outstanding_for_provider(
        &self,
        provider_email: &EmailAddress,
    ) -> Result<Vec<PaymentTransaction>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .iter()
            .filter(|t| {
                &t.provider_email == provider_email
                    && t.payment_method == PaymentMethod::Cash
                    && t.commission_status.is_outstanding()
            })
            .cloned()
            .collect())
    }

    async fn mark_overdue(&self, cutoff: Timestamp) -> Result<u64, DomainError> {
        let mut state = self.state.lock().unwrap();
        let mut swept = 0;
        for transaction in state.iter_mut() {
            if transaction.payment_method == PaymentMethod::Cash
                && transaction.commission_status == CommissionStatus::Pending
                && transaction.created_at.is_before(&cutoff)
            {
                transaction.commission_status = CommissionStatus::Overdue;
                transaction.updated_at = Timestamp::now();
                swept += 1;
            }
        }
        Ok(swept)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// In-memory outstanding reader (derives from the ledger rows)
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct InMemoryOutstandingReader {
    state: Arc<Mutex<Vec<PaymentTransaction>>>,
}

#[async_trait]
impl OutstandingReader for InMemoryOutstandingReader {
    async fn outstanding_summary(
        &self,
        provider_email: &EmailAddress,
        overdue_threshold_days: i64,
    ) -> Result<OutstandingSummary, DomainError> {
        let now = Timestamp::now();
        let state = self.state.lock().unwrap();
        let rows: Vec<&PaymentTransaction> = state
            .iter()
            .filter(|t| &t.provider_email == provider_email)
            .collect();

        let outstanding: Vec<&PaymentTransaction> = rows
            .iter()
            .copied()
            .filter(|t| {
                t.payment_method == PaymentMethod::Cash && t.commission_status.is_outstanding()
            })
            .collect();

        let overdue: Vec<&PaymentTransaction> = outstanding
            .iter()
            .copied()
            .filter(|t| {
                t.commission_status == CommissionStatus::Overdue
                    || t.is_past_overdue_threshold(now, overdue_threshold_days)
            })
            .collect();

        let mut breakdown = MethodBreakdown::default();
        for t in &rows {
            match t.payment_method {
                PaymentMethod::Cash => {
                    breakdown.cash_count += 1;
                    breakdown.cash_amount = breakdown.cash_amount + t.total_amount;
                }
                PaymentMethod::Card => {
                    breakdown.card_count += 1;
                    breakdown.card_amount = breakdown.card_amount + t.total_amount;
                }
            }
        }

        Ok(OutstandingSummary {
            provider_email: provider_email.clone(),
            total_owed: outstanding.iter().map(|t| t.commission_owed).sum(),
            transaction_count: outstanding.len() as u64,
            overdue_count: overdue.len() as u64,
            overdue_amount: overdue.iter().map(|t| t.commission_owed).sum(),
            total_earned: rows
                .iter()
                .filter(|t| t.payment_status == PaymentStatus::Completed)
                .map(|t| t.provider_payout)
                .sum(),
            breakdown,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// In-memory payment request repository, event store, audit log
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Default)]
pub struct InMemoryPaymentRequests {
    state: Arc<Mutex<Vec<CommissionPaymentRequest>>>,
}

impl InMemoryPaymentRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<CommissionPaymentRequest> {
        self.state.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentRequestRepository for InMemoryPaymentRequests {
    async fn save(&self, request: &CommissionPaymentRequest) -> Result<(), DomainError> {
        self.state.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &artisan_market::domain::foundation::PaymentRequestId,
    ) -> Result<Option<CommissionPaymentRequest>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.id == id)
            .cloned())
    }

    async fn update(&self, request: &CommissionPaymentRequest) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        let stored = state.iter_mut().find(|r| r.id == request.id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::PaymentRequestNotFound,
                format!("Payment request {} not found", request.id),
            )
        })?;
        *stored = request.clone();
        Ok(())
    }

    async fn list_pending(&self) -> Result<Vec<CommissionPaymentRequest>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                r.status == artisan_market::domain::settlement::RequestStatus::PendingVerification
            })
            .cloned()
            .collect())
    }

    async fn list_for_provider(
        &self,
        provider_email: &EmailAddress,
    ) -> Result<Vec<CommissionPaymentRequest>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .iter()
            .filter(|r| &r.provider_email == provider_email)
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryProcessedEvents {
    state: Arc<Mutex<HashSet<(String, String)>>>,
}

impl InMemoryProcessedEvents {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProcessedEventStore for InMemoryProcessedEvents {
    async fn contains(
        &self,
        event_id: &EventId,
        handler_name: &str,
    ) -> Result<bool, DomainError> {
        let key = (event_id.as_str().to_string(), handler_name.to_string());
        Ok(self.state.lock().unwrap().contains(&key))
    }

    async fn mark_processed(
        &self,
        event_id: &EventId,
        handler_name: &str,
    ) -> Result<(), DomainError> {
        let key = (event_id.as_str().to_string(), handler_name.to_string());
        self.state.lock().unwrap().insert(key);
        Ok(())
    }

    async fn delete_before(&self, _timestamp: Timestamp) -> Result<u64, DomainError> {
        Ok(0)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAuditLog {
    state: Arc<Mutex<Vec<AuditEntry>>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<AuditEntry> {
        self.state.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<(), DomainError> {
        self.state.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<AuditEntry>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.iter().rev().take(limit as usize).cloned().collect())
    }
}
