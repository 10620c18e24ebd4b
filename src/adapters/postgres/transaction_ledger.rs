//! PostgreSQL implementation of the TransactionLedger port.
//!
//! Status changes are compare-and-swap conditional updates: the `UPDATE`
//! only matches when the stored status is a valid predecessor of the
//! target, so concurrent webhook deliveries and manual updates cannot race
//! past the state machine. A non-matching update is a no-op that returns
//! the stored row unchanged.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::commission::{
    CommissionMetadata, CommissionStatus, CommissionStatusDetails, PaymentMethod,
    PaymentStatus, PaymentTransaction, PayoutStatus, ProviderTier, ServiceType,
};
use crate::domain::foundation::{
    BookingId, BusinessId, DomainError, EmailAddress, ErrorCode, Money, StateMachine, Timestamp,
    TransactionId,
};
use crate::ports::TransactionLedger;

/// PostgreSQL implementation of the TransactionLedger port.
pub struct PostgresTransactionLedger {
    pool: PgPool,
}

impl PostgresTransactionLedger {
    /// Creates a new ledger over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment transaction.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    booking_id: Uuid,
    business_id: Uuid,
    provider_email: String,
    customer_email: String,
    total_amount: Decimal,
    platform_commission: Decimal,
    provider_payout: Decimal,
    commission_owed: Decimal,
    payment_method: String,
    payment_status: String,
    commission_status: String,
    payment_method_reference: Option<String>,
    commission_payment_reference: Option<String>,
    commission_paid_date: Option<DateTime<Utc>>,
    payout_status: String,
    payout_reference: Option<String>,
    metadata_tier: String,
    metadata_service_type: String,
    metadata_rate: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for PaymentTransaction {
    type Error = DomainError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(PaymentTransaction {
            id: TransactionId::from_uuid(row.id),
            booking_id: BookingId::from_uuid(row.booking_id),
            business_id: BusinessId::from_uuid(row.business_id),
            provider_email: parse_email(&row.provider_email)?,
            customer_email: parse_email(&row.customer_email)?,
            total_amount: Money::new(row.total_amount),
            platform_commission: Money::new(row.platform_commission),
            provider_payout: Money::new(row.provider_payout),
            commission_owed: Money::new(row.commission_owed),
            payment_method: parse_payment_method(&row.payment_method)?,
            payment_status: parse_payment_status(&row.payment_status)?,
            commission_status: parse_commission_status(&row.commission_status)?,
            payment_method_reference: row.payment_method_reference,
            commission_payment_reference: row.commission_payment_reference,
            commission_paid_date: row.commission_paid_date.map(Timestamp::from_datetime),
            payout_status: parse_payout_status(&row.payout_status)?,
            payout_reference: row.payout_reference,
            metadata: CommissionMetadata {
                // Snapshot fields use the documented default on unknown
                // values rather than failing the row
                tier: ProviderTier::parse_or_default(&row.metadata_tier),
                service_type: ServiceType::parse_or_default(&row.metadata_service_type),
                rate: row.metadata_rate,
            },
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_email(s: &str) -> Result<EmailAddress, DomainError> {
    EmailAddress::new(s).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid email: {}", e))
    })
}

fn parse_payment_method(s: &str) -> Result<PaymentMethod, DomainError> {
    match s {
        "cash" => Ok(PaymentMethod::Cash),
        "card" => Ok(PaymentMethod::Card),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payment method value: {}", s),
        )),
    }
}

fn parse_payment_status(s: &str) -> Result<PaymentStatus, DomainError> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "completed" => Ok(PaymentStatus::Completed),
        "failed" => Ok(PaymentStatus::Failed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payment status value: {}", s),
        )),
    }
}

fn parse_commission_status(s: &str) -> Result<CommissionStatus, DomainError> {
    match s {
        "pending" => Ok(CommissionStatus::Pending),
        "pending_verification" => Ok(CommissionStatus::PendingVerification),
        "overdue" => Ok(CommissionStatus::Overdue),
        "collected" => Ok(CommissionStatus::Collected),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid commission status value: {}", s),
        )),
    }
}

fn parse_payout_status(s: &str) -> Result<PayoutStatus, DomainError> {
    match s {
        "pending" => Ok(PayoutStatus::Pending),
        "completed" => Ok(PayoutStatus::Completed),
        "failed" => Ok(PayoutStatus::Failed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payout status value: {}", s),
        )),
    }
}

/// Stored statuses from which `target` is reachable.
fn commission_predecessors(target: CommissionStatus) -> Vec<String> {
    [
        CommissionStatus::Pending,
        CommissionStatus::PendingVerification,
        CommissionStatus::Overdue,
        CommissionStatus::Collected,
    ]
    .into_iter()
    .filter(|from| from.can_transition_to(&target))
    .map(|from| from.as_str().to_string())
    .collect()
}

fn payment_predecessors(target: PaymentStatus) -> Vec<String> {
    [
        PaymentStatus::Pending,
        PaymentStatus::Completed,
        PaymentStatus::Failed,
    ]
    .into_iter()
    .filter(|from| from.can_transition_to(&target))
    .map(|from| from.as_str().to_string())
    .collect()
}

fn payout_predecessors(target: PayoutStatus) -> Vec<String> {
    [
        PayoutStatus::Pending,
        PayoutStatus::Completed,
        PayoutStatus::Failed,
    ]
    .into_iter()
    .filter(|from| from.can_transition_to(&target))
    .map(|from| from.as_str().to_string())
    .collect()
}

const SELECT_COLUMNS: &str = r#"
    id, booking_id, business_id, provider_email, customer_email,
    total_amount, platform_commission, provider_payout, commission_owed,
    payment_method, payment_status, commission_status,
    payment_method_reference, commission_payment_reference, commission_paid_date,
    payout_status, payout_reference,
    metadata_tier, metadata_service_type, metadata_rate,
    created_at, updated_at
"#;

#[async_trait]
impl TransactionLedger for PostgresTransactionLedger {
    async fn create(&self, transaction: &PaymentTransaction) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payment_transactions (
                id, booking_id, business_id, provider_email, customer_email,
                total_amount, platform_commission, provider_payout, commission_owed,
                payment_method, payment_status, commission_status,
                payment_method_reference, commission_payment_reference, commission_paid_date,
                payout_status, payout_reference,
                metadata_tier, metadata_service_type, metadata_rate,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9,
                $10, $11, $12,
                $13, $14, $15,
                $16, $17,
                $18, $19, $20,
                $21, $22
            )
            "#,
        )
        .bind(transaction.id.as_uuid())
        .bind(transaction.booking_id.as_uuid())
        .bind(transaction.business_id.as_uuid())
        .bind(transaction.provider_email.as_str())
        .bind(transaction.customer_email.as_str())
        .bind(transaction.total_amount.amount())
        .bind(transaction.platform_commission.amount())
        .bind(transaction.provider_payout.amount())
        .bind(transaction.commission_owed.amount())
        .bind(transaction.payment_method.as_str())
        .bind(transaction.payment_status.as_str())
        .bind(transaction.commission_status.as_str())
        .bind(transaction.payment_method_reference.as_deref())
        .bind(transaction.commission_payment_reference.as_deref())
        .bind(transaction.commission_paid_date.map(|t| *t.as_datetime()))
        .bind(transaction.payout_status.as_str())
        .bind(transaction.payout_reference.as_deref())
        .bind(transaction.metadata.tier.as_str())
        .bind(transaction.metadata.service_type.as_str())
        .bind(transaction.metadata.rate)
        .bind(*transaction.created_at.as_datetime())
        .bind(*transaction.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to create transaction: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &TransactionId,
    ) -> Result<Option<PaymentTransaction>, DomainError> {
        let row: Option<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payment_transactions WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch transaction: {}", e)))?;

        row.map(PaymentTransaction::try_from).transpose()
    }

    async fn find_by_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<PaymentTransaction>, DomainError> {
        let row: Option<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payment_transactions WHERE booking_id = $1",
            SELECT_COLUMNS
        ))
        .bind(booking_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch transaction: {}", e)))?;

        row.map(PaymentTransaction::try_from).transpose()
    }

    async fn find_by_payment_reference(
        &self,
        reference: &str,
    ) -> Result<Option<PaymentTransaction>, DomainError> {
        let row: Option<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payment_transactions WHERE payment_method_reference = $1",
            SELECT_COLUMNS
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch transaction: {}", e)))?;

        row.map(PaymentTransaction::try_from).transpose()
    }

    async fn update_commission_status(
        &self,
        id: &TransactionId,
        new_status: CommissionStatus,
        details: CommissionStatusDetails,
    ) -> Result<PaymentTransaction, DomainError> {
        let predecessors = commission_predecessors(new_status);

        // Single conditional write: status, owed-zeroing, reference and
        // paid date land atomically or not at all
        let updated: Option<TransactionRow> = sqlx::query_as(&format!(
            r#"
            UPDATE payment_transactions
            SET commission_status = $2,
                commission_owed = CASE WHEN $2 = 'collected' THEN 0 ELSE commission_owed END,
                commission_payment_reference = COALESCE($3, commission_payment_reference),
                commission_paid_date = COALESCE($4, commission_paid_date),
                updated_at = NOW()
            WHERE id = $1 AND commission_status = ANY($5)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(new_status.as_str())
        .bind(details.payment_reference.as_deref())
        .bind(details.paid_date.map(|t| *t.as_datetime()))
        .bind(&predecessors)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update commission status: {}", e)))?;

        if let Some(row) = updated {
            return PaymentTransaction::try_from(row);
        }

        // No predecessor matched: idempotent no-op, return the stored row
        let current = self.find_by_id(id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::TransactionNotFound,
                format!("Transaction {} not found", id),
            )
        })?;
        tracing::warn!(
            transaction_id = %id,
            current = current.commission_status.as_str(),
            target = new_status.as_str(),
            "commission transition ignored"
        );
        Ok(current)
    }

    async fn update_payment_status(
        &self,
        id: &TransactionId,
        new_status: PaymentStatus,
        reference: Option<String>,
    ) -> Result<PaymentTransaction, DomainError> {
        let predecessors = payment_predecessors(new_status);

        let updated: Option<TransactionRow> = sqlx::query_as(&format!(
            r#"
            UPDATE payment_transactions
            SET payment_status = $2,
                payment_method_reference = COALESCE($3, payment_method_reference),
                updated_at = NOW()
            WHERE id = $1 AND payment_status = ANY($4)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(new_status.as_str())
        .bind(reference.as_deref())
        .bind(&predecessors)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update payment status: {}", e)))?;

        if let Some(row) = updated {
            return PaymentTransaction::try_from(row);
        }

        let current = self.find_by_id(id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::TransactionNotFound,
                format!("Transaction {} not found", id),
            )
        })?;
        tracing::warn!(
            transaction_id = %id,
            current = current.payment_status.as_str(),
            target = new_status.as_str(),
            "payment transition ignored"
        );
        Ok(current)
    }

    async fn update_payout_status_by_reference(
        &self,
        payout_reference: &str,
        new_status: PayoutStatus,
    ) -> Result<Option<PaymentTransaction>, DomainError> {
        let predecessors = payout_predecessors(new_status);

        let updated: Option<TransactionRow> = sqlx::query_as(&format!(
            r#"
            UPDATE payment_transactions
            SET payout_status = $2,
                updated_at = NOW()
            WHERE payout_reference = $1 AND payout_status = ANY($3)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(payout_reference)
        .bind(new_status.as_str())
        .bind(&predecessors)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update payout status: {}", e)))?;

        if let Some(row) = updated {
            return Ok(Some(PaymentTransaction::try_from(row)?));
        }

        // Either no such reference, or the transition was a no-op
        self.find_by_payment_reference_for_payout(payout_reference)
            .await
    }

    async fn outstanding_for_provider(
        &self,
        provider_email: &EmailAddress,
    ) -> Result<Vec<PaymentTransaction>, DomainError> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM payment_transactions
            WHERE provider_email = $1
              AND payment_method = 'cash'
              AND commission_status IN ('pending', 'overdue')
            ORDER BY created_at ASC
            "#,
            SELECT_COLUMNS
        ))
        .bind(provider_email.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::database(format!("Failed to fetch outstanding transactions: {}", e))
        })?;

        rows.into_iter().map(PaymentTransaction::try_from).collect()
    }

    async fn mark_overdue(&self, cutoff: Timestamp) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payment_transactions
            SET commission_status = 'overdue',
                updated_at = NOW()
            WHERE payment_method = 'cash'
              AND commission_status = 'pending'
              AND created_at < $1
            "#,
        )
        .bind(*cutoff.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to mark overdue: {}", e)))?;

        Ok(result.rows_affected())
    }
}

impl PostgresTransactionLedger {
    /// Row lookup by payout reference, for the no-op path of payout updates.
    async fn find_by_payment_reference_for_payout(
        &self,
        payout_reference: &str,
    ) -> Result<Option<PaymentTransaction>, DomainError> {
        let row: Option<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payment_transactions WHERE payout_reference = $1",
            SELECT_COLUMNS
        ))
        .bind(payout_reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch transaction: {}", e)))?;

        row.map(PaymentTransaction::try_from).transpose()
    }
}
