//! PostgreSQL implementation of the PaymentRequestRepository port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, EmailAddress, ErrorCode, Money, PaymentRequestId, Timestamp, TransactionId,
};
use crate::domain::settlement::{CommissionPaymentRequest, RequestStatus};
use crate::ports::PaymentRequestRepository;

/// PostgreSQL implementation of the PaymentRequestRepository port.
pub struct PostgresPaymentRequestRepository {
    pool: PgPool,
}

impl PostgresPaymentRequestRepository {
    /// Creates a new repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment request.
#[derive(Debug, sqlx::FromRow)]
struct PaymentRequestRow {
    id: Uuid,
    provider_email: String,
    amount: Decimal,
    transaction_ids: Vec<Uuid>,
    reference: String,
    status: String,
    submitted_at: DateTime<Utc>,
    verified_at: Option<DateTime<Utc>>,
    verified_by: Option<String>,
}

impl TryFrom<PaymentRequestRow> for CommissionPaymentRequest {
    type Error = DomainError;

    fn try_from(row: PaymentRequestRow) -> Result<Self, Self::Error> {
        Ok(CommissionPaymentRequest {
            id: PaymentRequestId::from_uuid(row.id),
            provider_email: EmailAddress::new(&row.provider_email).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid email: {}", e))
            })?,
            amount: Money::new(row.amount),
            transaction_ids: row
                .transaction_ids
                .into_iter()
                .map(TransactionId::from_uuid)
                .collect(),
            reference: row.reference,
            status: parse_status(&row.status)?,
            submitted_at: Timestamp::from_datetime(row.submitted_at),
            verified_at: row.verified_at.map(Timestamp::from_datetime),
            verified_by: row.verified_by,
        })
    }
}

fn parse_status(s: &str) -> Result<RequestStatus, DomainError> {
    match s {
        "pending_verification" => Ok(RequestStatus::PendingVerification),
        "verified" => Ok(RequestStatus::Verified),
        "rejected" => Ok(RequestStatus::Rejected),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid request status value: {}", s),
        )),
    }
}

const SELECT_COLUMNS: &str = r#"
    id, provider_email, amount, transaction_ids, reference,
    status, submitted_at, verified_at, verified_by
"#;

#[async_trait]
impl PaymentRequestRepository for PostgresPaymentRequestRepository {
    async fn save(&self, request: &CommissionPaymentRequest) -> Result<(), DomainError> {
        let transaction_ids: Vec<Uuid> = request
            .transaction_ids
            .iter()
            .map(|id| *id.as_uuid())
            .collect();

        sqlx::query(
            r#"
            INSERT INTO commission_payment_requests (
                id, provider_email, amount, transaction_ids, reference,
                status, submitted_at, verified_at, verified_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(request.provider_email.as_str())
        .bind(request.amount.amount())
        .bind(&transaction_ids)
        .bind(&request.reference)
        .bind(request.status.as_str())
        .bind(*request.submitted_at.as_datetime())
        .bind(request.verified_at.map(|t| *t.as_datetime()))
        .bind(request.verified_by.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save payment request: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &PaymentRequestId,
    ) -> Result<Option<CommissionPaymentRequest>, DomainError> {
        let row: Option<PaymentRequestRow> = sqlx::query_as(&format!(
            "SELECT {} FROM commission_payment_requests WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch payment request: {}", e)))?;

        row.map(CommissionPaymentRequest::try_from).transpose()
    }

    async fn update(&self, request: &CommissionPaymentRequest) -> Result<(), DomainError> {
        // The decision fields are the only mutable part of a request
        let result = sqlx::query(
            r#"
            UPDATE commission_payment_requests
            SET status = $2, verified_at = $3, verified_by = $4
            WHERE id = $1
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(request.status.as_str())
        .bind(request.verified_at.map(|t| *t.as_datetime()))
        .bind(request.verified_by.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update payment request: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::PaymentRequestNotFound,
                format!("Payment request {} not found", request.id),
            ));
        }

        Ok(())
    }

    async fn list_pending(&self) -> Result<Vec<CommissionPaymentRequest>, DomainError> {
        let rows: Vec<PaymentRequestRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM commission_payment_requests
            WHERE status = 'pending_verification'
            ORDER BY submitted_at ASC
            "#,
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list payment requests: {}", e)))?;

        rows.into_iter()
            .map(CommissionPaymentRequest::try_from)
            .collect()
    }

    async fn list_for_provider(
        &self,
        provider_email: &EmailAddress,
    ) -> Result<Vec<CommissionPaymentRequest>, DomainError> {
        let rows: Vec<PaymentRequestRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM commission_payment_requests
            WHERE provider_email = $1
            ORDER BY submitted_at DESC
            "#,
            SELECT_COLUMNS
        ))
        .bind(provider_email.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list payment requests: {}", e)))?;

        rows.into_iter()
            .map(CommissionPaymentRequest::try_from)
            .collect()
    }
}
