//! PostgreSQL implementation of the OutstandingReader port.
//!
//! Pure read model: every summary is a single aggregate query over the
//! ledger rows at call time. Nothing is cached or incremented separately,
//! so the numbers cannot drift from the ledger.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, EmailAddress, Money, Timestamp};
use crate::ports::{MethodBreakdown, OutstandingReader, OutstandingSummary};

/// PostgreSQL implementation of the OutstandingReader port.
pub struct PostgresOutstandingReader {
    pool: PgPool,
}

impl PostgresOutstandingReader {
    /// Creates a new reader over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    total_owed: Decimal,
    outstanding_count: i64,
    overdue_count: i64,
    overdue_amount: Decimal,
    total_earned: Decimal,
    cash_count: i64,
    cash_amount: Decimal,
    card_count: i64,
    card_amount: Decimal,
}

#[async_trait]
impl OutstandingReader for PostgresOutstandingReader {
    async fn outstanding_summary(
        &self,
        provider_email: &EmailAddress,
        overdue_threshold_days: i64,
    ) -> Result<OutstandingSummary, DomainError> {
        let cutoff = Timestamp::now().minus_days(overdue_threshold_days);

        // Overdue includes rows the sweep has already transitioned and
        // pending rows past the cutoff it has not visited yet, so the
        // dashboard never lags the sweep
        let row: SummaryRow = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(commission_owed) FILTER (
                    WHERE payment_method = 'cash'
                      AND commission_status IN ('pending', 'overdue')
                ), 0) AS total_owed,
                COUNT(*) FILTER (
                    WHERE payment_method = 'cash'
                      AND commission_status IN ('pending', 'overdue')
                ) AS outstanding_count,
                COUNT(*) FILTER (
                    WHERE payment_method = 'cash'
                      AND (commission_status = 'overdue'
                           OR (commission_status = 'pending' AND created_at < $2))
                ) AS overdue_count,
                COALESCE(SUM(commission_owed) FILTER (
                    WHERE payment_method = 'cash'
                      AND (commission_status = 'overdue'
                           OR (commission_status = 'pending' AND created_at < $2))
                ), 0) AS overdue_amount,
                COALESCE(SUM(provider_payout) FILTER (
                    WHERE payment_status = 'completed'
                ), 0) AS total_earned,
                COUNT(*) FILTER (WHERE payment_method = 'cash') AS cash_count,
                COALESCE(SUM(total_amount) FILTER (WHERE payment_method = 'cash'), 0) AS cash_amount,
                COUNT(*) FILTER (WHERE payment_method = 'card') AS card_count,
                COALESCE(SUM(total_amount) FILTER (WHERE payment_method = 'card'), 0) AS card_amount
            FROM payment_transactions
            WHERE provider_email = $1
            "#,
        )
        .bind(provider_email.as_str())
        .bind(*cutoff.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to build summary: {}", e)))?;

        Ok(OutstandingSummary {
            provider_email: provider_email.clone(),
            total_owed: Money::new(row.total_owed),
            transaction_count: row.outstanding_count.max(0) as u64,
            overdue_count: row.overdue_count.max(0) as u64,
            overdue_amount: Money::new(row.overdue_amount),
            total_earned: Money::new(row.total_earned),
            breakdown: MethodBreakdown {
                cash_count: row.cash_count.max(0) as u64,
                cash_amount: Money::new(row.cash_amount),
                card_count: row.card_count.max(0) as u64,
                card_amount: Money::new(row.card_amount),
            },
        })
    }
}
