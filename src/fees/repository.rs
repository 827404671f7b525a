// Data access layer for the fee ledger

use crate::fees::error::FeeError;
use crate::fees::models::{Fee, FeeStats, FeeStatus};
use axum::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const FEE_COLUMNS: &str = "id, student_id, amount, amount_paid, fee_type, description, \
     due_date, payment_date, payment_method, transaction_id, status, created_at, updated_at";

/// Persistence seam for the fee ledger. The service talks to this trait so
/// the ledger rules can be exercised against an in-memory store.
#[async_trait]
pub trait FeeStore: Send + Sync {
    async fn insert(&self, fee: &Fee) -> Result<Fee, FeeError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Fee>, FeeError>;
    async fn update(&self, fee: &Fee) -> Result<Fee, FeeError>;
    async fn delete(&self, id: Uuid) -> Result<bool, FeeError>;
    async fn list(&self, status: Option<FeeStatus>, limit: i64) -> Result<Vec<Fee>, FeeError>;
    async fn by_student(&self, student_id: Uuid) -> Result<Vec<Fee>, FeeError>;
    async fn paid_history(&self, student_id: Uuid, limit: i64) -> Result<Vec<Fee>, FeeError>;
    async fn pending(&self) -> Result<Vec<Fee>, FeeError>;
    async fn overdue(&self, now: DateTime<Utc>) -> Result<Vec<Fee>, FeeError>;
    async fn stats(
        &self,
        now: DateTime<Utc>,
        month_start: DateTime<Utc>,
        month_end: DateTime<Utc>,
    ) -> Result<FeeStats, FeeError>;
}

#[derive(Clone)]
pub struct FeesRepository {
    pool: PgPool,
}

impl FeesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeeStore for FeesRepository {
    async fn insert(&self, fee: &Fee) -> Result<Fee, FeeError> {
        let query = format!(
            "INSERT INTO fees (id, student_id, amount, amount_paid, fee_type, description, \
             due_date, payment_date, payment_method, transaction_id, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {FEE_COLUMNS}"
        );

        let created = sqlx::query_as::<_, Fee>(&query)
            .bind(fee.id)
            .bind(fee.student_id)
            .bind(fee.amount)
            .bind(fee.amount_paid)
            .bind(&fee.fee_type)
            .bind(&fee.description)
            .bind(fee.due_date)
            .bind(fee.payment_date)
            .bind(fee.payment_method)
            .bind(&fee.transaction_id)
            .bind(fee.status)
            .bind(fee.created_at)
            .bind(fee.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Fee>, FeeError> {
        let query = format!("SELECT {FEE_COLUMNS} FROM fees WHERE id = $1");

        let fee = sqlx::query_as::<_, Fee>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(fee)
    }

    /// Persist the full row back. Callers re-derive the status before saving.
    async fn update(&self, fee: &Fee) -> Result<Fee, FeeError> {
        let query = format!(
            "UPDATE fees SET amount = $2, amount_paid = $3, fee_type = $4, description = $5, \
             due_date = $6, payment_date = $7, payment_method = $8, transaction_id = $9, \
             status = $10, updated_at = $11 \
             WHERE id = $1 RETURNING {FEE_COLUMNS}"
        );

        let updated = sqlx::query_as::<_, Fee>(&query)
            .bind(fee.id)
            .bind(fee.amount)
            .bind(fee.amount_paid)
            .bind(&fee.fee_type)
            .bind(&fee.description)
            .bind(fee.due_date)
            .bind(fee.payment_date)
            .bind(fee.payment_method)
            .bind(&fee.transaction_id)
            .bind(fee.status)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, FeeError> {
        let result = sqlx::query("DELETE FROM fees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, status: Option<FeeStatus>, limit: i64) -> Result<Vec<Fee>, FeeError> {
        let query = format!(
            "SELECT {FEE_COLUMNS} FROM fees \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY due_date DESC LIMIT $2"
        );

        let fees = sqlx::query_as::<_, Fee>(&query)
            .bind(status.map(|s| s.as_str()))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(fees)
    }

    async fn by_student(&self, student_id: Uuid) -> Result<Vec<Fee>, FeeError> {
        let query = format!(
            "SELECT {FEE_COLUMNS} FROM fees WHERE student_id = $1 ORDER BY due_date DESC"
        );

        let fees = sqlx::query_as::<_, Fee>(&query)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(fees)
    }

    async fn paid_history(&self, student_id: Uuid, limit: i64) -> Result<Vec<Fee>, FeeError> {
        let query = format!(
            "SELECT {FEE_COLUMNS} FROM fees WHERE student_id = $1 AND status = 'paid' \
             ORDER BY payment_date DESC NULLS LAST LIMIT $2"
        );

        let fees = sqlx::query_as::<_, Fee>(&query)
            .bind(student_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(fees)
    }

    /// Pending fees in due-date order, soonest first. Cached status only;
    /// partial fees are a different bucket.
    async fn pending(&self) -> Result<Vec<Fee>, FeeError> {
        let query = format!(
            "SELECT {FEE_COLUMNS} FROM fees \
             WHERE status = 'pending' ORDER BY due_date ASC"
        );

        let fees = sqlx::query_as::<_, Fee>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(fees)
    }

    /// Past-due fees. Matches on the due date rather than the cached status
    /// alone, so pending rows that were never re-saved still show up.
    async fn overdue(&self, now: DateTime<Utc>) -> Result<Vec<Fee>, FeeError> {
        let query = format!(
            "SELECT {FEE_COLUMNS} FROM fees \
             WHERE status IN ('pending', 'overdue') AND due_date < $1 \
             ORDER BY due_date ASC"
        );

        let fees = sqlx::query_as::<_, Fee>(&query)
            .bind(now)
            .fetch_all(&self.pool)
            .await?;

        Ok(fees)
    }

    /// Dashboard aggregates. The overdue count uses the same due-date
    /// predicate as `overdue`, never the cached status alone.
    async fn stats(
        &self,
        now: DateTime<Utc>,
        month_start: DateTime<Utc>,
        month_end: DateTime<Utc>,
    ) -> Result<FeeStats, FeeError> {
        let (total_pending,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM fees WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;

        let (total_overdue,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM fees \
             WHERE status IN ('pending', 'overdue') AND due_date < $1",
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let (total_collected,): (Option<Decimal>,) =
            sqlx::query_as("SELECT SUM(amount_paid) FROM fees")
                .fetch_one(&self.pool)
                .await?;

        let (monthly_revenue,): (Option<Decimal>,) = sqlx::query_as(
            "SELECT SUM(amount_paid) FROM fees \
             WHERE payment_date >= $1 AND payment_date < $2",
        )
        .bind(month_start)
        .bind(month_end)
        .fetch_one(&self.pool)
        .await?;

        Ok(FeeStats {
            total_pending,
            total_overdue,
            total_collected: total_collected.unwrap_or(Decimal::ZERO),
            monthly_revenue: monthly_revenue.unwrap_or(Decimal::ZERO),
        })
    }
}
