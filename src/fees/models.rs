// Fee ledger models and DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Fee lifecycle status. Derived on write, cached in the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    Pending,
    Partial,
    Paid,
    Overdue,
}

impl FeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeStatus::Pending => "pending",
            FeeStatus::Partial => "partial",
            FeeStatus::Paid => "paid",
            FeeStatus::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Online,
    Card,
    Upi,
}

/// Fee row; a billable obligation owed by one student.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub id: Uuid,
    pub student_id: Uuid,
    pub amount: Decimal,
    pub amount_paid: Decimal,
    pub fee_type: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<PaymentMethod>,
    pub transaction_id: Option<String>,
    pub status: FeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create request DTO. Required fields are optional here so absence maps to
/// the ledger's own 400 message rather than a body-deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeRequest {
    pub student_id: Option<Uuid>,
    pub amount: Option<Decimal>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub fee_type: Option<String>,
    pub description: Option<String>,
}

/// Payment request DTO. Increments must be strictly positive; there is no
/// upper bound (overpayment is accepted).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    #[validate(custom = "crate::validation::validate_positive_amount")]
    pub amount_paid: Decimal,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
}

/// Update request DTO; omitted fields keep their stored values.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeeRequest {
    #[validate(custom = "crate::validation::validate_non_negative_amount")]
    pub amount: Option<Decimal>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub fee_type: Option<String>,
    pub description: Option<String>,
    pub status: Option<FeeStatus>,
}

/// Query parameters for the fee list.
#[derive(Debug, Deserialize)]
pub struct FeeListQuery {
    pub status: Option<FeeStatus>,
    pub limit: Option<i64>,
}

/// Aggregate collection figures for the admin dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeStats {
    pub total_pending: i64,
    pub total_overdue: i64,
    pub total_collected: Decimal,
    pub monthly_revenue: Decimal,
}
