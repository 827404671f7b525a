// Fee status derivation rules.
//
// Status is a cached field, recomputed on every save and never on read: a
// pending fee whose due date has passed keeps reading as pending until the
// next write touches it. Route handlers must run these rules before any
// persist so a stored status is never inconsistent with the amounts on the
// same row.

use crate::fees::models::{Fee, FeeStatus, PaymentMethod};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Write-time overdue transition: pending fees past their due date become
/// overdue. Every other status passes through untouched.
pub fn overdue_on_save(
    status: FeeStatus,
    due_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> FeeStatus {
    if status == FeeStatus::Pending && now > due_date {
        FeeStatus::Overdue
    } else {
        status
    }
}

/// Settlement status from the accumulated amounts. Overpayment is accepted
/// without clamping, so `amount_paid` may exceed `amount`.
pub fn settle(amount: Decimal, amount_paid: Decimal) -> FeeStatus {
    if amount_paid >= amount {
        FeeStatus::Paid
    } else {
        FeeStatus::Partial
    }
}

/// Apply one payment to a fee: increments accumulate across calls, the
/// payment metadata is replaced, and the status is re-derived. A partial fee
/// stays eligible for further payments.
pub fn apply_payment(
    fee: &mut Fee,
    amount_paid: Decimal,
    payment_method: PaymentMethod,
    transaction_id: Option<String>,
    now: DateTime<Utc>,
) {
    fee.amount_paid += amount_paid;
    fee.payment_date = Some(now);
    fee.payment_method = Some(payment_method);
    fee.transaction_id = transaction_id;
    fee.status = settle(fee.amount, fee.amount_paid);
}
