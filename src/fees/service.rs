// Fee ledger operations. All status derivation happens here, before any
// row reaches the store.

use crate::fees::error::FeeError;
use crate::fees::lifecycle::{apply_payment, overdue_on_save};
use crate::fees::models::{
    CreateFeeRequest, Fee, FeeStats, FeeStatus, RecordPaymentRequest, UpdateFeeRequest,
};
use crate::fees::repository::{FeeStore, FeesRepository};
use chrono::{Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const DEFAULT_FEE_TYPE: &str = "monthly";
const DEFAULT_LIST_LIMIT: i64 = 50;
const PAID_HISTORY_LIMIT: i64 = 20;

#[derive(Clone)]
pub struct FeeService<S: FeeStore = FeesRepository> {
    repo: S,
}

impl FeeService<FeesRepository> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: FeesRepository::new(pool),
        }
    }
}

impl<S: FeeStore> FeeService<S> {
    pub fn with_store(repo: S) -> Self {
        Self { repo }
    }

    pub async fn create_fee(&self, payload: CreateFeeRequest) -> Result<Fee, FeeError> {
        let (student_id, amount, due_date) =
            match (payload.student_id, payload.amount, payload.due_date) {
                (Some(s), Some(a), Some(d)) => (s, a, d),
                _ => {
                    return Err(FeeError::Validation(
                        "Please provide studentId, amount, and dueDate".to_string(),
                    ))
                }
            };

        if amount < Decimal::ZERO {
            return Err(FeeError::Validation(
                "Amount must not be negative".to_string(),
            ));
        }

        let now = Utc::now();
        let fee = Fee {
            id: Uuid::new_v4(),
            student_id,
            amount,
            amount_paid: Decimal::ZERO,
            fee_type: payload
                .fee_type
                .unwrap_or_else(|| DEFAULT_FEE_TYPE.to_string()),
            description: payload.description,
            due_date,
            payment_date: None,
            payment_method: None,
            transaction_id: None,
            status: overdue_on_save(FeeStatus::Pending, due_date, now),
            created_at: now,
            updated_at: now,
        };

        self.repo.insert(&fee).await
    }

    /// Record one payment against a fee. Increments accumulate; a fee that
    /// is already paid still accepts further payments.
    pub async fn record_payment(
        &self,
        id: Uuid,
        payload: RecordPaymentRequest,
    ) -> Result<Fee, FeeError> {
        payload
            .validate()
            .map_err(|_| FeeError::Validation("Payment amount must be positive".to_string()))?;

        let mut fee = self.repo.find_by_id(id).await?.ok_or(FeeError::NotFound)?;

        let now = Utc::now();
        apply_payment(
            &mut fee,
            payload.amount_paid,
            payload.payment_method,
            payload.transaction_id,
            now,
        );
        fee.status = overdue_on_save(fee.status, fee.due_date, now);

        self.repo.update(&fee).await
    }

    pub async fn update_fee(
        &self,
        id: Uuid,
        payload: UpdateFeeRequest,
    ) -> Result<Fee, FeeError> {
        payload
            .validate()
            .map_err(|_| FeeError::Validation("Amount must not be negative".to_string()))?;

        let mut fee = self.repo.find_by_id(id).await?.ok_or(FeeError::NotFound)?;

        if let Some(amount) = payload.amount {
            fee.amount = amount;
        }
        if let Some(due_date) = payload.due_date {
            fee.due_date = due_date;
        }
        if let Some(fee_type) = payload.fee_type {
            fee.fee_type = fee_type;
        }
        if let Some(description) = payload.description {
            fee.description = Some(description);
        }
        if let Some(status) = payload.status {
            fee.status = status;
        }
        fee.status = overdue_on_save(fee.status, fee.due_date, Utc::now());

        self.repo.update(&fee).await
    }

    pub async fn delete_fee(&self, id: Uuid) -> Result<(), FeeError> {
        let deleted = self.repo.delete(id).await?;
        if !deleted {
            return Err(FeeError::NotFound);
        }
        Ok(())
    }

    /// Plain read: the stored row is returned as-is, status included.
    pub async fn get_fee(&self, id: Uuid) -> Result<Fee, FeeError> {
        self.repo.find_by_id(id).await?.ok_or(FeeError::NotFound)
    }

    pub async fn list_fees(
        &self,
        status: Option<FeeStatus>,
        limit: Option<i64>,
    ) -> Result<Vec<Fee>, FeeError> {
        self.repo
            .list(status, limit.unwrap_or(DEFAULT_LIST_LIMIT))
            .await
    }

    pub async fn fees_for_student(&self, student_id: Uuid) -> Result<Vec<Fee>, FeeError> {
        self.repo.by_student(student_id).await
    }

    pub async fn paid_history(&self, student_id: Uuid) -> Result<Vec<Fee>, FeeError> {
        self.repo.paid_history(student_id, PAID_HISTORY_LIMIT).await
    }

    pub async fn pending_fees(&self) -> Result<Vec<Fee>, FeeError> {
        self.repo.pending().await
    }

    pub async fn overdue_fees(&self) -> Result<Vec<Fee>, FeeError> {
        self.repo.overdue(Utc::now()).await
    }

    pub async fn stats(&self) -> Result<FeeStats, FeeError> {
        let now = Utc::now();
        let month_start = Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .unwrap_or(now);
        let month_end = if now.month() == 12 {
            Utc.with_ymd_and_hms(now.year() + 1, 1, 1, 0, 0, 0)
        } else {
            Utc.with_ymd_and_hms(now.year(), now.month() + 1, 1, 0, 0, 0)
        }
        .single()
        .unwrap_or(now);

        self.repo.stats(now, month_start, month_end).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::models::PaymentMethod;
    use axum::async_trait;
    use chrono::{DateTime, Duration};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// In-memory store mirroring the SQL report predicates.
    #[derive(Clone, Default)]
    struct InMemoryFeeStore {
        rows: Arc<Mutex<HashMap<Uuid, Fee>>>,
    }

    impl InMemoryFeeStore {
        fn put(&self, fee: Fee) {
            self.rows.lock().unwrap().insert(fee.id, fee);
        }

        fn with_row<F: FnOnce(&mut Fee)>(&self, id: Uuid, f: F) {
            let mut rows = self.rows.lock().unwrap();
            f(rows.get_mut(&id).unwrap());
        }
    }

    #[async_trait]
    impl FeeStore for InMemoryFeeStore {
        async fn insert(&self, fee: &Fee) -> Result<Fee, FeeError> {
            self.put(fee.clone());
            Ok(fee.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Fee>, FeeError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn update(&self, fee: &Fee) -> Result<Fee, FeeError> {
            self.put(fee.clone());
            Ok(fee.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, FeeError> {
            Ok(self.rows.lock().unwrap().remove(&id).is_some())
        }

        async fn list(
            &self,
            status: Option<FeeStatus>,
            limit: i64,
        ) -> Result<Vec<Fee>, FeeError> {
            let mut fees: Vec<Fee> = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|f| status.map_or(true, |s| f.status == s))
                .cloned()
                .collect();
            fees.sort_by(|a, b| b.due_date.cmp(&a.due_date));
            fees.truncate(limit as usize);
            Ok(fees)
        }

        async fn by_student(&self, student_id: Uuid) -> Result<Vec<Fee>, FeeError> {
            let mut fees: Vec<Fee> = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|f| f.student_id == student_id)
                .cloned()
                .collect();
            fees.sort_by(|a, b| b.due_date.cmp(&a.due_date));
            Ok(fees)
        }

        async fn paid_history(
            &self,
            student_id: Uuid,
            limit: i64,
        ) -> Result<Vec<Fee>, FeeError> {
            let mut fees: Vec<Fee> = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|f| f.student_id == student_id && f.status == FeeStatus::Paid)
                .cloned()
                .collect();
            fees.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
            fees.truncate(limit as usize);
            Ok(fees)
        }

        async fn pending(&self) -> Result<Vec<Fee>, FeeError> {
            let mut fees: Vec<Fee> = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|f| f.status == FeeStatus::Pending)
                .cloned()
                .collect();
            fees.sort_by_key(|f| f.due_date);
            Ok(fees)
        }

        async fn overdue(&self, now: DateTime<Utc>) -> Result<Vec<Fee>, FeeError> {
            let mut fees: Vec<Fee> = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|f| {
                    matches!(f.status, FeeStatus::Pending | FeeStatus::Overdue)
                        && f.due_date < now
                })
                .cloned()
                .collect();
            fees.sort_by_key(|f| f.due_date);
            Ok(fees)
        }

        async fn stats(
            &self,
            now: DateTime<Utc>,
            month_start: DateTime<Utc>,
            month_end: DateTime<Utc>,
        ) -> Result<FeeStats, FeeError> {
            let rows = self.rows.lock().unwrap();
            Ok(FeeStats {
                total_pending: rows
                    .values()
                    .filter(|f| f.status == FeeStatus::Pending)
                    .count() as i64,
                total_overdue: rows
                    .values()
                    .filter(|f| {
                        matches!(f.status, FeeStatus::Pending | FeeStatus::Overdue)
                            && f.due_date < now
                    })
                    .count() as i64,
                total_collected: rows.values().map(|f| f.amount_paid).sum(),
                monthly_revenue: rows
                    .values()
                    .filter(|f| {
                        f.payment_date
                            .map_or(false, |p| p >= month_start && p < month_end)
                    })
                    .map(|f| f.amount_paid)
                    .sum(),
            })
        }
    }

    fn service() -> (FeeService<InMemoryFeeStore>, InMemoryFeeStore) {
        let store = InMemoryFeeStore::default();
        (FeeService::with_store(store.clone()), store)
    }

    fn create_request(amount: Decimal, due: DateTime<Utc>) -> CreateFeeRequest {
        CreateFeeRequest {
            student_id: Some(Uuid::new_v4()),
            amount: Some(amount),
            due_date: Some(due),
            fee_type: None,
            description: None,
        }
    }

    fn payment(amount: Decimal) -> RecordPaymentRequest {
        RecordPaymentRequest {
            amount_paid: amount,
            payment_method: PaymentMethod::Cash,
            transaction_id: None,
        }
    }

    fn empty_update() -> UpdateFeeRequest {
        UpdateFeeRequest {
            amount: None,
            due_date: None,
            fee_type: None,
            description: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn create_requires_the_three_core_fields() {
        let (service, _) = service();
        let request = CreateFeeRequest {
            student_id: Some(Uuid::new_v4()),
            amount: None,
            due_date: Some(Utc::now()),
            fee_type: None,
            description: None,
        };

        let err = service.create_fee(request).await.unwrap_err();
        assert!(matches!(err, FeeError::Validation(msg)
            if msg == "Please provide studentId, amount, and dueDate"));
    }

    #[tokio::test]
    async fn past_due_fee_reads_pending_until_the_next_write() {
        let (service, store) = service();

        let fee = service
            .create_fee(create_request(dec!(100), Utc::now() + Duration::days(30)))
            .await
            .unwrap();
        assert_eq!(fee.status, FeeStatus::Pending);

        // due date slips into the past without any save touching the row
        store.with_row(fee.id, |row| {
            row.due_date = Utc::now() - Duration::days(3);
        });

        // a plain read still reports the cached status
        let read = service.get_fee(fee.id).await.unwrap();
        assert_eq!(read.status, FeeStatus::Pending);

        // the next write recomputes it
        let saved = service.update_fee(fee.id, empty_update()).await.unwrap();
        assert_eq!(saved.status, FeeStatus::Overdue);
        assert_eq!(
            service.get_fee(fee.id).await.unwrap().status,
            FeeStatus::Overdue
        );
    }

    #[tokio::test]
    async fn overdue_report_catches_never_resaved_pending_fees() {
        let (service, store) = service();

        let fee = service
            .create_fee(create_request(dec!(100), Utc::now() + Duration::days(30)))
            .await
            .unwrap();
        store.with_row(fee.id, |row| {
            row.due_date = Utc::now() - Duration::days(1);
        });

        // cached status is still pending, yet the due-date predicate finds it
        let overdue = service.overdue_fees().await.unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].status, FeeStatus::Pending);

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_overdue, 1);
        assert_eq!(stats.total_pending, 1);
    }

    #[tokio::test]
    async fn pending_report_excludes_partial_fees() {
        let (service, _store) = service();

        let fee = service
            .create_fee(create_request(dec!(100), Utc::now() + Duration::days(30)))
            .await
            .unwrap();
        service.record_payment(fee.id, payment(dec!(40))).await.unwrap();

        assert!(service.pending_fees().await.unwrap().is_empty());

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_pending, 0);
        assert_eq!(stats.total_collected, dec!(40));
    }

    #[tokio::test]
    async fn payments_accumulate_through_the_service() {
        let (service, _store) = service();

        let fee = service
            .create_fee(create_request(dec!(100), Utc::now() + Duration::days(30)))
            .await
            .unwrap();

        let after_first = service
            .record_payment(fee.id, payment(dec!(60)))
            .await
            .unwrap();
        assert_eq!(after_first.status, FeeStatus::Partial);

        let after_second = service
            .record_payment(fee.id, payment(dec!(50)))
            .await
            .unwrap();
        assert_eq!(after_second.amount_paid, dec!(110));
        assert_eq!(after_second.status, FeeStatus::Paid);
    }

    #[tokio::test]
    async fn payment_on_a_missing_fee_is_not_found() {
        let (service, _store) = service();

        let err = service
            .record_payment(Uuid::new_v4(), payment(dec!(10)))
            .await
            .unwrap_err();
        assert!(matches!(err, FeeError::NotFound));
    }

    #[tokio::test]
    async fn non_positive_payments_are_rejected() {
        let (service, _store) = service();
        let fee = service
            .create_fee(create_request(dec!(100), Utc::now() + Duration::days(30)))
            .await
            .unwrap();

        for bad in [dec!(0), dec!(-10)] {
            let err = service
                .record_payment(fee.id, payment(bad))
                .await
                .unwrap_err();
            assert!(matches!(err, FeeError::Validation(_)));
        }
    }
}
