// Data access layer for attendance records

use crate::attendance::models::AttendanceRecord;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

const ATTENDANCE_COLUMNS: &str =
    "id, student_id, date, status, method, confidence, check_in_time, marked_by, created_at";

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance (id, student_id, date, status, method, confidence, \
             check_in_time, marked_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {ATTENDANCE_COLUMNS}"
        );

        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(record.id)
            .bind(record.student_id)
            .bind(record.date)
            .bind(record.status)
            .bind(record.method)
            .bind(record.confidence)
            .bind(record.check_in_time)
            .bind(record.marked_by)
            .bind(record.created_at)
            .fetch_one(&self.pool)
            .await
    }

    /// Insert or replace the record for (student, date). Manual roll calls
    /// overwrite whatever the kiosk recorded earlier the same day.
    pub async fn upsert(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance (id, student_id, date, status, method, confidence, \
             check_in_time, marked_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (student_id, date) DO UPDATE SET \
             status = EXCLUDED.status, method = EXCLUDED.method, \
             confidence = EXCLUDED.confidence, check_in_time = EXCLUDED.check_in_time, \
             marked_by = EXCLUDED.marked_by \
             RETURNING {ATTENDANCE_COLUMNS}"
        );

        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(record.id)
            .bind(record.student_id)
            .bind(record.date)
            .bind(record.status)
            .bind(record.method)
            .bind(record.confidence)
            .bind(record.check_in_time)
            .bind(record.marked_by)
            .bind(record.created_at)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn exists_for_date(
        &self,
        student_id: Uuid,
        date: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM attendance WHERE student_id = $1 AND date = $2)",
        )
        .bind(student_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn for_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance \
             WHERE date = $1 ORDER BY check_in_time ASC NULLS LAST"
        );

        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(date)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance \
             WHERE student_id = $1 ORDER BY date DESC"
        );

        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await
    }
}
