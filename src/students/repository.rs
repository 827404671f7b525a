// Database access for student records

use crate::error::ApiError;
use crate::students::models::{Student, StudentStatus, UpdateStudentRequest};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

const STUDENT_COLUMNS: &str = "id, username, email, phone_number, parent_phone, password_hash, \
     name, age, gender, belt, status, address, profile_image, join_date, created_at, updated_at";

/// Repository for student records.
#[derive(Clone)]
pub struct StudentsRepository {
    pool: PgPool,
}

impl StudentsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List students with optional status filter and case-insensitive name
    /// search, sorted by name.
    pub async fn list(
        &self,
        status: Option<StudentStatus>,
        search: Option<&str>,
    ) -> Result<Vec<Student>, ApiError> {
        let pattern = search.map(|s| format!("%{}%", s));

        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR name ILIKE $2)
             ORDER BY name"
        ))
        .bind(status)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// Free-text name search with a fixed result cap.
    pub async fn search(&self, query: &str, limit: i64) -> Result<Vec<Student>, ApiError> {
        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE name ILIKE $1 ORDER BY name LIMIT $2"
        ))
        .bind(format!("%{}%", query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, ApiError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    /// Insert a fully-populated student row.
    pub async fn insert(&self, student: &Student) -> Result<Student, ApiError> {
        let inserted = sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students
                 (id, username, email, phone_number, parent_phone, password_hash,
                  name, age, gender, belt, status, address, profile_image, join_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(student.id)
        .bind(&student.username)
        .bind(&student.email)
        .bind(&student.phone_number)
        .bind(&student.parent_phone)
        .bind(&student.password_hash)
        .bind(&student.name)
        .bind(student.age)
        .bind(student.gender)
        .bind(student.belt)
        .bind(student.status)
        .bind(&student.address)
        .bind(&student.profile_image)
        .bind(student.join_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    /// Field-merge update: omitted fields keep their stored values.
    pub async fn update(
        &self,
        id: Uuid,
        changes: &UpdateStudentRequest,
    ) -> Result<Option<Student>, ApiError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let updated = sqlx::query_as::<_, Student>(&format!(
            "UPDATE students
             SET email = $1, phone_number = $2, parent_phone = $3, name = $4,
                 age = $5, gender = $6, belt = $7, status = $8, address = $9,
                 profile_image = $10, updated_at = $11
             WHERE id = $12
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(changes.email.as_ref().unwrap_or(&existing.email))
        .bind(changes.phone_number.as_ref().or(existing.phone_number.as_ref()))
        .bind(changes.parent_phone.as_ref().or(existing.parent_phone.as_ref()))
        .bind(changes.name.as_ref().unwrap_or(&existing.name))
        .bind(changes.age.unwrap_or(existing.age))
        .bind(changes.gender.or(existing.gender))
        .bind(changes.belt.unwrap_or(existing.belt))
        .bind(changes.status.unwrap_or(existing.status))
        .bind(changes.address.as_ref().or(existing.address.as_ref()))
        .bind(changes.profile_image.as_ref().or(existing.profile_image.as_ref()))
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(updated))
    }

    /// Hard delete. Returns false when the id does not resolve. The fees
    /// foreign key has no cascade, so a student with ledger rows is kept
    /// and the caller gets a conflict instead.
    pub async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(delete_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn delete_error(error: sqlx::Error) -> ApiError {
    match &error {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => ApiError::Conflict {
            message: "Cannot delete a student with linked fee records".to_string(),
        },
        _ => ApiError::from(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use sqlx::error::ErrorKind;

    #[derive(Debug)]
    struct FkViolation;

    impl std::fmt::Display for FkViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "violates foreign key constraint \"fees_student_id_fkey\"")
        }
    }

    impl std::error::Error for FkViolation {}

    impl sqlx::error::DatabaseError for FkViolation {
        fn message(&self) -> &str {
            "violates foreign key constraint \"fees_student_id_fkey\""
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::ForeignKeyViolation
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn deleting_a_student_with_fee_records_is_a_conflict() {
        let error = delete_error(sqlx::Error::Database(Box::new(FkViolation)));

        match error {
            ApiError::Conflict { message } => {
                assert_eq!(message, "Cannot delete a student with linked fee records");
            }
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn other_delete_failures_stay_internal() {
        let error = delete_error(sqlx::Error::RowNotFound);
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
