// Identity store queries for login and principal resolution

use crate::auth::error::AuthError;
use crate::auth::models::{AdminProfile, AdminUser, Principal, StudentCredentials, StudentProfile};
use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Lookup seam over the two principal tables. The login flow talks to this
/// trait so its ordering rules can be exercised against an in-memory store.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Admin lookup for login; includes the password hash.
    async fn find_admin_by_username(&self, username: &str)
        -> Result<Option<AdminUser>, AuthError>;

    /// Student lookup for login; includes the password hash.
    async fn find_student_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StudentCredentials>, AuthError>;

    /// Resolve a token's principal id: admin table first, then students.
    async fn resolve_principal(&self, id: Uuid) -> Result<Option<Principal>, AuthError>;

    /// Stamp an admin's last successful login.
    async fn touch_last_login(&self, admin_id: Uuid) -> Result<(), AuthError>;
}

/// Repository over the two principal tables.
#[derive(Clone)]
pub struct AuthRepository {
    pool: PgPool,
}

impl AuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for AuthRepository {
    async fn find_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminUser>, AuthError> {
        sqlx::query_as::<_, AdminUser>(
            "SELECT id, username, email, password_hash, role, last_login, is_active
             FROM admin_users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))
    }

    async fn find_student_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StudentCredentials>, AuthError> {
        sqlx::query_as::<_, StudentCredentials>(
            "SELECT id, username, email, password_hash, name, belt, status
             FROM students WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))
    }

    /// Password hashes are never selected on this path.
    async fn resolve_principal(&self, id: Uuid) -> Result<Option<Principal>, AuthError> {
        let admin = sqlx::query_as::<_, AdminProfile>(
            "SELECT id, username, email, role, last_login, is_active
             FROM admin_users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        if let Some(admin) = admin {
            return Ok(Some(Principal::Admin(admin)));
        }

        let student = sqlx::query_as::<_, StudentProfile>(
            "SELECT id, username, email, name, belt, status
             FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        Ok(student.map(Principal::Student))
    }

    async fn touch_last_login(&self, admin_id: Uuid) -> Result<(), AuthError> {
        sqlx::query("UPDATE admin_users SET last_login = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(admin_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?;

        Ok(())
    }
}
