// Login flow - business logic layer

use crate::auth::{
    error::AuthError,
    models::{LoginResponse, Role, UserProjection},
    password::PasswordService,
    repository::{AuthRepository, IdentityStore},
    token::TokenService,
};
use crate::students::models::StudentStatus;
use tracing::info;

/// Authentication service coordinating credential lookup, password
/// verification and token issuance.
#[derive(Clone)]
pub struct AuthService<S: IdentityStore = AuthRepository> {
    repo: S,
    tokens: TokenService,
}

impl<S: IdentityStore> AuthService<S> {
    pub fn new(repo: S, tokens: TokenService) -> Self {
        Self { repo, tokens }
    }

    /// Log a principal in by username and password.
    ///
    /// Resolution order is admin first, then student; unknown usernames and
    /// wrong passwords produce the same error. The inactive-account check
    /// runs only after the password verifies, so account status cannot be
    /// probed with guessed passwords.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        if let Some(admin) = self.repo.find_admin_by_username(username).await? {
            if !PasswordService::verify_password(password, &admin.password_hash)? {
                return Err(AuthError::InvalidCredentials);
            }

            let token = self.tokens.issue(admin.id, Some(admin.role))?;
            self.repo.touch_last_login(admin.id).await?;
            info!("User logged in: {}", admin.username);

            return Ok(LoginResponse {
                status: "success",
                token,
                user: UserProjection {
                    id: admin.id,
                    username: admin.username,
                    email: admin.email,
                    role: admin.role,
                    student_id: None,
                    name: None,
                    belt: None,
                },
            });
        }

        let student = self
            .repo
            .find_student_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(password, &student.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        // Intentionally after the password check: a wrong password on an
        // inactive account must look like any other bad credential.
        if student.status != StudentStatus::Active {
            return Err(AuthError::InactiveAccount);
        }

        // Student tokens carry no role claim; role is re-derived at
        // resolution time from whichever table matches.
        let token = self.tokens.issue(student.id, None)?;
        info!("Student logged in: {}", student.username);

        Ok(LoginResponse {
            status: "success",
            token,
            user: UserProjection {
                id: student.id,
                username: student.username,
                email: student.email,
                role: Role::Student,
                student_id: Some(student.id),
                name: Some(student.name),
                belt: Some(student.belt),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{AdminProfile, AdminUser, Principal, StudentCredentials};
    use crate::students::models::Belt;
    use axum::async_trait;
    use axum::http::StatusCode;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";

    #[derive(Clone, Default)]
    struct InMemoryIdentityStore {
        admins: Vec<AdminUser>,
        students: Vec<StudentCredentials>,
        touched: Arc<Mutex<Vec<Uuid>>>,
    }

    #[async_trait]
    impl IdentityStore for InMemoryIdentityStore {
        async fn find_admin_by_username(
            &self,
            username: &str,
        ) -> Result<Option<AdminUser>, AuthError> {
            Ok(self
                .admins
                .iter()
                .find(|a| a.username == username)
                .cloned())
        }

        async fn find_student_by_username(
            &self,
            username: &str,
        ) -> Result<Option<StudentCredentials>, AuthError> {
            Ok(self
                .students
                .iter()
                .find(|s| s.username == username)
                .cloned())
        }

        async fn resolve_principal(&self, id: Uuid) -> Result<Option<Principal>, AuthError> {
            if let Some(admin) = self.admins.iter().find(|a| a.id == id) {
                return Ok(Some(Principal::Admin(AdminProfile {
                    id: admin.id,
                    username: admin.username.clone(),
                    email: admin.email.clone(),
                    role: admin.role,
                    last_login: admin.last_login,
                    is_active: admin.is_active,
                })));
            }
            Ok(None)
        }

        async fn touch_last_login(&self, admin_id: Uuid) -> Result<(), AuthError> {
            self.touched.lock().unwrap().push(admin_id);
            Ok(())
        }
    }

    fn admin(username: &str, password: &str, role: Role) -> AdminUser {
        AdminUser {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: PasswordService::hash_password(password).unwrap(),
            role,
            last_login: None,
            is_active: true,
        }
    }

    fn student(username: &str, password: &str, status: StudentStatus) -> StudentCredentials {
        StudentCredentials {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: PasswordService::hash_password(password).unwrap(),
            name: "Kenji Sato".to_string(),
            belt: Belt::Beginner,
            status,
        }
    }

    fn service(store: InMemoryIdentityStore) -> AuthService<InMemoryIdentityStore> {
        AuthService::new(store, TokenService::new(TEST_SECRET, 3600, 7200))
    }

    #[tokio::test]
    async fn admin_login_returns_the_stored_role_and_role_claim() {
        let admin = admin("sensei", "kiai-1234", Role::Parent);
        let admin_id = admin.id;
        let store = InMemoryIdentityStore {
            admins: vec![admin],
            ..Default::default()
        };
        let touched = store.touched.clone();

        let response = service(store).login("sensei", "kiai-1234").await.unwrap();

        assert_eq!(response.user.role, Role::Parent);
        assert_eq!(response.user.student_id, None);

        let claims = TokenService::new(TEST_SECRET, 3600, 7200)
            .verify(&response.token)
            .unwrap();
        assert_eq!(claims.sub, admin_id);
        assert_eq!(claims.role, Some(Role::Parent));
        assert_eq!(*touched.lock().unwrap(), vec![admin_id]);
    }

    #[tokio::test]
    async fn student_login_role_is_student_and_token_has_no_role_claim() {
        let student = student("kenji", "kiai-1234", StudentStatus::Active);
        let student_id = student.id;
        let store = InMemoryIdentityStore {
            students: vec![student],
            ..Default::default()
        };

        let response = service(store).login("kenji", "kiai-1234").await.unwrap();

        assert_eq!(response.user.role, Role::Student);
        assert_eq!(response.user.student_id, Some(student_id));
        assert_eq!(response.user.belt, Some(Belt::Beginner));

        let claims = TokenService::new(TEST_SECRET, 3600, 7200)
            .verify(&response.token)
            .unwrap();
        assert_eq!(claims.role, None);
    }

    #[tokio::test]
    async fn inactive_student_with_correct_password_gets_inactive_account() {
        let store = InMemoryIdentityStore {
            students: vec![student("kenji", "kiai-1234", StudentStatus::Inactive)],
            ..Default::default()
        };

        let err = service(store).login("kenji", "kiai-1234").await.unwrap_err();
        assert!(matches!(err, AuthError::InactiveAccount));
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn inactive_student_with_wrong_password_looks_like_bad_credentials() {
        // the status check runs after password verification, so a guessed
        // password cannot probe whether an account is inactive
        let store = InMemoryIdentityStore {
            students: vec![student("kenji", "kiai-1234", StudentStatus::Suspended)],
            ..Default::default()
        };

        let err = service(store).login("kenji", "wrong-pass").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_are_indistinguishable() {
        let store = InMemoryIdentityStore {
            students: vec![student("kenji", "kiai-1234", StudentStatus::Active)],
            ..Default::default()
        };
        let service = service(store);

        let unknown = service.login("nobody", "whatever").await.unwrap_err();
        let mismatch = service.login("kenji", "wrong-pass").await.unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(mismatch, AuthError::InvalidCredentials));
        assert_eq!(unknown.client_message(), mismatch.client_message());
        assert_eq!(unknown.status_code(), mismatch.status_code());
    }

    #[tokio::test]
    async fn admin_shadows_a_student_with_the_same_username() {
        let store = InMemoryIdentityStore {
            admins: vec![admin("kai", "admin-pass", Role::Admin)],
            students: vec![student("kai", "student-pass", StudentStatus::Active)],
            ..Default::default()
        };
        let service = service(store);

        // the student's own password no longer works for this username
        let err = service.login("kai", "student-pass").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let response = service.login("kai", "admin-pass").await.unwrap();
        assert_eq!(response.user.role, Role::Admin);
    }
}
