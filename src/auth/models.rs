// Identity models: the two principal tables and their request/response DTOs.

use crate::students::models::{Belt, StudentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Principal role. Admin users store `admin` or `parent`; students never
/// store a role — `student` is inferred from which table matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Parent,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Parent => "parent",
            Role::Student => "student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Administrative user row, password hash included.
/// Only the login path loads this; everything else uses [`AdminProfile`].
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub last_login: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Student credential row for login; the full profile lives in the
/// students module.
#[derive(Debug, Clone, FromRow)]
pub struct StudentCredentials {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub belt: Belt,
    pub status: StudentStatus,
}

/// Admin projection attached to the request context. No password hash.
#[derive(Debug, Clone, FromRow)]
pub struct AdminProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub last_login: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Student projection attached to the request context. No password hash.
#[derive(Debug, Clone, FromRow)]
pub struct StudentProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: String,
    pub belt: Belt,
    pub status: StudentStatus,
}

/// Resolved principal: whichever identity table matched the token's id.
///
/// Role is derived from the variant, never from ad hoc instance checks.
#[derive(Debug, Clone)]
pub enum Principal {
    Admin(AdminProfile),
    Student(StudentProfile),
}

impl Principal {
    pub fn id(&self) -> Uuid {
        match self {
            Principal::Admin(admin) => admin.id,
            Principal::Student(student) => student.id,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Principal::Admin(admin) => &admin.username,
            Principal::Student(student) => &student.username,
        }
    }

    /// Admins carry their stored role; a student principal is always
    /// `student` regardless of anything else.
    pub fn role(&self) -> Role {
        match self {
            Principal::Admin(admin) => admin.role,
            Principal::Student(_) => Role::Student,
        }
    }
}

/// Login request DTO. Fields are optional so a missing one maps to a 400
/// instead of a body-deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Normalized user projection returned by login and `/api/auth/me`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProjection {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub belt: Option<Belt>,
}

impl From<&Principal> for UserProjection {
    fn from(principal: &Principal) -> Self {
        match principal {
            Principal::Admin(admin) => Self {
                id: admin.id,
                username: admin.username.clone(),
                email: admin.email.clone(),
                role: admin.role,
                student_id: None,
                name: None,
                belt: None,
            },
            Principal::Student(student) => Self {
                id: student.id,
                username: student.username.clone(),
                email: student.email.clone(),
                role: Role::Student,
                student_id: Some(student.id),
                name: Some(student.name.clone()),
                belt: Some(student.belt),
            },
        }
    }
}

/// Login response DTO: `{status, token, user}`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub token: String,
    pub user: UserProjection,
}

/// `/api/auth/me` response DTO: `{status, user}`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub status: &'static str,
    pub user: UserProjection,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_profile() -> StudentProfile {
        StudentProfile {
            id: Uuid::new_v4(),
            username: "kenji".to_string(),
            email: "kenji@example.com".to_string(),
            name: "Kenji Sato".to_string(),
            belt: Belt::GreenBelt,
            status: StudentStatus::Active,
        }
    }

    #[test]
    fn student_principal_role_is_always_student() {
        let principal = Principal::Student(student_profile());
        assert_eq!(principal.role(), Role::Student);
    }

    #[test]
    fn admin_principal_role_comes_from_the_row() {
        let principal = Principal::Admin(AdminProfile {
            id: Uuid::new_v4(),
            username: "sensei".to_string(),
            email: "sensei@example.com".to_string(),
            role: Role::Parent,
            last_login: None,
            is_active: true,
        });
        assert_eq!(principal.role(), Role::Parent);
    }

    #[test]
    fn student_projection_carries_student_fields() {
        let profile = student_profile();
        let id = profile.id;
        let projection = UserProjection::from(&Principal::Student(profile));

        assert_eq!(projection.role, Role::Student);
        assert_eq!(projection.student_id, Some(id));
        assert_eq!(projection.name.as_deref(), Some("Kenji Sato"));
        assert_eq!(projection.belt, Some(Belt::GreenBelt));
    }

    #[test]
    fn admin_projection_omits_student_fields() {
        let projection = UserProjection::from(&Principal::Admin(AdminProfile {
            id: Uuid::new_v4(),
            username: "sensei".to_string(),
            email: "sensei@example.com".to_string(),
            role: Role::Admin,
            last_login: None,
            is_active: true,
        }));

        let body = serde_json::to_value(&projection).unwrap();
        assert!(body.get("studentId").is_none());
        assert!(body.get("belt").is_none());
        assert_eq!(body["role"], "admin");
    }
}
