// Student enrollment models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Belt rank progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text")]
pub enum Belt {
    #[sqlx(rename = "Beginner")]
    Beginner,
    #[sqlx(rename = "Yellow Belt")]
    #[serde(rename = "Yellow Belt")]
    YellowBelt,
    #[sqlx(rename = "Green Belt")]
    #[serde(rename = "Green Belt")]
    GreenBelt,
    #[sqlx(rename = "Brown Belt")]
    #[serde(rename = "Brown Belt")]
    BrownBelt,
    #[sqlx(rename = "Black Belt")]
    #[serde(rename = "Black Belt")]
    BlackBelt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Enrollment status. Only `active` students may log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Inactive,
    Suspended,
}

/// Student row, password hash included. Never serialized; responses go
/// through [`StudentResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub parent_phone: Option<String>,
    pub password_hash: String,
    pub name: String,
    pub age: i32,
    pub gender: Option<Gender>,
    pub belt: Belt,
    pub status: StudentStatus,
    pub address: Option<String>,
    pub profile_image: Option<String>,
    pub join_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student response model (excludes password_hash)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub parent_phone: Option<String>,
    pub name: String,
    pub age: i32,
    pub gender: Option<Gender>,
    pub belt: Belt,
    pub status: StudentStatus,
    pub address: Option<String>,
    pub profile_image: Option<String>,
    pub join_date: DateTime<Utc>,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            username: student.username,
            email: student.email,
            phone_number: student.phone_number,
            parent_phone: student.parent_phone,
            name: student.name,
            age: student.age,
            gender: student.gender,
            belt: student.belt,
            status: student.status,
            address: student.address,
            profile_image: student.profile_image,
            join_date: student.join_date,
        }
    }
}

/// Enrollment request DTO (admin creates the record and credentials).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    #[validate(length(min = 3, max = 30, message = "Username must be 3 to 30 characters"))]
    pub username: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(custom = "crate::validation::validate_phone")]
    pub phone_number: Option<String>,
    #[validate(custom = "crate::validation::validate_phone")]
    pub parent_phone: Option<String>,
    #[validate(length(min = 1, message = "Student name is required"))]
    pub name: String,
    #[validate(range(min = 5, max = 100, message = "Age must be between 5 and 100"))]
    pub age: i32,
    pub gender: Option<Gender>,
    pub belt: Option<Belt>,
    pub status: Option<StudentStatus>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
    pub join_date: Option<DateTime<Utc>>,
}

/// Update request DTO; omitted fields keep their stored values.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
    #[validate(custom = "crate::validation::validate_phone")]
    pub phone_number: Option<String>,
    #[validate(custom = "crate::validation::validate_phone")]
    pub parent_phone: Option<String>,
    #[validate(length(min = 1, message = "Student name is required"))]
    pub name: Option<String>,
    #[validate(range(min = 5, max = 100, message = "Age must be between 5 and 100"))]
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub belt: Option<Belt>,
    pub status: Option<StudentStatus>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn belt_serializes_with_display_names() {
        assert_eq!(
            serde_json::to_value(Belt::YellowBelt).unwrap(),
            serde_json::json!("Yellow Belt")
        );
        assert_eq!(
            serde_json::to_value(Belt::Beginner).unwrap(),
            serde_json::json!("Beginner")
        );
    }

    #[test]
    fn create_request_rejects_bad_phone_and_age() {
        let request = CreateStudentRequest {
            username: "kenji".to_string(),
            email: "kenji@example.com".to_string(),
            password: "long-enough".to_string(),
            phone_number: Some("12345".to_string()),
            parent_phone: None,
            name: "Kenji Sato".to_string(),
            age: 3,
            gender: None,
            belt: None,
            status: None,
            address: None,
            profile_image: None,
            join_date: None,
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("phone_number"));
        assert!(fields.contains_key("age"));
    }

    #[test]
    fn valid_create_request_passes() {
        let request = CreateStudentRequest {
            username: "kenji".to_string(),
            email: "kenji@example.com".to_string(),
            password: "long-enough".to_string(),
            phone_number: Some("0123456789".to_string()),
            parent_phone: Some("9876543210".to_string()),
            name: "Kenji Sato".to_string(),
            age: 12,
            gender: Some(Gender::Male),
            belt: Some(Belt::Beginner),
            status: None,
            address: None,
            profile_image: None,
            join_date: None,
        };

        assert!(request.validate().is_ok());
    }
}
