// Centralized error types for the plain CRUD modules.
// Every failure maps directly to an HTTP response in the
// `{status: 'error', message}` envelope; there is no local recovery.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{debug, error, warn};

/// Main error type for the API.
/// Handlers in the CRUD modules return `Result<T, ApiError>`.
#[derive(Debug)]
pub enum ApiError {
    /// Request validation failures caught before persistence.
    /// Maps to HTTP 400 Bad Request.
    Validation(validator::ValidationErrors),

    /// Missing/malformed required fields with a hand-written message.
    /// Maps to HTTP 400 Bad Request.
    BadRequest(String),

    /// Resource not found by id.
    /// Maps to HTTP 404 Not Found.
    NotFound { resource: &'static str },

    /// Unique-constraint violation (username/email/phone).
    /// Maps to HTTP 409 Conflict.
    Conflict { message: String },

    /// Unexpected store failure. Details are logged, never surfaced.
    /// Maps to HTTP 500 Internal Server Error.
    Database(sqlx::Error),

    /// Other internal failures.
    /// Maps to HTTP 500 Internal Server Error.
    Internal(String),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            ApiError::Validation(errors) => {
                debug!("Validation error: {:?}", errors);
                validation_message(errors)
            }
            ApiError::BadRequest(message) => {
                debug!("Bad request: {}", message);
                message.clone()
            }
            ApiError::NotFound { resource } => {
                debug!("{} not found", resource);
                format!("{} not found", resource)
            }
            ApiError::Conflict { message } => {
                warn!("Conflict: {}", message);
                message.clone()
            }
            ApiError::Database(db_error) => {
                error!("Database error: {:?}", db_error);
                "Internal server error".to_string()
            }
            ApiError::Internal(internal) => {
                error!("Internal error: {}", internal);
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.client_message();

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Flatten validator output into a single human-readable message.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let detail = field_errors
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "is invalid".to_string());
            format!("{}: {}", field, detail)
        })
        .collect();
    parts.sort();

    if parts.is_empty() {
        "Request validation failed".to_string()
    } else {
        parts.join("; ")
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &error {
            if db_err.is_unique_violation() {
                return ApiError::Conflict {
                    message: conflict_field_message(db_err.constraint()),
                };
            }
        }
        ApiError::Database(error)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// Surface unique-constraint violations per offending field, using the
/// Postgres constraint name (e.g. `students_username_key`).
fn conflict_field_message(constraint: Option<&str>) -> String {
    let field = constraint.and_then(|name| {
        ["username", "email", "phone_number"]
            .into_iter()
            .find(|field| name.contains(field))
    });

    match field {
        Some("phone_number") => "Phone number already exists".to_string(),
        Some("email") => "Email already exists".to_string(),
        Some("username") => "Username already exists".to_string(),
        _ => "Duplicate value violates a unique constraint".to_string(),
    }
}
