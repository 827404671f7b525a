use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

/// Error types for fee ledger operations
#[derive(Debug, thiserror::Error)]
pub enum FeeError {
    #[error("Fee record not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for FeeError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return FeeError::Validation("Student not found".to_string());
            }
        }
        FeeError::Database(err.to_string())
    }
}

impl IntoResponse for FeeError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            FeeError::NotFound => (StatusCode::NOT_FOUND, "Fee record not found".to_string()),
            FeeError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            FeeError::Database(msg) => {
                error!("Database error in fees: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).into_response()
    }
}
