// Authentication and authorization error types

use crate::auth::models::Role;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{error, warn};

/// Errors surfaced by the token service, auth resolver and login flow.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    /// Token verified but the principal no longer exists in either table.
    #[error("User not found")]
    PrincipalNotFound,

    #[error("Missing username or password")]
    MissingCredentials,

    /// Deliberately identical for unknown usernames and wrong passwords.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Student matched and password verified, but the account is not active.
    #[error("Account is inactive")]
    InactiveAccount,

    /// Role gate mismatch; carries the principal's actual role.
    #[error("User role '{actual}' is not authorized to access this route")]
    InsufficientRole { actual: Role },

    #[error("Password hashing error")]
    PasswordHash,

    #[error("Token generation error: {0}")]
    TokenGeneration(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AuthError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::PrincipalNotFound
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::InactiveAccount | AuthError::InsufficientRole { .. } => {
                StatusCode::FORBIDDEN
            }
            AuthError::PasswordHash | AuthError::TokenGeneration(_) | AuthError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message; safe to surface (no sensitive data).
    ///
    /// Missing, invalid and expired tokens all share one message so a caller
    /// cannot distinguish why token auth failed.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken => {
                "Not authorized to access this route".to_string()
            }
            AuthError::PrincipalNotFound => "User not found".to_string(),
            AuthError::MissingCredentials => "Please provide username and password".to_string(),
            AuthError::InvalidCredentials => "Invalid credentials".to_string(),
            AuthError::InactiveAccount => "Account is inactive".to_string(),
            AuthError::InsufficientRole { actual } => {
                format!("User role '{}' is not authorized to access this route", actual)
            }
            AuthError::PasswordHash | AuthError::TokenGeneration(_) | AuthError::Database(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingToken => warn!("Missing token in request"),
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::ExpiredToken => warn!("Expired token attempt"),
            AuthError::PrincipalNotFound => warn!("Token presented for unknown principal"),
            AuthError::InsufficientRole { actual } => {
                warn!("Authorization failed for role '{}'", actual)
            }
            AuthError::PasswordHash => error!("Password hashing error"),
            AuthError::TokenGeneration(msg) => error!("Token generation error: {}", msg),
            AuthError::Database(msg) => error!("Database error in auth: {}", msg),
            _ => {}
        }

        let body = Json(json!({
            "status": "error",
            "message": self.client_message(),
        }));

        (self.status_code(), body).into_response()
    }
}
