// HTTP handlers for authentication endpoints

use crate::auth::{
    error::AuthError,
    models::{LoginRequest, LoginResponse, MeResponse, Principal, UserProjection},
};
use crate::response::ApiResponse;
use crate::AppState;
use axum::{extract::State, Json};
use tracing::info;

/// Login a principal
/// POST /api/auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let (username, password) = match (request.username, request.password) {
        (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
            (username, password)
        }
        _ => return Err(AuthError::MissingCredentials),
    };

    let response = state.auth.login(&username, &password).await?;
    Ok(Json(response))
}

/// Return the resolved principal
/// GET /api/auth/me
pub async fn me_handler(principal: Principal) -> Json<MeResponse> {
    Json(MeResponse {
        status: "success",
        user: UserProjection::from(&principal),
    })
}

/// Acknowledge logout
/// POST /api/auth/logout
///
/// Tokens are stateless, so there is nothing to invalidate server-side; the
/// event is logged and the client discards its token.
pub async fn logout_handler(principal: Principal) -> Json<ApiResponse<()>> {
    info!("User logged out: {}", principal.id());
    Json(ApiResponse::message("Logged out successfully"))
}
