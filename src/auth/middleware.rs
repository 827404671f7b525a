// Auth resolver: bearer extraction, principal resolution and role gating

use crate::auth::{
    error::AuthError,
    models::{Principal, Role},
    repository::{AuthRepository, IdentityStore},
};
use crate::AppState;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)
}

/// Full resolver state machine: extract -> verify -> resolve.
///
/// The claims id is checked against admin_users first, then students; role
/// truth comes from the matched row, not the token. No writes happen here.
pub async fn resolve_principal(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Principal, AuthError> {
    let token = bearer_token(headers)?;
    let claims = state.tokens.verify(token)?;

    let principal = AuthRepository::new(state.db.clone())
        .resolve_principal(claims.sub)
        .await?
        .ok_or(AuthError::PrincipalNotFound)?;

    Ok(principal)
}

/// Second, stateless authorization stage: compare the resolved principal's
/// role against an allowed set.
pub fn authorize(principal: &Principal, allowed: &[Role]) -> Result<(), AuthError> {
    if allowed.contains(&principal.role()) {
        Ok(())
    } else {
        warn!(
            "Authorization failed: principal={}, role={}",
            principal.id(),
            principal.role()
        );
        Err(AuthError::InsufficientRole {
            actual: principal.role(),
        })
    }
}

/// Extractor for protected routes. Reuses a principal already attached by
/// the role middleware; otherwise resolves from the Authorization header.
#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(principal.clone());
        }

        resolve_principal(state, &parts.headers).await
    }
}

/// Route layer for admin-only routes: resolves the principal, enforces the
/// admin role and attaches the principal to request extensions.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();

    let principal = resolve_principal(&state, request.headers()).await?;
    authorize(&principal, &[Role::Admin])?;

    debug!(
        "Authorization successful: principal={}, role={}, endpoint={}",
        principal.id(),
        principal.role(),
        endpoint
    );
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
