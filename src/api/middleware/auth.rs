//! Bearer token authentication and route-level authorization gates.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::Principal;
use crate::errors::AppError;
use crate::services::authorization;

/// Verify the bearer token and insert the [`Principal`] into request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let principal = state.services.tokens().verify(token)?;
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Only platform admins pass.
pub async fn require_platform_admin(request: Request, next: Next) -> Result<Response, AppError> {
    authorization::require_platform_admin(principal_of(&request)?)?;
    Ok(next.run(request).await)
}

/// Superadmins and platform admins pass; tenant checks happen in handlers.
pub async fn require_super_admin_or_higher(
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorization::require_super_admin_or_higher(principal_of(&request)?)?;
    Ok(next.run(request).await)
}

fn principal_of(request: &Request) -> Result<&Principal, AppError> {
    request
        .extensions()
        .get::<Principal>()
        .ok_or(AppError::Unauthorized)
}
