use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_database::{AppState, TokenLedger};
use shared_models::auth::{AuthContext, BearerToken};
use shared_models::error::{AppError, AuthError};

use crate::jwt::validate_token;

fn bearer_token(request: &Request<Body>) -> Option<String> {
    let value = request.headers().get("Authorization")?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(|t| t.to_string())
}

/// Full token check, in a fixed order: presence, revocation ledger
/// (before any cryptographic inspection), then signature and expiry.
pub async fn authenticate(
    token: Option<&str>,
    ledger: &dyn TokenLedger,
    secret: &str,
) -> Result<AuthContext, AppError> {
    let token = token.ok_or(AuthError::TokenMissing)?;

    let revoked = ledger
        .is_revoked(token)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    if revoked {
        return Err(AuthError::TokenBlacklisted.into());
    }

    validate_token(token, secret).map_err(AppError::Auth)
}

/// Middleware for authentication; stores the verified context and the
/// raw token in request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request);

    let context = authenticate(
        token.as_deref(),
        state.ledger.as_ref(),
        &state.config.jwt_secret,
    )
    .await?;

    if let Some(token) = token {
        request.extensions_mut().insert(BearerToken(token));
    }
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// Layered after `auth_middleware` on privileged routes. The context is
/// already fully authenticated here, so a non-admin subject is a 403,
/// never a 401.
pub async fn require_admin(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let context = request
        .extensions()
        .get::<AuthContext>()
        .ok_or_else(|| AppError::Internal("auth context missing from request".to_string()))?;

    if !context.admin {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}
