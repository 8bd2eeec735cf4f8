use std::sync::Arc;

use axum::extract::{Extension, Json, State};
use serde_json::{json, Value};
use tracing::debug;

use shared_database::AppState;
use shared_models::auth::BearerToken;
use shared_models::error::AppError;
use shared_utils::response;

use crate::models::LoginRequest;
use crate::services::AuthService;

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AuthService::new(&state);

    let token = service.login(request).await?;

    Ok(response::ok_with("Login successful", json!({ "token": token })))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<BearerToken>,
) -> Result<Json<Value>, AppError> {
    let service = AuthService::new(&state);

    service.logout(&token.0).await?;
    debug!("Token revoked on logout");

    Ok(response::ok_message("Logged out successfully"))
}

/// The auth middleware has already fully validated the token by the
/// time this runs; there is nothing left to check.
#[axum::debug_handler]
pub async fn verify() -> Json<Value> {
    response::ok_message("Token is valid")
}
