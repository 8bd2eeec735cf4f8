use std::sync::Arc;

use axum::{routing::get, Router};

use analytics_cell::router::analytics_routes;
use auth_cell::router::auth_routes;
use patient_cell::router::patient_routes;
use shared_database::AppState;
use shared_utils::rate_limit::RateLimiter;

pub fn create_router(state: Arc<AppState>) -> Router {
    let limiter = Arc::new(RateLimiter::per_minute(
        state.config.list_rate_limit_per_minute,
    ));

    Router::new()
        .route("/", get(|| async { "GP Portal API is running!" }))
        .nest("/api/v1.0/auth", auth_routes(state.clone()))
        .nest("/api/v1.0/patients", patient_routes(state.clone(), limiter))
        .nest("/api/v1.0", analytics_routes(state))
}
