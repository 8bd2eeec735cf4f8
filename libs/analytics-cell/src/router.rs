use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn analytics_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/search", get(handlers::search_patients))
        .route("/stats/appointments", get(handlers::appointment_stats))
        .route("/stats/prescriptions", get(handlers::prescription_stats))
        .route("/stats/careplans", get(handlers::careplan_stats))
        .route("/stats/overview", get(handlers::overview_stats))
        .route("/geo/nearby", get(handlers::nearby_patients))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
