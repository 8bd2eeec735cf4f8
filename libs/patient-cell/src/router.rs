use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::{auth_middleware, require_admin};
use shared_utils::rate_limit::{rate_limit_middleware, RateLimiter};

use crate::handlers;

pub fn patient_routes(state: Arc<AppState>, limiter: Arc<RateLimiter>) -> Router {
    // The list endpoint carries the per-client budget; everything else
    // is unmetered.
    let listing = Router::new()
        .route("/", get(handlers::list_patients))
        .layer(middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ));

    let general = Router::new()
        .route("/", post(handlers::create_patient))
        .route(
            "/{id}",
            get(handlers::get_patient).put(handlers::update_patient),
        )
        .route("/{id}/appointments", post(handlers::add_appointment))
        .route(
            "/{id}/appointments/{appointment_id}",
            get(handlers::get_appointment),
        )
        .route(
            "/{id}/prescriptions",
            get(handlers::list_prescriptions).post(handlers::add_prescription),
        )
        .route(
            "/{id}/careplans",
            get(handlers::list_careplans).post(handlers::add_careplan),
        );

    let admin_routes = Router::new()
        .route("/{id}", delete(handlers::delete_patient))
        .route(
            "/{id}/appointments/{appointment_id}",
            put(handlers::update_appointment).delete(handlers::delete_appointment),
        )
        .route(
            "/{id}/prescriptions/{prescription_id}",
            put(handlers::update_prescription).delete(handlers::delete_prescription),
        )
        .route(
            "/{id}/careplans/{careplan_id}",
            put(handlers::update_careplan).delete(handlers::delete_careplan),
        )
        .layer(middleware::from_fn(require_admin));

    Router::new()
        .merge(listing)
        .merge(general)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
