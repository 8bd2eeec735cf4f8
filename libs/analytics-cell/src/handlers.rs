use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::error::AppError;
use shared_utils::pagination::clamp_skip_limit;
use shared_utils::response;

use crate::models::{
    AppointmentStatsQuery, CareplanStatsQuery, NearbyQuery, OverviewQuery,
    PrescriptionStatsQuery, SearchQuery,
};
use crate::services::geo::DEFAULT_MAX_DISTANCE_METERS;
use crate::services::stats::{StatsFilter, StatsTarget, DEFAULT_FACET_LIMIT};
use crate::services::{GeoService, SearchService, StatsService};

fn or_all(value: Option<&str>) -> String {
    value.unwrap_or("all").to_string()
}

#[axum::debug_handler]
pub async fn search_patients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let q = query
        .q
        .as_deref()
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("Missing search query".to_string()))?;
    let (skip, limit) = clamp_skip_limit(query.skip, query.limit);

    let service = SearchService::new(&state);
    let (results, total) = service
        .search(q, query.gender.as_deref(), skip, limit)
        .await?;

    Ok(response::ok(json!({
        "query": q,
        "filters": { "gender": or_all(query.gender.as_deref()) },
        "count": results.len(),
        "total": total,
        "skip": skip,
        "limit": limit,
        "results": results,
    })))
}

#[axum::debug_handler]
pub async fn appointment_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AppointmentStatsQuery>,
) -> Result<Json<Value>, AppError> {
    let (skip, limit) = clamp_skip_limit(query.skip, query.limit);
    let filter = StatsFilter {
        year: query.year.clone(),
        status: None,
        gender: query.gender.clone(),
    };

    let service = StatsService::new(&state);
    let results = service
        .grouped(StatsTarget::Appointments, &filter, skip, limit)
        .await?;

    Ok(response::ok(json!({
        "filters": {
            "year": or_all(query.year.as_deref()),
            "gender": or_all(query.gender.as_deref()),
        },
        "skip": skip,
        "limit": limit,
        "results": results,
    })))
}

#[axum::debug_handler]
pub async fn prescription_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PrescriptionStatsQuery>,
) -> Result<Json<Value>, AppError> {
    let (skip, limit) = clamp_skip_limit(query.skip, query.limit);
    let filter = StatsFilter {
        year: None,
        status: query.status.clone(),
        gender: query.gender.clone(),
    };

    let service = StatsService::new(&state);
    let results = service
        .grouped(StatsTarget::Prescriptions, &filter, skip, limit)
        .await?;

    Ok(response::ok(json!({
        "filters": {
            "status": or_all(query.status.as_deref()),
            "gender": or_all(query.gender.as_deref()),
        },
        "skip": skip,
        "limit": limit,
        "results": results,
    })))
}

#[axum::debug_handler]
pub async fn careplan_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CareplanStatsQuery>,
) -> Result<Json<Value>, AppError> {
    let (skip, limit) = clamp_skip_limit(query.skip, query.limit);
    let filter = StatsFilter {
        year: query.year.clone(),
        status: None,
        gender: query.gender.clone(),
    };

    let service = StatsService::new(&state);
    let results = service
        .grouped(StatsTarget::Careplans, &filter, skip, limit)
        .await?;

    Ok(response::ok(json!({
        "filters": {
            "year": or_all(query.year.as_deref()),
            "gender": or_all(query.gender.as_deref()),
        },
        "skip": skip,
        "limit": limit,
        "results": results,
    })))
}

#[axum::debug_handler]
pub async fn overview_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<Value>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_FACET_LIMIT)
        .clamp(1, shared_utils::pagination::MAX_PAGE_SIZE);

    let service = StatsService::new(&state);
    let results = service.overview(query.gender.as_deref(), limit).await?;

    Ok(response::ok(json!({
        "filters": { "gender": or_all(query.gender.as_deref()) },
        "limit": limit,
        "results": results,
    })))
}

#[axum::debug_handler]
pub async fn nearby_patients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Value>, AppError> {
    let invalid = || AppError::Validation("Invalid or missing coordinates".to_string());

    let lon: f64 = query
        .lon
        .as_deref()
        .ok_or_else(invalid)?
        .parse()
        .map_err(|_| invalid())?;
    let lat: f64 = query
        .lat
        .as_deref()
        .ok_or_else(invalid)?
        .parse()
        .map_err(|_| invalid())?;
    let max_distance: i64 = match query.max_distance.as_deref() {
        None => DEFAULT_MAX_DISTANCE_METERS,
        Some(raw) => raw.parse().map_err(|_| invalid())?,
    };

    let service = GeoService::new(&state);
    let results = service.nearby(lon, lat, max_distance).await?;

    Ok(response::ok(json!({
        "query": { "lon": lon, "lat": lat, "max_distance": max_distance },
        "count": results.len(),
        "nearby_patients": results,
    })))
}
