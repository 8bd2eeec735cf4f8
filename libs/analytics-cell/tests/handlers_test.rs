use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Query, State};

use analytics_cell::handlers::{nearby_patients, search_patients};
use analytics_cell::models::{NearbyQuery, SearchQuery};
use shared_database::{AppState, MemoryTokenLedger, MongoStore};
use shared_models::error::AppError;
use shared_utils::test_utils::TestConfig;

// The driver connects lazily, so building state against an unreachable
// database is fine as long as the handler bails out before querying.
async fn test_state() -> Arc<AppState> {
    let config = TestConfig::default().to_app_config();
    let store = MongoStore::connect(&config).await.expect("lazy client");
    Arc::new(AppState {
        config,
        store,
        ledger: Arc::new(MemoryTokenLedger::new()),
    })
}

#[tokio::test]
async fn nearby_rejects_missing_coordinates_before_querying() {
    let state = test_state().await;

    let query = NearbyQuery {
        lon: None,
        lat: None,
        max_distance: None,
    };
    let result = nearby_patients(State(state), Query(query)).await;

    assert_matches!(result.unwrap_err(), AppError::Validation(msg) => {
        assert_eq!(msg, "Invalid or missing coordinates");
    });
}

#[tokio::test]
async fn nearby_rejects_non_numeric_longitude_before_querying() {
    let state = test_state().await;

    let query = NearbyQuery {
        lon: Some("not-a-number".to_string()),
        lat: Some("54.59".to_string()),
        max_distance: None,
    };
    let result = nearby_patients(State(state), Query(query)).await;

    assert_matches!(result.unwrap_err(), AppError::Validation(_));
}

#[tokio::test]
async fn nearby_rejects_garbage_max_distance() {
    let state = test_state().await;

    let query = NearbyQuery {
        lon: Some("-6.26".to_string()),
        lat: Some("54.59".to_string()),
        max_distance: Some("close".to_string()),
    };
    let result = nearby_patients(State(state), Query(query)).await;

    assert_matches!(result.unwrap_err(), AppError::Validation(_));
}

#[tokio::test]
async fn search_requires_a_query_string() {
    let state = test_state().await;

    for q in [None, Some(String::new())] {
        let query = SearchQuery {
            q,
            gender: None,
            skip: None,
            limit: None,
        };
        let result = search_patients(State(state.clone()), Query(query)).await;

        assert_matches!(result.unwrap_err(), AppError::Validation(msg) => {
            assert_eq!(msg, "Missing search query");
        });
    }
}
