use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Collection;
use tracing::debug;

use shared_database::mongo::PATIENTS_COLLECTION;
use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::NearbyPatient;

pub const DEFAULT_MAX_DISTANCE_METERS: i64 = 5000;
pub const NEARBY_RESULT_CAP: i64 = 10;

/// `$near` over the 2dsphere-indexed location field; results come back
/// nearest-first.
pub fn nearby_filter(lon: f64, lat: f64, max_distance: i64) -> Document {
    doc! {
        "location": {
            "$near": {
                "$geometry": { "type": "Point", "coordinates": [lon, lat] },
                "$maxDistance": max_distance,
            }
        }
    }
}

pub struct GeoService {
    patients: Collection<NearbyPatient>,
}

impl GeoService {
    pub fn new(state: &AppState) -> Self {
        Self {
            patients: state.store.collection(PATIENTS_COLLECTION),
        }
    }

    pub async fn nearby(
        &self,
        lon: f64,
        lat: f64,
        max_distance: i64,
    ) -> Result<Vec<NearbyPatient>, AppError> {
        debug!(
            "Proximity query at ({}, {}) within {}m",
            lon, lat, max_distance
        );

        let cursor = self
            .patients
            .find(nearby_filter(lon, lat, max_distance))
            .projection(doc! { "name": 1, "town": 1, "location": 1 })
            .limit(NEARBY_RESULT_CAP)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
