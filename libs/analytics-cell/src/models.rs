use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use patient_cell::models::GeoPoint;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub gender: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentStatsQuery {
    pub year: Option<String>,
    pub gender: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PrescriptionStatsQuery {
    pub status: Option<String>,
    pub gender: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CareplanStatsQuery {
    pub year: Option<String>,
    pub gender: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    pub gender: Option<String>,
    pub limit: Option<i64>,
}

/// Coordinates arrive as raw strings so that missing or non-numeric
/// input becomes a validation error before any store call.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lon: Option<String>,
    pub lat: Option<String>,
    pub max_distance: Option<String>,
}

/// Projection row for the proximity query.
#[derive(Debug, Serialize, Deserialize)]
pub struct NearbyPatient {
    #[serde(rename = "_id", serialize_with = "serialize_oid_as_hex")]
    pub id: ObjectId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

fn serialize_oid_as_hex<S>(oid: &ObjectId, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&oid.to_hex())
}
