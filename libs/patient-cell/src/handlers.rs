use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::error::AppError;
use shared_utils::response;

use crate::models::{
    AppointmentPatch, AppointmentRequest, CarePlanPatch, CarePlanRequest,
    CreatePatientRequest, ListPatientsQuery, PrescriptionPatch, PrescriptionRequest,
    RecordKind, UpdatePatientRequest,
};
use crate::services::{PatientService, RecordService};

// ---------------------------------------------------------------------
// Patient aggregate
// ---------------------------------------------------------------------

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPatientsQuery>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);

    let page = service.list(query).await?;

    Ok(response::ok(json!(page)))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = PatientService::new(&state);

    let id = service.create(request).await?;

    Ok(response::created(
        "Patient added",
        json!({ "id": id.to_hex() }),
    ))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);

    let patient = service.get(&id).await?;

    Ok(response::ok(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);

    let updated = service.update(&id, request).await?;

    Ok(response::ok_with(
        "Patient updated successfully",
        json!({ "updated": updated }),
    ))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);

    service.delete(&id).await?;

    Ok(response::ok_message("Patient deleted"))
}

// ---------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------

#[axum::debug_handler]
pub async fn add_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<AppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = RecordService::new(&state);

    let item = request.into_document().map_err(AppError::Validation)?;
    let item_id = service.push(&id, RecordKind::Appointments, item).await?;

    Ok(response::created(
        "Appointment added",
        json!({ "id": item_id }),
    ))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path((id, appointment_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let service = RecordService::new(&state);

    let item = service
        .get(&id, RecordKind::Appointments, &appointment_id)
        .await?;

    Ok(response::ok(json!(item)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Path((id, appointment_id)): Path<(String, String)>,
    Json(request): Json<AppointmentPatch>,
) -> Result<Json<Value>, AppError> {
    let service = RecordService::new(&state);

    let set = request
        .to_set_document()
        .ok_or_else(|| AppError::Validation("No valid fields to update".to_string()))?;
    service
        .patch(&id, RecordKind::Appointments, &appointment_id, set)
        .await?;

    Ok(response::ok_message("Appointment updated"))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path((id, appointment_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let service = RecordService::new(&state);

    service
        .remove(&id, RecordKind::Appointments, &appointment_id)
        .await?;

    Ok(response::ok_message("Appointment deleted"))
}

// ---------------------------------------------------------------------
// Prescriptions
// ---------------------------------------------------------------------

#[axum::debug_handler]
pub async fn list_prescriptions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = RecordService::new(&state);

    let items = service.list(&id, RecordKind::Prescriptions).await?;

    Ok(response::ok(json!({ "prescriptions": items })))
}

#[axum::debug_handler]
pub async fn add_prescription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<PrescriptionRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = RecordService::new(&state);

    let item = request.into_document().map_err(AppError::Validation)?;
    let item_id = service.push(&id, RecordKind::Prescriptions, item).await?;

    Ok(response::created(
        "Prescription added",
        json!({ "id": item_id }),
    ))
}

#[axum::debug_handler]
pub async fn update_prescription(
    State(state): State<Arc<AppState>>,
    Path((id, prescription_id)): Path<(String, String)>,
    Json(request): Json<PrescriptionPatch>,
) -> Result<Json<Value>, AppError> {
    let service = RecordService::new(&state);

    let set = request
        .to_set_document()
        .ok_or_else(|| AppError::Validation("No valid fields to update".to_string()))?;
    service
        .patch(&id, RecordKind::Prescriptions, &prescription_id, set)
        .await?;

    Ok(response::ok_message("Prescription updated"))
}

#[axum::debug_handler]
pub async fn delete_prescription(
    State(state): State<Arc<AppState>>,
    Path((id, prescription_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let service = RecordService::new(&state);

    service
        .remove(&id, RecordKind::Prescriptions, &prescription_id)
        .await?;

    Ok(response::ok_message("Prescription deleted"))
}

// ---------------------------------------------------------------------
// Care plans
// ---------------------------------------------------------------------

#[axum::debug_handler]
pub async fn list_careplans(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = RecordService::new(&state);

    let items = service.list(&id, RecordKind::Careplans).await?;

    Ok(response::ok(json!({ "careplans": items })))
}

#[axum::debug_handler]
pub async fn add_careplan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<CarePlanRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = RecordService::new(&state);

    let item = request.into_document().map_err(AppError::Validation)?;
    let item_id = service.push(&id, RecordKind::Careplans, item).await?;

    Ok(response::created("Careplan added", json!({ "id": item_id })))
}

#[axum::debug_handler]
pub async fn update_careplan(
    State(state): State<Arc<AppState>>,
    Path((id, careplan_id)): Path<(String, String)>,
    Json(request): Json<CarePlanPatch>,
) -> Result<Json<Value>, AppError> {
    let service = RecordService::new(&state);

    let set = request
        .to_set_document()
        .ok_or_else(|| AppError::Validation("No valid fields to update".to_string()))?;
    service
        .patch(&id, RecordKind::Careplans, &careplan_id, set)
        .await?;

    Ok(response::ok_message("Careplan updated"))
}

#[axum::debug_handler]
pub async fn delete_careplan(
    State(state): State<Arc<AppState>>,
    Path((id, careplan_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let service = RecordService::new(&state);

    service.remove(&id, RecordKind::Careplans, &careplan_id).await?;

    Ok(response::ok_message("Careplan deleted"))
}
