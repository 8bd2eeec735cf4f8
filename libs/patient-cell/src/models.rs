use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use shared_models::error::AppError;

pub const AGE_MIN: i64 = 0;
pub const AGE_MAX: i64 = 120;

/// GeoJSON point, stored as `[longitude, latitude]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

/// Patient aggregate as persisted. Embedded records live inside the
/// document and have no existence outside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub prescriptions: Vec<Prescription>,
    #[serde(default)]
    pub careplans: Vec<CarePlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub doctor: String,
    pub date: String,
    pub notes: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
    #[serde(default = "default_prescription_status")]
    pub status: String,
}

pub fn default_prescription_status() -> String {
    "active".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarePlan {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub description: String,
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
}

/// The three embedded collections a patient aggregate carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Appointments,
    Prescriptions,
    Careplans,
}

impl RecordKind {
    pub fn field(&self) -> &'static str {
        match self {
            RecordKind::Appointments => "appointments",
            RecordKind::Prescriptions => "prescriptions",
            RecordKind::Careplans => "careplans",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Appointments => "Appointment",
            RecordKind::Prescriptions => "Prescription",
            RecordKind::Careplans => "Careplan",
        }
    }
}

pub fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::Validation("Invalid ID".to_string()))
}

// ---------------------------------------------------------------------
// Response views (hex-string ids instead of raw ObjectIds)
// ---------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct AppointmentView {
    pub id: String,
    pub doctor: String,
    pub date: String,
    pub notes: String,
    pub status: String,
}

impl From<Appointment> for AppointmentView {
    fn from(item: Appointment) -> Self {
        Self {
            id: item.id.to_hex(),
            doctor: item.doctor,
            date: item.date,
            notes: item.notes,
            status: item.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PrescriptionView {
    pub id: String,
    pub name: String,
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
    pub status: String,
}

impl From<Prescription> for PrescriptionView {
    fn from(item: Prescription) -> Self {
        Self {
            id: item.id.to_hex(),
            name: item.name,
            start: item.start,
            stop: item.stop,
            status: item.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CarePlanView {
    pub id: String,
    pub description: String,
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
}

impl From<CarePlan> for CarePlanView {
    fn from(item: CarePlan) -> Self {
        Self {
            id: item.id.to_hex(),
            description: item.description,
            start: item.start,
            stop: item.stop,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PatientDetail {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub appointments: Vec<AppointmentView>,
    pub prescriptions: Vec<PrescriptionView>,
    pub careplans: Vec<CarePlanView>,
}

impl From<Patient> for PatientDetail {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            name: patient.name,
            age: patient.age,
            gender: patient.gender,
            condition: patient.condition,
            image_url: patient.image_url,
            town: patient.town,
            location: patient.location,
            appointments: patient.appointments.into_iter().map(Into::into).collect(),
            prescriptions: patient.prescriptions.into_iter().map(Into::into).collect(),
            careplans: patient.careplans.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub condition: String,
    pub appointment_count: usize,
    pub prescription_count: usize,
    pub careplan_count: usize,
}

impl PatientSummary {
    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            id: patient
                .id
                .map(|oid| oid.to_hex())
                .unwrap_or_default(),
            name: tidy_seeded_name(&patient.name),
            age: patient.age,
            gender: patient.gender.clone(),
            condition: patient.condition.clone(),
            appointment_count: patient.appointments.len(),
            prescription_count: patient.prescriptions.len(),
            careplan_count: patient.careplans.len(),
        }
    }
}

/// Seeded records carry numeric suffixes in names ("Agustina437"); the
/// list view strips digit runs and title-cases what remains.
pub fn tidy_seeded_name(name: &str) -> String {
    let stripped: String = name.chars().filter(|c| !c.is_ascii_digit()).collect();
    stripped
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------

fn validate_age(age: i64) -> Result<i32, String> {
    if (AGE_MIN..=AGE_MAX).contains(&age) {
        Ok(age as i32)
    } else {
        Err("Age must be between 0 and 120".to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePatientRequest {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub condition: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug)]
pub struct NewPatient {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub condition: String,
    pub image_url: Option<String>,
}

impl CreatePatientRequest {
    pub fn validate(self) -> Result<NewPatient, String> {
        let (name, age, gender, condition) =
            match (self.name, self.age, self.gender, self.condition) {
                (Some(name), Some(age), Some(gender), Some(condition)) => {
                    (name, age, gender, condition)
                }
                _ => return Err("Missing required fields".to_string()),
            };

        Ok(NewPatient {
            name,
            age: validate_age(age)?,
            gender,
            condition,
            image_url: self.image_url,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub condition: Option<String>,
    pub image_url: Option<String>,
}

impl UpdatePatientRequest {
    /// Partial patch: each present field is validated on its own and
    /// folded into a `$set` document. Unknown body fields never reach
    /// this struct in the first place.
    pub fn to_update_document(&self) -> Result<(Document, Vec<String>), String> {
        let mut set = Document::new();
        let mut updated = Vec::new();

        if let Some(name) = &self.name {
            set.insert("name", name.clone());
            updated.push("name".to_string());
        }
        if let Some(age) = self.age {
            set.insert("age", validate_age(age)?);
            updated.push("age".to_string());
        }
        if let Some(gender) = &self.gender {
            set.insert("gender", gender.clone());
            updated.push("gender".to_string());
        }
        if let Some(condition) = &self.condition {
            set.insert("condition", condition.clone());
            updated.push("condition".to_string());
        }
        if let Some(image_url) = &self.image_url {
            set.insert("image_url", image_url.clone());
            updated.push("image_url".to_string());
        }

        if set.is_empty() {
            return Err("No valid fields to update".to_string());
        }

        Ok((set, updated))
    }
}

#[derive(Debug, Deserialize)]
pub struct ListPatientsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub condition: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PatientPage {
    pub page: i64,
    pub count: usize,
    pub total: u64,
    pub patients: Vec<PatientSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentRequest {
    pub doctor: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl AppointmentRequest {
    pub fn into_document(self) -> Result<Document, String> {
        match (self.doctor, self.date, self.notes, self.status) {
            (Some(doctor), Some(date), Some(notes), Some(status)) => Ok(doc! {
                "doctor": doctor,
                "date": date,
                "notes": notes,
                "status": status,
            }),
            _ => Err("Missing appointment data".to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrescriptionRequest {
    pub name: Option<String>,
    pub start: Option<String>,
    pub stop: Option<String>,
    pub status: Option<String>,
}

impl PrescriptionRequest {
    pub fn into_document(self) -> Result<Document, String> {
        let (name, start) = match (self.name, self.start) {
            (Some(name), Some(start)) => (name, start),
            _ => return Err("Missing fields".to_string()),
        };

        let mut item = doc! {
            "name": name,
            "start": start,
            "status": self.status.unwrap_or_else(default_prescription_status),
        };
        if let Some(stop) = self.stop {
            item.insert("stop", stop);
        }
        Ok(item)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarePlanRequest {
    pub description: Option<String>,
    pub start: Option<String>,
    pub stop: Option<String>,
}

impl CarePlanRequest {
    pub fn into_document(self) -> Result<Document, String> {
        let (description, start) = match (self.description, self.start) {
            (Some(description), Some(start)) => (description, start),
            _ => return Err("Missing fields".to_string()),
        };

        let mut item = doc! {
            "description": description,
            "start": start,
        };
        if let Some(stop) = self.stop {
            item.insert("stop", stop);
        }
        Ok(item)
    }
}

/// Builds the positional `$set` document for an embedded patch from the
/// recognized field subset; `None` when nothing recognized is present.
fn positional_set(kind: RecordKind, fields: &[(&str, &Option<String>)]) -> Option<Document> {
    let mut set = Document::new();
    for (key, value) in fields {
        if let Some(value) = value {
            set.insert(format!("{}.$.{}", kind.field(), key), value.clone());
        }
    }
    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentPatch {
    pub doctor: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl AppointmentPatch {
    pub fn to_set_document(&self) -> Option<Document> {
        positional_set(
            RecordKind::Appointments,
            &[
                ("doctor", &self.doctor),
                ("date", &self.date),
                ("notes", &self.notes),
                ("status", &self.status),
            ],
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrescriptionPatch {
    pub name: Option<String>,
    pub start: Option<String>,
    pub stop: Option<String>,
    pub status: Option<String>,
}

impl PrescriptionPatch {
    pub fn to_set_document(&self) -> Option<Document> {
        positional_set(
            RecordKind::Prescriptions,
            &[
                ("name", &self.name),
                ("start", &self.start),
                ("stop", &self.stop),
                ("status", &self.status),
            ],
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarePlanPatch {
    pub description: Option<String>,
    pub start: Option<String>,
    pub stop: Option<String>,
}

impl CarePlanPatch {
    pub fn to_set_document(&self) -> Option<Document> {
        positional_set(
            RecordKind::Careplans,
            &[
                ("description", &self.description),
                ("start", &self.start),
                ("stop", &self.stop),
            ],
        )
    }
}
