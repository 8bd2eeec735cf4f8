use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::Collection;
use tracing::debug;

use shared_database::mongo::PATIENTS_COLLECTION;
use shared_database::AppState;
use shared_models::error::AppError;
use shared_utils::pagination::clamp_page_limit;

use crate::models::{
    CreatePatientRequest, ListPatientsQuery, Patient, PatientDetail, PatientPage,
    PatientSummary, UpdatePatientRequest, parse_object_id,
};

pub struct PatientService {
    patients: Collection<Patient>,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            patients: state.store.collection(PATIENTS_COLLECTION),
        }
    }

    pub async fn create(&self, request: CreatePatientRequest) -> Result<ObjectId, AppError> {
        let new = request.validate().map_err(AppError::Validation)?;
        debug!("Creating patient record for {}", new.name);

        let patient = Patient {
            id: None,
            name: new.name,
            age: new.age,
            gender: new.gender,
            condition: new.condition,
            image_url: new.image_url,
            town: None,
            location: None,
            appointments: Vec::new(),
            prescriptions: Vec::new(),
            careplans: Vec::new(),
        };

        let result = self
            .patients
            .insert_one(patient)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal("inserted id was not an ObjectId".to_string()))
    }

    pub async fn get(&self, id: &str) -> Result<PatientDetail, AppError> {
        let oid = parse_object_id(id)?;

        let patient = self
            .patients
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;

        Ok(patient.into())
    }

    pub async fn list(&self, query: ListPatientsQuery) -> Result<PatientPage, AppError> {
        let (page, limit) = clamp_page_limit(query.page, query.limit);

        let mut filter = Document::new();
        if let Some(condition) = query.condition.as_deref().filter(|c| !c.is_empty()) {
            filter.insert(
                "condition",
                doc! { "$regex": regex::escape(condition), "$options": "i" },
            );
        }

        let skip = ((page - 1) * limit) as u64;
        let cursor = self
            .patients
            .find(filter.clone())
            .skip(skip)
            .limit(limit)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let docs: Vec<Patient> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let total = self
            .patients
            .count_documents(filter)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let patients: Vec<PatientSummary> =
            docs.iter().map(PatientSummary::from_patient).collect();

        Ok(PatientPage {
            page,
            count: patients.len(),
            total,
            patients,
        })
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdatePatientRequest,
    ) -> Result<Vec<String>, AppError> {
        let oid = parse_object_id(id)?;
        let (set, updated) = request.to_update_document().map_err(AppError::Validation)?;

        let result = self
            .patients
            .update_one(doc! { "_id": oid }, doc! { "$set": set })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("Patient not found".to_string()));
        }

        debug!("Updated patient {} fields: {:?}", id, updated);
        Ok(updated)
    }

    /// Deleting the aggregate removes every embedded record with it;
    /// there is nothing else to clean up.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let oid = parse_object_id(id)?;

        let result = self
            .patients
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound("Patient not found".to_string()));
        }

        Ok(())
    }
}
