use mongodb::bson::{doc, Document};
use mongodb::Collection;
use tracing::debug;

use shared_database::mongo::PATIENTS_COLLECTION;
use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{parse_object_id, RecordKind};

/// Embedded-record mutation primitives, generic over the target
/// collection. Every operation touches exactly one patient document,
/// so each is atomic on its own.
pub struct RecordService {
    patients: Collection<Document>,
}

impl RecordService {
    pub fn new(state: &AppState) -> Self {
        Self {
            patients: state.store.collection(PATIENTS_COLLECTION),
        }
    }

    /// Append one item, assigning it a fresh id. The id is never
    /// reused, even after the item is removed.
    pub async fn push(
        &self,
        patient_id: &str,
        kind: RecordKind,
        mut item: Document,
    ) -> Result<String, AppError> {
        let pid = parse_object_id(patient_id)?;
        let item_id = mongodb::bson::oid::ObjectId::new();
        item.insert("_id", item_id);

        let result = self
            .patients
            .update_one(
                doc! { "_id": pid },
                doc! { "$push": { kind.field(): item } },
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("Patient not found".to_string()));
        }

        debug!("Added {} {} to patient {}", kind.label(), item_id, patient_id);
        Ok(item_id.to_hex())
    }

    pub async fn get(
        &self,
        patient_id: &str,
        kind: RecordKind,
        item_id: &str,
    ) -> Result<Document, AppError> {
        let pid = parse_object_id(patient_id)?;
        let iid = parse_object_id(item_id)?;

        let found = self
            .patients
            .find_one(doc! { "_id": pid, format!("{}._id", kind.field()): iid })
            .projection(doc! { format!("{}.$", kind.field()): 1, "_id": 0 })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", kind.label())))?;

        let item = found
            .get_array(kind.field())
            .ok()
            .and_then(|items| items.first())
            .and_then(|item| item.as_document())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("{} not found", kind.label())))?;

        Ok(stringify_item_id(item))
    }

    pub async fn list(
        &self,
        patient_id: &str,
        kind: RecordKind,
    ) -> Result<Vec<Document>, AppError> {
        let pid = parse_object_id(patient_id)?;

        let found = self
            .patients
            .find_one(doc! { "_id": pid })
            .projection(doc! { kind.field(): 1, "_id": 0 })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;

        let items = found
            .get_array(kind.field())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_document())
                    .cloned()
                    .map(stringify_item_id)
                    .collect()
            })
            .unwrap_or_default();

        Ok(items)
    }

    /// Patch recognized fields of one item in place via the positional
    /// operator; siblings are untouched.
    pub async fn patch(
        &self,
        patient_id: &str,
        kind: RecordKind,
        item_id: &str,
        set: Document,
    ) -> Result<(), AppError> {
        let pid = parse_object_id(patient_id)?;
        let iid = parse_object_id(item_id)?;

        let result = self
            .patients
            .update_one(
                doc! { "_id": pid, format!("{}._id", kind.field()): iid },
                doc! { "$set": set },
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("{} not found", kind.label())));
        }

        Ok(())
    }

    pub async fn remove(
        &self,
        patient_id: &str,
        kind: RecordKind,
        item_id: &str,
    ) -> Result<(), AppError> {
        let pid = parse_object_id(patient_id)?;
        let iid = parse_object_id(item_id)?;

        let result = self
            .patients
            .update_one(
                doc! { "_id": pid },
                doc! { "$pull": { kind.field(): { "_id": iid } } },
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // modified == 0 covers both a missing parent and a missing item.
        if result.modified_count == 0 {
            return Err(AppError::NotFound(format!("{} not found", kind.label())));
        }

        debug!("Removed {} {} from patient {}", kind.label(), item_id, patient_id);
        Ok(())
    }
}

fn stringify_item_id(mut item: Document) -> Document {
    if let Ok(oid) = item.get_object_id("_id") {
        item.insert("_id", oid.to_hex());
    }
    item
}
