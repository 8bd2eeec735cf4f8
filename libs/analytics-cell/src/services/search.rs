use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Collection;
use tracing::debug;

use patient_cell::models::{Patient, PatientDetail};
use shared_database::mongo::PATIENTS_COLLECTION;
use shared_database::AppState;
use shared_models::error::AppError;

/// Case-insensitive "contains" filter over name OR condition, with an
/// optional gender narrowing. User input is regex-escaped so the match
/// is always a literal substring.
pub fn search_filter(q: &str, gender: Option<&str>) -> Document {
    let pattern = regex::escape(q);
    let mut filter = doc! {
        "$or": [
            { "name": { "$regex": pattern.clone(), "$options": "i" } },
            { "condition": { "$regex": pattern, "$options": "i" } },
        ]
    };
    if let Some(gender) = gender {
        filter.insert(
            "gender",
            doc! { "$regex": regex::escape(gender), "$options": "i" },
        );
    }
    filter
}

pub struct SearchService {
    patients: Collection<Patient>,
}

impl SearchService {
    pub fn new(state: &AppState) -> Self {
        Self {
            patients: state.store.collection(PATIENTS_COLLECTION),
        }
    }

    /// Returns one page of matches plus the total match count across
    /// all pages.
    pub async fn search(
        &self,
        q: &str,
        gender: Option<&str>,
        skip: u64,
        limit: i64,
    ) -> Result<(Vec<PatientDetail>, u64), AppError> {
        debug!("Searching patients for {:?} (gender: {:?})", q, gender);
        let filter = search_filter(q, gender);

        let cursor = self
            .patients
            .find(filter.clone())
            .skip(skip)
            .limit(limit)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let matches: Vec<Patient> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let total = self
            .patients
            .count_documents(filter)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((matches.into_iter().map(Into::into).collect(), total))
    }
}
