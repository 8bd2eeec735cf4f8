use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Collection;

use shared_database::mongo::PATIENTS_COLLECTION;
use shared_database::AppState;
use shared_models::error::AppError;

pub const DEFAULT_FACET_LIMIT: i64 = 5;

/// Which embedded collection a grouped count runs over, together with
/// the key it groups by and the name that key gets in the output rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsTarget {
    Appointments,
    Prescriptions,
    Careplans,
}

impl StatsTarget {
    fn unwind_path(&self) -> &'static str {
        match self {
            StatsTarget::Appointments => "$appointments",
            StatsTarget::Prescriptions => "$prescriptions",
            StatsTarget::Careplans => "$careplans",
        }
    }

    fn group_key(&self) -> &'static str {
        match self {
            StatsTarget::Appointments => "$appointments.doctor",
            StatsTarget::Prescriptions => "$prescriptions.name",
            StatsTarget::Careplans => "$careplans.description",
        }
    }

    pub fn output_key(&self) -> &'static str {
        match self {
            StatsTarget::Appointments => "doctor",
            StatsTarget::Prescriptions => "medication",
            StatsTarget::Careplans => "careplan",
        }
    }
}

/// Optional row filters applied after the unwind: a year substring on
/// the date-ish sub-field, an exact prescription status, and a
/// case-insensitive gender match on the parent patient.
#[derive(Debug, Default, Clone)]
pub struct StatsFilter {
    pub year: Option<String>,
    pub status: Option<String>,
    pub gender: Option<String>,
}

fn match_stage(target: StatsTarget, filter: &StatsFilter) -> Option<Document> {
    let mut stage = Document::new();

    if let Some(year) = filter.year.as_deref() {
        let field = match target {
            StatsTarget::Appointments => Some("appointments.date"),
            StatsTarget::Careplans => Some("careplans.start"),
            StatsTarget::Prescriptions => None,
        };
        if let Some(field) = field {
            stage.insert(field, doc! { "$regex": regex::escape(year) });
        }
    }

    if target == StatsTarget::Prescriptions {
        if let Some(status) = filter.status.as_deref() {
            stage.insert("prescriptions.status", status);
        }
    }

    if let Some(gender) = filter.gender.as_deref() {
        stage.insert(
            "gender",
            doc! { "$regex": regex::escape(gender), "$options": "i" },
        );
    }

    if stage.is_empty() {
        None
    } else {
        Some(stage)
    }
}

/// Unwind → match → group → sort desc → paginate → rename. One row per
/// embedded item, grouped on the target key.
pub fn stats_pipeline(
    target: StatsTarget,
    filter: &StatsFilter,
    skip: u64,
    limit: i64,
) -> Vec<Document> {
    let mut pipeline = vec![doc! { "$unwind": target.unwind_path() }];

    if let Some(stage) = match_stage(target, filter) {
        pipeline.push(doc! { "$match": stage });
    }

    pipeline.push(doc! { "$group": { "_id": target.group_key(), "count": { "$sum": 1 } } });
    pipeline.push(doc! { "$sort": { "count": -1 } });
    pipeline.push(doc! { "$skip": skip as i64 });
    pipeline.push(doc! { "$limit": limit });
    pipeline.push(doc! { "$project": { target.output_key(): "$_id", "count": 1, "_id": 0 } });

    pipeline
}

fn facet_branch(target: StatsTarget, extra_match: Option<Document>, limit: i64) -> Vec<Document> {
    let mut branch = vec![doc! { "$unwind": target.unwind_path() }];
    if let Some(stage) = extra_match {
        branch.push(doc! { "$match": stage });
    }
    branch.push(doc! { "$group": { "_id": target.group_key(), "count": { "$sum": 1 } } });
    branch.push(doc! { "$sort": { "count": -1 } });
    branch.push(doc! { "$limit": limit });
    branch.push(doc! { "$project": { target.output_key(): "$_id", "count": 1, "_id": 0 } });
    branch
}

/// Three independent facet branches over the same (optionally
/// gender-filtered) patient set, computed in a single pass.
pub fn overview_pipeline(gender: Option<&str>, limit: i64) -> Vec<Document> {
    let mut pipeline = Vec::new();

    if let Some(gender) = gender {
        pipeline.push(doc! {
            "$match": { "gender": { "$regex": regex::escape(gender), "$options": "i" } }
        });
    }

    // A care plan counts as active while its stop field is absent or
    // still holds the dataset's "Unknown" placeholder.
    let active_filter = doc! {
        "$or": [
            { "careplans.stop": "Unknown" },
            { "careplans.stop": { "$exists": false } },
        ]
    };

    pipeline.push(doc! {
        "$facet": {
            "top_doctors": facet_branch(StatsTarget::Appointments, None, limit),
            "top_medications": facet_branch(StatsTarget::Prescriptions, None, limit),
            "active_careplans": facet_branch(StatsTarget::Careplans, Some(active_filter), limit),
        }
    });

    pipeline
}

pub struct StatsService {
    patients: Collection<Document>,
}

impl StatsService {
    pub fn new(state: &AppState) -> Self {
        Self {
            patients: state.store.collection(PATIENTS_COLLECTION),
        }
    }

    pub async fn grouped(
        &self,
        target: StatsTarget,
        filter: &StatsFilter,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Document>, AppError> {
        let pipeline = stats_pipeline(target, filter, skip, limit);

        let cursor = self
            .patients
            .aggregate(pipeline)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn overview(
        &self,
        gender: Option<&str>,
        limit: i64,
    ) -> Result<Document, AppError> {
        let pipeline = overview_pipeline(gender, limit);

        let cursor = self
            .patients
            .aggregate(pipeline)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut rows: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // $facet always yields exactly one document.
        Ok(rows.pop().unwrap_or_default())
    }
}
