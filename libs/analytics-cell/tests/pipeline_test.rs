use mongodb::bson::doc;

use analytics_cell::services::geo::nearby_filter;
use analytics_cell::services::search::search_filter;
use analytics_cell::services::stats::{
    overview_pipeline, stats_pipeline, StatsFilter, StatsTarget,
};

#[test]
fn unfiltered_appointment_pipeline_has_no_match_stage() {
    let pipeline = stats_pipeline(StatsTarget::Appointments, &StatsFilter::default(), 0, 10);

    assert_eq!(pipeline.len(), 6);
    assert_eq!(pipeline[0], doc! { "$unwind": "$appointments" });
    assert_eq!(
        pipeline[1],
        doc! { "$group": { "_id": "$appointments.doctor", "count": { "$sum": 1 } } }
    );
    assert_eq!(pipeline[2], doc! { "$sort": { "count": -1 } });
    assert_eq!(pipeline[3], doc! { "$skip": 0_i64 });
    assert_eq!(pipeline[4], doc! { "$limit": 10_i64 });
    assert_eq!(
        pipeline[5],
        doc! { "$project": { "doctor": "$_id", "count": 1, "_id": 0 } }
    );
}

#[test]
fn year_and_gender_filters_compose_into_one_match() {
    let filter = StatsFilter {
        year: Some("2024".to_string()),
        status: None,
        gender: Some("Female".to_string()),
    };
    let pipeline = stats_pipeline(StatsTarget::Appointments, &filter, 0, 10);

    assert_eq!(pipeline.len(), 7);
    assert_eq!(
        pipeline[1],
        doc! { "$match": {
            "appointments.date": { "$regex": "2024" },
            "gender": { "$regex": "Female", "$options": "i" },
        } }
    );
}

#[test]
fn prescription_status_is_an_exact_match() {
    let filter = StatsFilter {
        year: None,
        status: Some("active".to_string()),
        gender: None,
    };
    let pipeline = stats_pipeline(StatsTarget::Prescriptions, &filter, 0, 10);

    assert_eq!(pipeline[0], doc! { "$unwind": "$prescriptions" });
    assert_eq!(
        pipeline[1],
        doc! { "$match": { "prescriptions.status": "active" } }
    );
    assert_eq!(
        pipeline.last().unwrap(),
        &doc! { "$project": { "medication": "$_id", "count": 1, "_id": 0 } }
    );
}

#[test]
fn year_filter_does_not_apply_to_prescriptions() {
    let filter = StatsFilter {
        year: Some("2024".to_string()),
        status: None,
        gender: None,
    };
    let pipeline = stats_pipeline(StatsTarget::Prescriptions, &filter, 0, 10);

    // No usable row filter for this target, so no match stage at all.
    assert_eq!(pipeline.len(), 6);
}

#[test]
fn careplan_rows_group_by_description() {
    let filter = StatsFilter {
        year: Some("2023".to_string()),
        status: None,
        gender: None,
    };
    let pipeline = stats_pipeline(StatsTarget::Careplans, &filter, 5, 20);

    assert_eq!(pipeline[0], doc! { "$unwind": "$careplans" });
    assert_eq!(
        pipeline[1],
        doc! { "$match": { "careplans.start": { "$regex": "2023" } } }
    );
    assert_eq!(pipeline[3], doc! { "$sort": { "count": -1 } });
    assert_eq!(pipeline[4], doc! { "$skip": 5_i64 });
    assert_eq!(pipeline[5], doc! { "$limit": 20_i64 });
}

#[test]
fn overview_facets_share_one_gender_match() {
    let pipeline = overview_pipeline(Some("male"), 5);

    assert_eq!(pipeline.len(), 2);
    assert_eq!(
        pipeline[0],
        doc! { "$match": { "gender": { "$regex": "male", "$options": "i" } } }
    );

    let facet = pipeline[1].get_document("$facet").unwrap();
    assert!(facet.contains_key("top_doctors"));
    assert!(facet.contains_key("top_medications"));
    assert!(facet.contains_key("active_careplans"));
}

#[test]
fn overview_without_gender_is_facet_only() {
    let pipeline = overview_pipeline(None, 5);
    assert_eq!(pipeline.len(), 1);
    assert!(pipeline[0].contains_key("$facet"));
}

#[test]
fn active_careplans_branch_keeps_the_unknown_sentinel() {
    let pipeline = overview_pipeline(None, 5);
    let facet = pipeline[0].get_document("$facet").unwrap();
    let branch = facet.get_array("active_careplans").unwrap();

    let match_stage = branch[1].as_document().unwrap();
    assert_eq!(
        match_stage,
        &doc! { "$match": { "$or": [
            { "careplans.stop": "Unknown" },
            { "careplans.stop": { "$exists": false } },
        ] } }
    );
}

#[test]
fn facet_branches_are_independently_limited() {
    let pipeline = overview_pipeline(None, 3);
    let facet = pipeline[0].get_document("$facet").unwrap();

    for branch_name in ["top_doctors", "top_medications", "active_careplans"] {
        let branch = facet.get_array(branch_name).unwrap();
        let has_limit = branch
            .iter()
            .filter_map(|stage| stage.as_document())
            .any(|stage| matches!(stage.get_i64("$limit"), Ok(3)));
        assert!(has_limit, "branch {} should be limited", branch_name);
    }
}

#[test]
fn search_matches_name_or_condition_ignoring_case() {
    let filter = search_filter("asthma", None);

    let clauses = filter.get_array("$or").unwrap();
    assert_eq!(clauses.len(), 2);
    assert_eq!(
        clauses[0].as_document().unwrap(),
        &doc! { "name": { "$regex": "asthma", "$options": "i" } }
    );
    assert!(filter.get("gender").is_none());
}

#[test]
fn search_input_is_regex_escaped() {
    let filter = search_filter("a.b*", Some("f(e)male"));

    let clauses = filter.get_array("$or").unwrap();
    let name_clause = clauses[0].as_document().unwrap();
    assert_eq!(
        name_clause.get_document("name").unwrap().get_str("$regex").unwrap(),
        "a\\.b\\*"
    );
    assert_eq!(
        filter.get_document("gender").unwrap().get_str("$regex").unwrap(),
        "f\\(e\\)male"
    );
}

#[test]
fn nearby_filter_is_a_geojson_near_query() {
    let filter = nearby_filter(-6.26, 54.59, 5000);

    assert_eq!(
        filter,
        doc! { "location": { "$near": {
            "$geometry": { "type": "Point", "coordinates": [-6.26, 54.59] },
            "$maxDistance": 5000_i64,
        } } }
    );
}
