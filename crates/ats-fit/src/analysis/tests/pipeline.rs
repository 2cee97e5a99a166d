use super::common::*;
use serde_json::{json, Value};

use crate::analysis::resolver::{FieldResolvers, RecordId, ResolvedId, ResolverChain};
use crate::analysis::AnalysisRequest;

#[test]
fn single_application_resolves_job_profile_and_application_id() {
    let (pipeline, dispatcher) = pipeline(&[80]);

    let report = pipeline.analyze(request(json!({
        "profiles": [{ "id": 1, "first_name": "A", "last_name": "B", "email": "a@x.com" }],
        "jobs": [{ "id": 10, "title": "Eng" }],
        "applications": [{ "job_id": 10, "candidate_id": 1, "application_id": "app1" }],
    })));

    assert_eq!(report.analyzed, 1);
    assert_eq!(report.grouped_jobs, 1);
    let result = &report.candidates[0];
    assert_eq!(result.job_name, "Eng");
    assert_eq!(result.candidate.name, "A B");
    assert_eq!(result.candidate.email, "a@x.com");
    assert_eq!(result.candidate.candidate_id, ResolvedId::Known(RecordId::from(1)));
    assert_eq!(result.application_id, Some(RecordId::from("app1")));
    assert_eq!(result.recommendation, "Strong Fit");

    let updates = dispatcher.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].application_id, RecordId::from("app1"));
    assert_eq!(updates[0].status_id, 3);
}

#[test]
fn missing_profile_falls_back_to_application_fields() {
    let (pipeline, _) = pipeline(&[40]);

    let report = pipeline.analyze(request(json!({
        "jobs": [{ "job_id": "J-1", "job_title": "Designer" }],
        "applications": [{
            "JobID": "J-1",
            "candidate_id": 404,
            "name": "Walk In",
            "work_email": "walk.in@example.test",
        }],
    })));

    let result = &report.candidates[0];
    assert_eq!(result.job_name, "Designer");
    assert_eq!(result.candidate.name, "Walk In");
    assert_eq!(result.candidate.email, "walk.in@example.test");
    assert_eq!(result.recommendation, "Consider");
}

#[test]
fn applications_without_job_land_in_one_unknown_group() {
    let (pipeline, _) = pipeline(&[50]);

    let report = pipeline.analyze(request(json!({
        "applications": [
            { "candidate_id": 1 },
            { "job_id": null, "candidate_id": 2 },
        ],
    })));

    assert_eq!(report.grouped_jobs, 1);
    assert_eq!(report.analyzed, 2);
    for result in &report.candidates {
        assert_eq!(result.job_id, ResolvedId::Unknown);
        assert_eq!(result.job_name, "Unknown Job");
        assert_eq!(result.candidate.name, "Unknown Candidate");
        assert_eq!(result.candidate.email, "N/A");
    }
}

#[test]
fn report_orders_groups_first_seen_and_applications_by_input() {
    let (pipeline, _) = pipeline(&[50]);

    let report = pipeline.analyze(request(json!({
        "jobs": [{ "id": 1, "title": "One" }, { "id": 2, "title": "Two" }],
        "applications": [
            { "job_id": 2, "name": "first" },
            { "job_id": 1, "name": "second" },
            { "job_id": 2, "name": "third" },
            { "job_id": 1, "name": "fourth" },
        ],
    })));

    let order: Vec<(&str, &str)> = report
        .candidates
        .iter()
        .map(|result| (result.job_name.as_str(), result.candidate.name.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Two", "first"),
            ("Two", "third"),
            ("One", "second"),
            ("One", "fourth"),
        ]
    );
    assert_eq!(report.grouped_jobs, 2);
}

#[test]
fn status_bands_follow_scores_and_skip_missing_application_ids() {
    let (pipeline, dispatcher) = pipeline(&[71, 29, 30, 70, 99]);

    let report = pipeline.analyze(request(json!({
        "applications": [
            { "job_id": 1, "application_id": "a" },
            { "job_id": 1, "application_id": "b" },
            { "job_id": 1, "application_id": 3 },
            { "job_id": 1, "application_id": "d" },
            { "job_id": 1 },
        ],
    })));

    assert_eq!(report.analyzed, 5);
    let statuses: Vec<(String, u32)> = dispatcher
        .updates()
        .into_iter()
        .map(|update| (update.application_id.key(), update.status_id))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("a".to_string(), 3),
            ("b".to_string(), 5),
            ("3".to_string(), 1),
            ("d".to_string(), 1),
        ]
    );
    assert!(report.candidates[4].application_id.is_none());
}

#[test]
fn matched_profile_application_id_takes_precedence() {
    let (pipeline, dispatcher) = pipeline(&[10]);

    pipeline.analyze(request(json!({
        "profiles": [{ "id": 5, "name": "P", "application_id": "from-profile" }],
        "applications": [{ "job_id": 1, "candidate_id": 5, "application_id": "from-app" }],
    })));

    assert_eq!(dispatcher.updates()[0].application_id, RecordId::from("from-profile"));
    assert_eq!(dispatcher.updates()[0].status_id, 5);
}

#[test]
fn absent_and_null_arrays_produce_an_empty_report() {
    let (pipeline, dispatcher) = pipeline(&[50]);

    let report = pipeline.analyze(request(json!({ "profiles": null })));
    assert_eq!(report.analyzed, 0);
    assert_eq!(report.grouped_jobs, 0);
    assert!(report.candidates.is_empty());
    assert!(dispatcher.updates().is_empty());

    let report = pipeline.analyze(AnalysisRequest::default());
    assert_eq!(report.analyzed, 0);
}

#[test]
fn wrongly_typed_payloads_are_rejected_at_decode_time() {
    let err = serde_json::from_value::<AnalysisRequest>(json!({ "jobs": "not-a-list" }));
    assert!(err.is_err());
    let err = serde_json::from_value::<AnalysisRequest>(json!({ "applications": [1, 2] }));
    assert!(err.is_err());
}

#[test]
fn serialized_report_matches_wire_shape() {
    let (pipeline, _) = pipeline(&[72]);

    let report = pipeline.analyze(request(json!({
        "jobs": [{ "id": 10, "title": "Eng" }],
        "applications": [{ "job_id": 10, "candidate_id": 1 }],
    })));
    let body: Value = serde_json::to_value(&report).expect("report serializes");

    assert_eq!(body["analyzed"], json!(1));
    assert_eq!(body["grouped_jobs"], json!(1));
    let candidate = &body["candidates"][0];
    assert_eq!(candidate["job_id"], json!(10));
    assert_eq!(candidate["jobName"], json!("Eng"));
    assert_eq!(candidate["candidate"]["candidate_id"], json!(1));
    assert_eq!(candidate["ai_score"], json!(72));
    assert_eq!(candidate["recommendation"], json!("Strong Fit"));
    assert_eq!(candidate["application_id"], Value::Null);
}

#[test]
fn provider_orderings_are_configurable_data() {
    let (pipeline, _) = pipeline(&[50]);
    let pipeline = pipeline.with_resolvers(FieldResolvers {
        job_id: ResolverChain::new(["reference"]),
        application_job_id: ResolverChain::new(["opening.reference"]),
        ..FieldResolvers::default()
    });

    let mut job = record(json!({ "id": "ignored", "title": "Referenced" }));
    job.insert("reference".to_string(), json!("REF-1"));

    let report = pipeline.analyze(AnalysisRequest {
        jobs: vec![job],
        applications: vec![record(json!({ "opening": { "reference": "REF-1" } }))],
        ..AnalysisRequest::default()
    });

    assert_eq!(report.candidates[0].job_name, "Referenced");
    assert_eq!(report.candidates[0].job_id.key(), "REF-1");
}

#[test]
fn id_less_job_and_profile_serve_the_unknown_bucket() {
    let (pipeline, _) = pipeline(&[50]);

    let report = pipeline.analyze(request(json!({
        "jobs": [{ "title": "Untracked Opening", "description": "kept by title only" }],
        "profiles": [{ "first_name": "No", "last_name": "Id", "email": "no.id@example.test" }],
        "applications": [{ "name": "ignored" }],
    })));

    let result = &report.candidates[0];
    assert_eq!(result.job_id, ResolvedId::Unknown);
    assert_eq!(result.job_name, "Untracked Opening");
    assert_eq!(result.candidate.name, "No Id");
    assert_eq!(result.candidate.email, "no.id@example.test");
}

#[test]
fn integral_float_ids_match_integer_references() {
    let (pipeline, _) = pipeline(&[50]);

    let report = pipeline.analyze(request(json!({
        "jobs": [{ "id": 10.0, "title": "Float Keyed" }],
        "applications": [{ "job_id": 10 }],
    })));

    assert_eq!(report.candidates[0].job_name, "Float Keyed");
}
