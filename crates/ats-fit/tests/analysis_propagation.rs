use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ats_fit::analysis::{
    AnalysisPipeline, AnalysisRequest, FitScore, FitScorer, ScoringInput,
};
use ats_fit::config::PropagationConfig;
use ats_fit::propagation::{
    PropagationError, PropagationQueue, StatusReceipt, StatusUpdate, StatusUpdater,
};
use serde_json::json;

/// Scores by the application's candidate id so every application lands in a known status band.
struct ByCandidate;

impl FitScorer for ByCandidate {
    fn score(&self, input: &ScoringInput<'_>) -> FitScore {
        let id = input
            .application
            .and_then(|application| application.get("candidate_id"))
            .and_then(|value| value.as_u64())
            .unwrap_or_default();
        match id {
            1 => FitScore::clamped(91),
            2 => FitScore::clamped(45),
            _ => FitScore::clamped(12),
        }
    }
}

#[derive(Default)]
struct RecordingUpdater {
    seen: Mutex<Vec<StatusUpdate>>,
}

#[async_trait]
impl StatusUpdater for RecordingUpdater {
    async fn update_status(&self, update: &StatusUpdate) -> Result<StatusReceipt, PropagationError> {
        self.seen
            .lock()
            .expect("recording mutex poisoned")
            .push(update.clone());
        Ok(StatusReceipt {
            ok: true,
            http_status: 200,
            bamboohr_reply: "No response body".to_string(),
            application_id: update.application_id.clone(),
            updated_to: update.status_id,
        })
    }
}

fn request() -> AnalysisRequest {
    serde_json::from_value(json!({
        "jobs": [
            { "id": 10, "title": "Backend Engineer" },
            { "job_id": "J-2", "job_title": "Recruiter" },
        ],
        "profiles": [
            { "id": 1, "first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.test" },
        ],
        "applications": [
            { "job_id": 10, "candidate_id": 1, "application_id": "app-1" },
            { "JobID": "J-2", "candidate_id": 2, "application_id": 2002, "name": "Bo" },
            { "job_id": 10, "candidate_id": 3, "application_id": "app-3" },
            { "candidate_id": 4 },
        ],
    }))
    .expect("payload decodes")
}

#[tokio::test]
async fn computed_statuses_reach_the_updater() {
    let updater = Arc::new(RecordingUpdater::default());
    let (queue, workers) = PropagationQueue::spawn(updater.clone(), &PropagationConfig::default());
    let pipeline = AnalysisPipeline::new(Arc::new(ByCandidate), Arc::new(queue));

    let report = pipeline.analyze(request());

    assert_eq!(report.analyzed, 4);
    assert_eq!(report.grouped_jobs, 3);
    assert_eq!(report.candidates[0].candidate.name, "Ada Lovelace");
    assert_eq!(report.candidates[1].job_name, "Backend Engineer");
    assert_eq!(report.candidates[2].job_name, "Recruiter");
    assert_eq!(report.candidates[2].candidate.name, "Bo");
    assert_eq!(report.candidates[3].job_name, "Unknown Job");

    drop(pipeline);
    workers.drain().await;

    let mut seen: Vec<(String, u32)> = updater
        .seen
        .lock()
        .expect("recording mutex poisoned")
        .iter()
        .map(|update| (update.application_id.key(), update.status_id))
        .collect();
    seen.sort();
    assert_eq!(
        seen,
        vec![
            ("2002".to_string(), 1),
            ("app-1".to_string(), 3),
            ("app-3".to_string(), 5),
        ]
    );
}
