use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::analysis::resolver::RawRecord;
use crate::analysis::scoring::{FitScore, FitScorer, ScoringInput};
use crate::analysis::{AnalysisPipeline, AnalysisRequest};
use crate::propagation::{StatusDispatcher, StatusUpdate};

/// Scorer returning a scripted sequence, repeating the last value once exhausted.
pub(super) struct ScriptedScorer {
    scores: Mutex<Vec<u32>>,
}

impl ScriptedScorer {
    pub(super) fn new(scores: &[u32]) -> Self {
        let mut scores = scores.to_vec();
        scores.reverse();
        Self {
            scores: Mutex::new(scores),
        }
    }
}

impl FitScorer for ScriptedScorer {
    fn score(&self, _input: &ScoringInput<'_>) -> FitScore {
        let mut scores = self.scores.lock().expect("scores mutex poisoned");
        let next = if scores.len() > 1 {
            scores.pop().unwrap_or_default()
        } else {
            scores.last().copied().unwrap_or_default()
        };
        FitScore::clamped(next)
    }
}

#[derive(Default)]
pub(super) struct MemoryDispatcher {
    updates: Mutex<Vec<StatusUpdate>>,
}

impl StatusDispatcher for MemoryDispatcher {
    fn dispatch(&self, update: StatusUpdate) {
        self.updates
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(update);
    }
}

impl MemoryDispatcher {
    pub(super) fn updates(&self) -> Vec<StatusUpdate> {
        self.updates.lock().expect("dispatcher mutex poisoned").clone()
    }
}

pub(super) fn pipeline(scores: &[u32]) -> (AnalysisPipeline, Arc<MemoryDispatcher>) {
    let dispatcher = Arc::new(MemoryDispatcher::default());
    let pipeline = AnalysisPipeline::new(Arc::new(ScriptedScorer::new(scores)), dispatcher.clone());
    (pipeline, dispatcher)
}

pub(super) fn request(value: Value) -> AnalysisRequest {
    serde_json::from_value(value).expect("valid analysis request")
}

pub(super) fn record(value: Value) -> RawRecord {
    value.as_object().cloned().expect("object literal")
}
