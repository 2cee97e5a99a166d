use serde::Serialize;
use serde_json::Value;

use super::resolver::RawRecord;
use super::scoring::{FitScore, FitScorer, RecommendationStyle, ScoringInput};

/// Quick verdict for a single candidate submitted on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateAssessment {
    pub candidate: String,
    pub ai_score: FitScore,
    pub recommendation: &'static str,
    pub feedback: String,
}

pub fn assess_candidate(data: &RawRecord, scorer: &dyn FitScorer) -> CandidateAssessment {
    let name = data
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty());
    let ai_score = scorer.score(&ScoringInput::for_candidate(data));

    CandidateAssessment {
        candidate: name.unwrap_or("Unknown").to_string(),
        ai_score,
        recommendation: ai_score.recommendation(RecommendationStyle::Processing),
        feedback: format!("AI analysis complete for {}.", name.unwrap_or("candidate")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(u32);

    impl FitScorer for Fixed {
        fn score(&self, _input: &ScoringInput<'_>) -> FitScore {
            FitScore::clamped(self.0)
        }
    }

    #[test]
    fn named_candidate_gets_personal_feedback() {
        let data = json!({ "name": "Ada" }).as_object().cloned().unwrap();
        let assessment = assess_candidate(&data, &Fixed(90));

        assert_eq!(assessment.candidate, "Ada");
        assert_eq!(assessment.recommendation, "Strong Fit");
        assert_eq!(assessment.feedback, "AI analysis complete for Ada.");
    }

    #[test]
    fn anonymous_candidate_needs_review() {
        let assessment = assess_candidate(&RawRecord::new(), &Fixed(70));

        assert_eq!(assessment.candidate, "Unknown");
        assert_eq!(assessment.recommendation, "Needs Review");
        assert_eq!(assessment.feedback, "AI analysis complete for candidate.");
    }
}
