use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::analysis::resolver::{text_value, RawRecord, RecordId};
use crate::analysis::scoring::{FitScore, FitScorer, RecommendationStyle, ScoringInput};

const NOT_AVAILABLE: &str = "N/A";

/// Candidate as listed by the gateway, enriched with a fit score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateListing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positive_ratings: Option<Value>,
    pub ai_score: FitScore,
    pub recommendation: &'static str,
}

/// Candidate linked to the offer of their first placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_email: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    pub offer_title: String,
    pub employment_type: String,
    pub experience_required: String,
    pub ai_score: FitScore,
    pub recommendation: &'static str,
}

fn field(record: &RawRecord, key: &str) -> Option<Value> {
    record.get(key).filter(|value| !value.is_null()).cloned()
}

fn first_email(record: &RawRecord) -> Option<Value> {
    record
        .get("emails")
        .and_then(Value::as_array)
        .and_then(|emails| emails.first())
        .cloned()
}

fn offer_text(offer: Option<&RawRecord>, key: &str) -> String {
    offer
        .and_then(|offer| offer.get(key))
        .and_then(text_value)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn rank_candidates(candidates: &[RawRecord], scorer: &dyn FitScorer) -> Vec<CandidateListing> {
    candidates
        .iter()
        .map(|candidate| {
            let ai_score = scorer.score(&ScoringInput::for_candidate(candidate));
            CandidateListing {
                name: field(candidate, "name"),
                email: first_email(candidate),
                source: field(candidate, "source"),
                positive_ratings: field(candidate, "positive_ratings"),
                ai_score,
                recommendation: ai_score.recommendation(RecommendationStyle::CandidateListing),
            }
        })
        .collect()
}

pub fn match_offers(
    candidates: &[RawRecord],
    offers: &[RawRecord],
    scorer: &dyn FitScorer,
) -> Vec<OfferMatch> {
    let by_id: HashMap<String, &RawRecord> = offers
        .iter()
        .filter_map(|offer| {
            offer
                .get("id")
                .and_then(RecordId::from_value)
                .map(|id| (id.key(), offer))
        })
        .collect();

    candidates
        .iter()
        .map(|candidate| {
            let offer = candidate
                .get("placements")
                .and_then(Value::as_array)
                .and_then(|placements| placements.first())
                .and_then(|placement| placement.get("offer_id"))
                .and_then(RecordId::from_value)
                .and_then(|offer_id| by_id.get(&offer_id.key()).copied());

            let ai_score =
                scorer.score(&ScoringInput::for_candidate(candidate).with_offer(offer));

            OfferMatch {
                candidate_name: field(candidate, "name"),
                candidate_email: first_email(candidate),
                source: field(candidate, "source"),
                offer_title: offer_text(offer, "title"),
                employment_type: offer_text(offer, "employment_type"),
                experience_required: offer_text(offer, "experience"),
                ai_score,
                recommendation: ai_score.recommendation(RecommendationStyle::Analysis),
            }
        })
        .collect()
}
