//! Fit scoring behind a swappable [`FitScorer`] so a real model can replace the placeholder.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::Value;

use super::resolver::RawRecord;

/// Scores strictly above this are strong fits.
pub const STRONG_FIT_THRESHOLD: u8 = 70;

pub const LINKEDIN_BONUS: u32 = 10;
pub const POSITIVE_RATINGS_BONUS: u32 = 15;
pub const POSITIVE_RATINGS_FLOOR: f64 = 50.0;
pub const MASTERS_OFFER_BONUS: u32 = 5;

/// Bounded fit score in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FitScore(u8);

impl FitScore {
    pub const MAX: u8 = 100;

    /// Clamp to the upper bound; the lower bound holds by construction.
    pub fn clamped(raw: u32) -> Self {
        Self(raw.min(u32::from(Self::MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_strong_fit(self) -> bool {
        self.0 > STRONG_FIT_THRESHOLD
    }

    pub fn recommendation(self, style: RecommendationStyle) -> &'static str {
        style.label(self)
    }
}

/// Label pairs used by the different call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationStyle {
    /// Combined analysis: "Strong Fit" / "Consider".
    Analysis,
    /// Candidate listing: "Highly Recommended" / "Consider".
    CandidateListing,
    /// Single-candidate processing: "Strong Fit" / "Needs Review".
    Processing,
}

impl RecommendationStyle {
    pub fn label(self, score: FitScore) -> &'static str {
        match (self, score.is_strong_fit()) {
            (Self::Analysis | Self::Processing, true) => "Strong Fit",
            (Self::CandidateListing, true) => "Highly Recommended",
            (Self::Analysis | Self::CandidateListing, false) => "Consider",
            (Self::Processing, false) => "Needs Review",
        }
    }
}

/// Records available when scoring one application.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    /// Profile when matched, else the application record.
    pub candidate: &'a RawRecord,
    pub application: Option<&'a RawRecord>,
    pub job: Option<&'a RawRecord>,
    pub offer: Option<&'a RawRecord>,
}

impl<'a> ScoringInput<'a> {
    pub fn for_candidate(candidate: &'a RawRecord) -> Self {
        Self {
            candidate,
            application: None,
            job: None,
            offer: None,
        }
    }

    pub fn with_offer(mut self, offer: Option<&'a RawRecord>) -> Self {
        self.offer = offer;
        self
    }
}

pub trait FitScorer: Send + Sync {
    fn score(&self, input: &ScoringInput<'_>) -> FitScore;
}

/// Placeholder scorer: uniform baseline in `[0, 99]` plus additive signal bonuses.
///
/// The combined analysis and single-candidate processing score on the baseline alone; see
/// [`MockScorer::without_signals`].
pub struct MockScorer {
    rng: Mutex<StdRng>,
    signals: bool,
}

impl MockScorer {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            signals: true,
        }
    }

    /// Reproducible sequence for tests and offline runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            signals: true,
        }
    }

    /// Score on the random baseline only; candidate and offer bonuses are ignored.
    pub fn without_signals(mut self) -> Self {
        self.signals = false;
        self
    }

    fn baseline(&self) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..100)
    }
}

impl Default for MockScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl FitScorer for MockScorer {
    fn score(&self, input: &ScoringInput<'_>) -> FitScore {
        let bonus = if self.signals { signal_bonus(input) } else { 0 };
        FitScore::clamped(self.baseline() + bonus)
    }
}

/// Additive bonus from candidate and offer signals.
pub fn signal_bonus(input: &ScoringInput<'_>) -> u32 {
    let mut bonus = 0;

    if input.candidate.get("source").and_then(Value::as_str) == Some("LinkedIn") {
        bonus += LINKEDIN_BONUS;
    }

    if input
        .candidate
        .get("positive_ratings")
        .and_then(numeric)
        .is_some_and(|ratings| ratings > POSITIVE_RATINGS_FLOOR)
    {
        bonus += POSITIVE_RATINGS_BONUS;
    }

    if input
        .offer
        .and_then(|offer| offer.get("education"))
        .and_then(Value::as_str)
        .is_some_and(is_masters_degree)
    {
        bonus += MASTERS_OFFER_BONUS;
    }

    bonus
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn is_masters_degree(education: &str) -> bool {
    matches!(education, "master's degree" | "master_degree")
}
