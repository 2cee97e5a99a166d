//! Reconciliation, grouping, scoring and aggregation of heterogeneous ATS exports.

pub mod assessment;
pub mod candidate;
pub mod domain;
pub mod grouping;
pub mod pipeline;
pub mod resolver;
pub mod scoring;
pub mod status;

#[cfg(test)]
mod tests;

pub use assessment::{assess_candidate, CandidateAssessment};
pub use domain::{
    AnalysisReport, AnalysisRequest, AnalyzedResult, Application, CandidateSummary, Job, Profile,
};
pub use pipeline::AnalysisPipeline;
pub use resolver::{FieldResolvers, RawRecord, RecordId, ResolvedId, ResolverChain};
pub use scoring::{FitScore, FitScorer, MockScorer, RecommendationStyle, ScoringInput};
pub use status::AtsStatus;
