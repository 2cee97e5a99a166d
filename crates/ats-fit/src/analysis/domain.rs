use serde::{Deserialize, Deserializer, Serialize};

use super::resolver::{FieldResolvers, RawRecord, RecordId, ResolvedId};
use super::scoring::FitScore;

pub const UNKNOWN_JOB: &str = "Unknown Job";
pub const NO_DESCRIPTION: &str = "no description";
pub const UNKNOWN_CANDIDATE: &str = "Unknown Candidate";
pub const NO_EMAIL: &str = "N/A";

/// Combined payload posted by the connectors. Absent or `null` arrays are empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub profiles: Vec<RawRecord>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub jobs: Vec<RawRecord>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub applications: Vec<RawRecord>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RawRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<RawRecord>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Job opening with its display fields resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: ResolvedId,
    pub name: String,
    pub description: String,
    pub record: RawRecord,
}

impl Job {
    pub fn from_record(record: RawRecord, resolvers: &FieldResolvers) -> Self {
        Self {
            id: resolvers.job_id.resolve_id(&record),
            name: resolvers.job_name.resolve_text_or(&record, UNKNOWN_JOB),
            description: resolvers
                .job_description
                .resolve_text_or(&record, NO_DESCRIPTION),
            record,
        }
    }

    /// Placeholder used when an application references a job missing from the export.
    pub fn unknown(id: ResolvedId) -> Self {
        Self {
            id,
            name: UNKNOWN_JOB.to_string(),
            description: NO_DESCRIPTION.to_string(),
            record: RawRecord::new(),
        }
    }
}

/// Candidate or employee profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: ResolvedId,
    pub record: RawRecord,
}

impl Profile {
    pub fn from_record(record: RawRecord, resolvers: &FieldResolvers) -> Self {
        Self {
            id: resolvers.profile_id.resolve_id(&record),
            record,
        }
    }
}

/// Link between a job and a profile as exported by the ATS.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub job_id: ResolvedId,
    pub candidate_id: ResolvedId,
    pub record: RawRecord,
}

impl Application {
    pub fn from_record(record: RawRecord, resolvers: &FieldResolvers) -> Self {
        Self {
            job_id: resolvers.application_job_id.resolve_id(&record),
            candidate_id: resolvers.application_candidate_id.resolve_id(&record),
            record,
        }
    }
}

/// Candidate identity as shown in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSummary {
    pub candidate_id: ResolvedId,
    pub name: String,
    pub email: String,
}

/// One scored application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedResult {
    pub job_id: ResolvedId,
    #[serde(rename = "jobName")]
    pub job_name: String,
    pub candidate: CandidateSummary,
    pub ai_score: FitScore,
    pub recommendation: &'static str,
    pub application_id: Option<RecordId>,
}

/// Response body of the combined analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub analyzed: usize,
    pub grouped_jobs: usize,
    pub candidates: Vec<AnalyzedResult>,
}
