use std::sync::Arc;

use tracing::{debug, info};

use super::candidate;
use super::domain::{AnalysisReport, AnalysisRequest, AnalyzedResult, Job};
use super::grouping::{group_applications, Catalog};
use super::resolver::{FieldResolvers, RawRecord, RecordId};
use super::scoring::{FitScorer, RecommendationStyle, ScoringInput};
use super::status::AtsStatus;
use crate::propagation::{StatusDispatcher, StatusUpdate};

/// Reconciles one request payload into the scored report.
///
/// Resolution, grouping, scoring and aggregation are synchronous. The only side effect is the
/// status dispatch, which never blocks and never changes the report.
pub struct AnalysisPipeline {
    resolvers: FieldResolvers,
    scorer: Arc<dyn FitScorer>,
    dispatcher: Arc<dyn StatusDispatcher>,
}

impl AnalysisPipeline {
    pub fn new(scorer: Arc<dyn FitScorer>, dispatcher: Arc<dyn StatusDispatcher>) -> Self {
        Self {
            resolvers: FieldResolvers::default(),
            scorer,
            dispatcher,
        }
    }

    pub fn with_resolvers(mut self, resolvers: FieldResolvers) -> Self {
        self.resolvers = resolvers;
        self
    }

    pub fn analyze(&self, request: AnalysisRequest) -> AnalysisReport {
        let AnalysisRequest {
            profiles,
            jobs,
            applications,
        } = request;

        info!(
            profiles = profiles.len(),
            jobs = jobs.len(),
            applications = applications.len(),
            "analysis payload received"
        );

        let catalog = Catalog::build(jobs, profiles, &self.resolvers);
        let groups = group_applications(applications, &self.resolvers);
        let grouped_jobs = groups.len();

        let mut candidates = Vec::new();
        for group in &groups {
            let job = catalog
                .job(&group.job_id)
                .cloned()
                .unwrap_or_else(|| Job::unknown(group.job_id.clone()));

            info!(
                job_id = %group.job_id.key(),
                job_name = %job.name,
                applications = group.applications.len(),
                "scoring job group"
            );
            debug!(job_id = %group.job_id.key(), description = %job.description, "job description");

            for application in &group.applications {
                let source = catalog.candidate_source(application);
                let summary =
                    candidate::summarize(application.candidate_id.clone(), source, &self.resolvers);

                let score = self.scorer.score(&ScoringInput {
                    candidate: source,
                    application: Some(&application.record),
                    job: Some(&job.record),
                    offer: None,
                });
                let recommendation = score.recommendation(RecommendationStyle::Analysis);

                let application_id = self
                    .resolvers
                    .application_id
                    .resolve_id(source)
                    .into_known()
                    .or_else(|| {
                        self.resolvers
                            .application_id
                            .resolve_id(&application.record)
                            .into_known()
                    });

                info!(
                    candidate = %summary.name,
                    email = %summary.email,
                    ai_score = score.value(),
                    recommendation,
                    resume_url = %link(source, "resume_url", "No resume found"),
                    profile_url = %link(source, "profile_url", "No profile found"),
                    "candidate scored"
                );

                if let Some(application_id) = &application_id {
                    self.propagate(application_id, AtsStatus::for_score(score));
                }

                candidates.push(AnalyzedResult {
                    job_id: group.job_id.clone(),
                    job_name: job.name.clone(),
                    candidate: summary,
                    ai_score: score,
                    recommendation,
                    application_id,
                });
            }
        }

        info!(
            analyzed = candidates.len(),
            grouped_jobs,
            indexed_jobs = catalog.job_count(),
            indexed_profiles = catalog.profile_count(),
            "analysis complete"
        );

        AnalysisReport {
            analyzed: candidates.len(),
            grouped_jobs,
            candidates,
        }
    }

    fn propagate(&self, application_id: &RecordId, status: AtsStatus) {
        debug!(
            application_id = %application_id,
            status = status.label(),
            status_id = status.code(),
            "dispatching status update"
        );
        self.dispatcher
            .dispatch(StatusUpdate::new(application_id.clone(), status));
    }
}

fn link(record: &RawRecord, field: &str, fallback: &'static str) -> String {
    record
        .get(field)
        .and_then(serde_json::Value::as_str)
        .filter(|url| !url.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
