use std::collections::HashMap;

use tracing::debug;

use super::domain::{Application, Job, Profile};
use super::resolver::{FieldResolvers, RawRecord, ResolvedId};

/// Request-scoped lookup tables keyed on canonical identifiers.
#[derive(Debug, Default)]
pub struct Catalog {
    jobs: HashMap<String, Job>,
    profiles: HashMap<String, Profile>,
}

impl Catalog {
    /// Index jobs and profiles by canonical key; duplicate keys keep the last record in input
    /// order. Records without a resolvable id share the `undefined` key, which is also the key
    /// of the unknown job bucket and of applications without a candidate id.
    pub fn build(jobs: Vec<RawRecord>, profiles: Vec<RawRecord>, resolvers: &FieldResolvers) -> Self {
        let mut catalog = Self::default();

        for record in jobs {
            let job = Job::from_record(record, resolvers);
            if job.id == ResolvedId::Unknown {
                debug!(job_name = %job.name, "job without identifier indexed under unknown key");
            }
            catalog.jobs.insert(job.id.key(), job);
        }

        for record in profiles {
            let profile = Profile::from_record(record, resolvers);
            if profile.id == ResolvedId::Unknown {
                debug!("profile without identifier indexed under unknown key");
            }
            catalog.profiles.insert(profile.id.key(), profile);
        }

        catalog
    }

    pub fn job(&self, id: &ResolvedId) -> Option<&Job> {
        self.jobs.get(&id.key())
    }

    pub fn profile(&self, id: &ResolvedId) -> Option<&Profile> {
        self.profiles.get(&id.key())
    }

    /// Record describing the candidate behind an application: the matching profile, or the
    /// application itself when no profile matches.
    pub fn candidate_source<'a>(&'a self, application: &'a Application) -> &'a RawRecord {
        self.profile(&application.candidate_id)
            .map(|profile| &profile.record)
            .unwrap_or(&application.record)
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }
}

/// Applications sharing one resolved job identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct JobGroup {
    pub job_id: ResolvedId,
    pub applications: Vec<Application>,
}

/// Partition applications by job id. Groups keep first-seen order and applications keep input
/// order; applications without a job id share the `undefined` bucket.
pub fn group_applications(applications: Vec<RawRecord>, resolvers: &FieldResolvers) -> Vec<JobGroup> {
    let mut groups: Vec<JobGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in applications {
        let application = Application::from_record(record, resolvers);
        let key = application.job_id.key();

        let position = *positions.entry(key).or_insert_with(|| {
            groups.push(JobGroup {
                job_id: application.job_id.clone(),
                applications: Vec::new(),
            });
            groups.len() - 1
        });

        groups[position].applications.push(application);
    }

    groups
}
