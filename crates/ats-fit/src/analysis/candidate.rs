use super::domain::{CandidateSummary, NO_EMAIL, UNKNOWN_CANDIDATE};
use super::resolver::{FieldResolvers, RawRecord, ResolvedId};

/// `first last` when both parts exist, else the combined name field, else the sentinel.
pub fn candidate_name(record: &RawRecord, resolvers: &FieldResolvers) -> String {
    let first = resolvers.first_name.resolve_text(record);
    let last = resolvers.last_name.resolve_text(record);

    match (first, last) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        _ => resolvers
            .full_name
            .resolve_text_or(record, UNKNOWN_CANDIDATE),
    }
}

pub fn candidate_email(record: &RawRecord, resolvers: &FieldResolvers) -> String {
    resolvers.email.resolve_text_or(record, NO_EMAIL)
}

pub fn summarize(
    candidate_id: ResolvedId,
    source: &RawRecord,
    resolvers: &FieldResolvers,
) -> CandidateSummary {
    CandidateSummary {
        candidate_id,
        name: candidate_name(source, resolvers),
        email: candidate_email(source, resolvers),
    }
}
