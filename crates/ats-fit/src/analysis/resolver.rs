//! Canonical value extraction from records whose key names vary by upstream provider.
//!
//! Every lookup is an ordered [`ResolverChain`]: fields are tried left to right and the first
//! present value wins. Provider-specific precedence lives in [`FieldResolvers`] as data.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Raw, untyped record as exported by a connector.
pub type RawRecord = Map<String, Value>;

/// Bucket key used when no identifier could be resolved.
pub const UNKNOWN_KEY: &str = "undefined";

/// Floats below this magnitude hold integers exactly.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Scalar identifier as it appeared upstream (ids are numbers in some exports, strings in others).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(Number),
    Text(String),
}

impl RecordId {
    /// Interpret a JSON value as an identifier; blanks, `null`, booleans and containers are absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) if !text.trim().is_empty() => Some(Self::Text(text.clone())),
            Value::Number(number) => Some(Self::Number(number.clone())),
            _ => None,
        }
    }

    /// Lookup key; `10`, `10.0` and `"10"` share a key.
    pub fn key(&self) -> String {
        match self {
            Self::Number(number) => match number.as_f64() {
                Some(float)
                    if number.is_f64() && float.fract() == 0.0 && float.abs() < MAX_EXACT_FLOAT =>
                {
                    (float as i64).to_string()
                }
                _ => number.to_string(),
            },
            Self::Text(text) => text.clone(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

/// Outcome of identifier resolution. Absence is a value, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedId {
    Known(RecordId),
    Unknown,
}

impl ResolvedId {
    pub fn key(&self) -> String {
        match self {
            Self::Known(id) => id.key(),
            Self::Unknown => UNKNOWN_KEY.to_string(),
        }
    }

    pub fn into_known(self) -> Option<RecordId> {
        match self {
            Self::Known(id) => Some(id),
            Self::Unknown => None,
        }
    }
}

impl From<Option<RecordId>> for ResolvedId {
    fn from(value: Option<RecordId>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }
}

impl Serialize for ResolvedId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Known(id) => id.serialize(serializer),
            Self::Unknown => serializer.serialize_none(),
        }
    }
}

/// Dotted accessor into a record (`job.id` reads `record["job"]["id"]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    pub fn lookup<'a>(&self, record: &'a RawRecord) -> Option<&'a Value> {
        let (first, rest) = self.segments.split_first()?;
        let mut current = record.get(first)?;
        for segment in rest {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Ordered precedence list of fields; first present value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverChain {
    fields: Vec<FieldPath>,
}

impl ResolverChain {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|field| FieldPath::new(field.as_ref()))
                .collect(),
        }
    }

    pub fn resolve_id(&self, record: &RawRecord) -> ResolvedId {
        self.fields
            .iter()
            .filter_map(|field| field.lookup(record))
            .find_map(RecordId::from_value)
            .into()
    }

    pub fn resolve_text(&self, record: &RawRecord) -> Option<String> {
        self.fields
            .iter()
            .filter_map(|field| field.lookup(record))
            .find_map(text_value)
    }

    pub fn resolve_text_or(&self, record: &RawRecord, fallback: &str) -> String {
        self.resolve_text(record)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Human-readable text carried by a value.
///
/// Some exports wrap display fields as `{"label": "..."}` or `{"name": "..."}`.
pub fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Object(inner) => ["label", "name"]
            .iter()
            .filter_map(|key| inner.get(*key))
            .find_map(|nested| match nested {
                Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
                _ => None,
            }),
        _ => None,
    }
}

/// Provider precedence lists for every lookup the pipeline performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldResolvers {
    pub job_id: ResolverChain,
    pub profile_id: ResolverChain,
    pub application_job_id: ResolverChain,
    pub application_candidate_id: ResolverChain,
    pub application_id: ResolverChain,
    pub job_name: ResolverChain,
    pub job_description: ResolverChain,
    pub first_name: ResolverChain,
    pub last_name: ResolverChain,
    pub full_name: ResolverChain,
    pub email: ResolverChain,
}

impl Default for FieldResolvers {
    fn default() -> Self {
        Self {
            job_id: ResolverChain::new(["id", "job_id", "JobID", "code", "reference"]),
            profile_id: ResolverChain::new(["id", "employee_id", "candidate_id", "ProfileID"]),
            application_job_id: ResolverChain::new(["job_id", "JobID", "job.id"]),
            application_candidate_id: ResolverChain::new([
                "candidate_id",
                "employee_id",
                "ProfileID",
            ]),
            application_id: ResolverChain::new(["application_id"]),
            job_name: ResolverChain::new(["title", "job_title", "name", "job_name"]),
            job_description: ResolverChain::new(["description"]),
            first_name: ResolverChain::new(["first_name"]),
            last_name: ResolverChain::new(["last_name"]),
            full_name: ResolverChain::new(["name"]),
            email: ResolverChain::new(["email", "work_email"]),
        }
    }
}
