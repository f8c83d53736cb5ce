use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulcerwatch_schema::{Reading, ReadingSet, SensorKind};

/// Declares which sensor a raw feed field maps to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub sensor: String,
    pub kind: SensorKind,
}

/// Feed field name ("field1", ...) to sensor mapping, supplied by
/// configuration rather than hardcoded against any one channel layout.
pub type FieldMap = BTreeMap<String, FieldSpec>;

/// A single field of a raw record that could not be turned into a reading.
///
/// These are collected, not thrown: upstream feeds are third-party and
/// routinely emit one malformed field without invalidating the rest of the
/// record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("field {field} is absent from the record")]
    MissingField { field: String },
    #[error("field {field} value {raw:?} is not a finite number")]
    NotANumber { field: String, raw: String },
}

impl NormalizeError {
    pub fn field(&self) -> &str {
        match self {
            NormalizeError::MissingField { field } => field,
            NormalizeError::NotANumber { field, .. } => field,
        }
    }
}

/// Converts one raw feed record into typed readings.
///
/// Every configured field present and parseable contributes a `Reading`;
/// every configured field that is absent or non-numeric contributes a
/// `NormalizeError`. The call itself never fails, so a record with one bad
/// field still yields the rest of the cycle's data.
pub fn normalize_record(
    record: &serde_json::Map<String, serde_json::Value>,
    fields: &FieldMap,
    taken_at: DateTime<Utc>,
) -> (ReadingSet, Vec<NormalizeError>) {
    let mut set = ReadingSet::new(taken_at);
    let mut failures = Vec::new();

    for (field, spec) in fields {
        let Some(value) = record.get(field) else {
            failures.push(NormalizeError::MissingField {
                field: field.clone(),
            });
            continue;
        };
        match parse_field(value) {
            Some(v) => {
                set.insert(spec.sensor.clone(), Reading::new(spec.kind, v, taken_at));
            }
            None => {
                failures.push(NormalizeError::NotANumber {
                    field: field.clone(),
                    raw: raw_repr(value),
                });
            }
        }
    }

    if !failures.is_empty() {
        tracing::debug!(
            parsed = set.len(),
            failed = failures.len(),
            "partial telemetry record"
        );
    }

    (set, failures)
}

/// Feeds deliver numbers either as JSON numbers or as quoted strings;
/// accept both, reject anything non-finite.
fn parse_field(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

fn raw_repr(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
