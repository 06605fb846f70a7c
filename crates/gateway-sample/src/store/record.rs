//! Helpers over stored records: envelope unwrapping, list filtering, field
//! projection and shallow merging.

use gateway_framework::{BackendError, QueryParams, FIELDS_PARAM};
use serde_json::{Map, Value};

/// A stored resource: a JSON object with at least an `id`.
pub type Record = Map<String, Value>;

pub const ID_FIELD: &str = "id";

/// Extracts the object stored under `key` in `{key: {...}}`.
pub fn unwrap_envelope(body: Value, key: &str) -> Result<Record, BackendError> {
    let Value::Object(mut outer) = body else {
        return Err(BackendError::Invalid(format!("expected an object keyed by {key}")));
    };
    match outer.remove(key) {
        Some(Value::Object(record)) => Ok(record),
        Some(_) => Err(BackendError::Invalid(format!("{key} must be an object"))),
        None => Err(BackendError::Invalid(format!("missing {key} in request body"))),
    }
}

/// Extracts every record from `{plural: [{singular: {...}}, ...]}`.
pub fn unwrap_bulk(body: Value, plural: &str, singular: &str) -> Result<Vec<Record>, BackendError> {
    let Value::Object(mut outer) = body else {
        return Err(BackendError::Invalid(format!("expected an object keyed by {plural}")));
    };
    match outer.remove(plural) {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| unwrap_envelope(item, singular))
            .collect(),
        Some(_) => Err(BackendError::Invalid(format!("{plural} must be a list"))),
        None => Err(BackendError::Invalid(format!("missing {plural} in request body"))),
    }
}

/// The record's `id`, if it carries a string one.
pub fn record_id(record: &Record) -> Result<Option<&str>, BackendError> {
    match record.get(ID_FIELD) {
        None => Ok(None),
        Some(Value::String(id)) => Ok(Some(id.as_str())),
        Some(_) => Err(BackendError::Invalid("id must be a string".into())),
    }
}

/// True when every query parameter other than `fields` matches the record.
///
/// A repeated parameter matches if any of its values does. Non-string values are
/// compared by their JSON rendering (`?admin_state_up=true`).
pub fn matches(record: &Record, params: &QueryParams) -> bool {
    params
        .iter()
        .filter(|(name, _)| *name != FIELDS_PARAM)
        .all(|(name, wanted)| match record.get(name) {
            Some(Value::String(actual)) => wanted.contains(actual),
            Some(actual) => wanted.contains(&actual.to_string()),
            None => false,
        })
}

/// Keeps only the listed fields. Unknown field names are skipped.
pub fn project(record: &Record, fields: &[String]) -> Value {
    let projected = fields
        .iter()
        .filter_map(|f| record.get(f).map(|v| (f.clone(), v.clone())))
        .collect();
    Value::Object(projected)
}

/// Shallow merge: top-level keys in `changes` replace those in `record`.
pub fn merge(record: &mut Record, changes: Record) {
    for (key, value) in changes {
        record.insert(key, value);
    }
}
