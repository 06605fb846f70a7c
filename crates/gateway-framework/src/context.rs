//! # Request Context
//!
//! Per-request state shared by the resolver and the executor. Collaborators fill in
//! the inputs (identity, query parameters, decoded resources) before dispatch; the
//! resolver then accumulates path identifiers and the current collection while it
//! walks the path.
//!
//! A `RequestContext` is owned by exactly one request pipeline. The gateway borrows it
//! mutably while resolving and immutably while executing, so it can never be shared
//! across concurrent requests.

use crate::resource::ResourceType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Query parameter carrying the field-selection filter for `show`.
pub const FIELDS_PARAM: &str = "fields";

/// Identifiers accumulated from the path, keyed `"<singular>_id"`.
pub type PathIds = BTreeMap<String, String>;

/// Caller identity as populated by the authentication collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Option<String>,
    pub project_id: Option<String>,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            project_id: Some(project_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// A query parameter value. Repeated keys (`?fields=a&fields=b`) become `Multi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    pub fn to_list(&self) -> Vec<String> {
        match self {
            QueryValue::Single(v) => vec![v.clone()],
            QueryValue::Multi(vs) => vs.clone(),
        }
    }

    pub fn contains(&self, candidate: &str) -> bool {
        match self {
            QueryValue::Single(v) => v == candidate,
            QueryValue::Multi(vs) => vs.iter().any(|v| v == candidate),
        }
    }
}

/// Parsed query parameters, in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, QueryValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value. Inserting an existing key turns it into a `Multi` value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let merged = match self.0.remove(&name) {
            Some(QueryValue::Single(prev)) => QueryValue::Multi(vec![prev, value]),
            Some(QueryValue::Multi(mut prev)) => {
                prev.push(value);
                QueryValue::Multi(prev)
            }
            None => QueryValue::Single(value),
        };
        self.0.insert(name, merged);
    }

    /// Sets `name` to a single value, replacing anything already there.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), QueryValue::Single(value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.0.get(name)
    }

    /// The field-selection filter, if the caller asked for one.
    pub fn fields(&self) -> Option<Vec<String>> {
        self.get(FIELDS_PARAM).map(QueryValue::to_list)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Request-scoped state for one pass through the gateway.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    identity: Identity,
    query: QueryParams,
    resources: Vec<Value>,
    uri_identifiers: PathIds,
    collection: Option<String>,
    resource_id: Option<String>,
}

impl RequestContext {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Decoded request resources, in body order.
    pub fn with_resources(mut self, resources: Vec<Value>) -> Self {
        self.resources = resources;
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn resources(&self) -> &[Value] {
        &self.resources
    }

    pub fn uri_identifiers(&self) -> &PathIds {
        &self.uri_identifiers
    }

    /// Name of the last collection resolved from the path.
    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    /// Id of the last item resolved from the path.
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub(crate) fn record_collection(&mut self, name: &str) {
        self.collection = Some(name.to_string());
    }

    pub(crate) fn record_item(&mut self, resource: &ResourceType, id: &str) {
        self.uri_identifiers.insert(resource.id_key(), id.to_string());
        self.resource_id = Some(id.to_string());
    }
}
