//! # Responses
//!
//! A [`Response`] is a status plus an optional body. Bodies always have exactly one
//! top-level key, the resource name (`port`) or collection name (`ports`), so they
//! are modelled as a key/value pair and serialized as a one-entry map.

use http::StatusCode;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseBody {
    key: String,
    value: Value,
}

impl ResponseBody {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_json(self) -> Value {
        let mut map = Map::with_capacity(1);
        map.insert(self.key, self.value);
        Value::Object(map)
    }
}

impl Serialize for ResponseBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.value)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    body: Option<ResponseBody>,
}

impl Response {
    pub fn with_body(status: StatusCode, body: ResponseBody) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// A bodiless response (no content, not found, method not allowed).
    pub fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> Option<&ResponseBody> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<ResponseBody> {
        self.body
    }
}
