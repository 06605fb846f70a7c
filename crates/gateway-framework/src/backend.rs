//! # Backend Trait
//!
//! The `Backend` trait is the capability contract every pluggable resource backend
//! (the "plugin" for `ports`, `networks`, …) must implement to be reachable through the
//! gateway. It exposes exactly the six operations the executor can ask for:
//! `list`, `show`, `create`, `create_bulk`, `update` and `delete`.
//!
//! # Architecture Note
//! The gateway never looks inside a backend. It resolves the backend by collection
//! name in the [`Registry`](crate::registry::Registry), shapes the payload, awaits
//! exactly one call, and hands the result (or the error) back unchanged. Anything
//! that is domain logic (id formats, validation, duplicate detection) belongs here.
//!
//! # Payload Shapes
//! Payloads arrive already wrapped by the executor:
//! - `create` receives `{"port": {...}}`
//! - `create_bulk` receives `{"ports": [{"port": {...}}, {"port": {...}}]}`
//! - `update` receives `{"port": {...}}`
//!
//! A backend that only knows how to create one resource at a time still has to
//! decide for itself how to honor a bulk request.

use crate::context::{Identity, QueryParams};
use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;

/// Errors a backend reports through its own contract.
///
/// The gateway propagates these unchanged; see
/// [`GatewayError::Backend`](crate::error::GatewayError::Backend).
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid request: {0}")]
    Invalid(String),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("Backend error: {0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl BackendError {
    /// Status a host framework would typically render for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            BackendError::NotFound(_) => StatusCode::NOT_FOUND,
            BackendError::Conflict(_) => StatusCode::CONFLICT,
            BackendError::Invalid(_) => StatusCode::BAD_REQUEST,
            BackendError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            BackendError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// CRUD capability for one resource type.
///
/// Implementations are registered once at start-up and shared read-only by every
/// in-flight request, hence `Send + Sync`. Each method is one atomic request/response
/// unit from the gateway's point of view: it is awaited once and never retried.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Every visible resource, filtered by whatever the backend understands in `params`.
    async fn list(
        &self,
        identity: &Identity,
        params: &QueryParams,
    ) -> Result<Vec<Value>, BackendError>;

    /// One resource, optionally projected onto `fields`.
    async fn show(
        &self,
        identity: &Identity,
        id: &str,
        fields: Option<&[String]>,
    ) -> Result<Value, BackendError>;

    async fn create(&self, identity: &Identity, body: Value) -> Result<Value, BackendError>;

    async fn create_bulk(
        &self,
        identity: &Identity,
        body: Value,
    ) -> Result<Vec<Value>, BackendError>;

    async fn update(
        &self,
        identity: &Identity,
        id: &str,
        body: Value,
    ) -> Result<Value, BackendError>;

    async fn delete(&self, identity: &Identity, id: &str) -> Result<(), BackendError>;
}
