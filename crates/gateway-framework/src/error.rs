//! # Gateway Errors
//!
//! One error type for the whole pipeline. Each variant belongs to exactly one stage,
//! and every stage short-circuits: nothing after a failed stage runs.
//!
//! - resolution: [`GatewayError::NotFound`], [`GatewayError::NoResource`]
//! - dispatch: [`GatewayError::MethodNotAllowed`]
//! - execution: [`GatewayError::MissingBody`], [`GatewayError::Backend`]

use crate::backend::BackendError;
use crate::dispatch::Operation;
use crate::target::TargetKind;
use http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("No backend registered for collection: {collection}")]
    NotFound { collection: String },
    #[error("Request path names no resource")]
    NoResource,
    #[error("Method {method} not supported on {kind}")]
    MethodNotAllowed { method: String, kind: TargetKind },
    #[error("No resource payload supplied for {operation}")]
    MissingBody { operation: Operation },
    /// Whatever the backend reported, untouched.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NotFound { .. } | GatewayError::NoResource => StatusCode::NOT_FOUND,
            GatewayError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::MissingBody { .. } => StatusCode::BAD_REQUEST,
            GatewayError::Backend(e) => e.status(),
        }
    }
}
