//! # Gateway
//!
//! The facade a host router calls. It owns a shared handle to the [`Registry`] and
//! runs the three stages in order, stopping at the first failure:
//!
//! ```text
//! segments ──▶ resolve_path ──▶ DispatchTarget ──▶ select ──▶ Operation ──▶ execute ──▶ Response
//!                  │ 404                              │ 405                   │ 400 / backend error
//! ```
//!
//! [`Gateway::handle`] hands every failure back as a [`GatewayError`].
//! [`Gateway::respond`] turns the gateway's own failures into bodiless status
//! responses and only lets backend errors through.

use crate::backend::BackendError;
use crate::context::RequestContext;
use crate::dispatch::select;
use crate::error::GatewayError;
use crate::executor::execute;
use crate::registry::Registry;
use crate::resolver::resolve_path;
use crate::response::Response;
use http::Method;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct Gateway {
    registry: Arc<Registry>,
}

impl Gateway {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolves `segments`, selects the operation for `method`, and executes it.
    #[instrument(skip_all, fields(method = %method))]
    pub async fn handle<S: AsRef<str>>(
        &self,
        segments: &[S],
        method: &Method,
        ctx: &mut RequestContext,
    ) -> Result<Response, GatewayError> {
        let target = resolve_path(segments, &self.registry, ctx)?;
        let operation = select(&target, method)?;
        execute(&self.registry, &target, operation, ctx).await
    }

    /// Like [`Gateway::handle`], but 404/405/400 raised by the gateway come back as
    /// `Ok` responses without a body.
    pub async fn respond<S: AsRef<str>>(
        &self,
        segments: &[S],
        method: &Method,
        ctx: &mut RequestContext,
    ) -> Result<Response, BackendError> {
        match self.handle(segments, method, ctx).await {
            Ok(response) => Ok(response),
            Err(GatewayError::Backend(error)) => Err(error),
            Err(error) => {
                debug!(status = %error.status(), %error, "Request rejected");
                Ok(Response::empty(error.status()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Identity;
    use crate::mock::MockBackend;
    use crate::resource::ResourceType;
    use http::StatusCode;
    use serde_json::json;

    fn gateway(ports: Arc<MockBackend>) -> Gateway {
        let registry = Registry::builder()
            .register(ResourceType::new("port", "ports"), ports)
            .unwrap()
            .build();
        Gateway::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_respond_folds_core_failures() {
        let ports = Arc::new(MockBackend::new());
        let gateway = gateway(ports.clone());
        let mut ctx = RequestContext::new(Identity::anonymous());

        let missing = gateway.respond(&["widgets"], &Method::GET, &mut ctx).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert!(missing.body().is_none());

        let rejected = gateway.respond(&["ports"], &Method::PATCH, &mut ctx).await.unwrap();
        assert_eq!(rejected.status(), StatusCode::METHOD_NOT_ALLOWED);

        let no_body = gateway.respond(&["ports"], &Method::POST, &mut ctx).await.unwrap();
        assert_eq!(no_body.status(), StatusCode::BAD_REQUEST);

        assert_eq!(ports.call_count(), 0);
    }

    #[tokio::test]
    async fn test_respond_passes_backend_errors_through() {
        let ports = Arc::new(MockBackend::new());
        ports
            .expect_show()
            .return_err(BackendError::NotFound("port p9".into()));
        let gateway = gateway(ports.clone());
        let mut ctx = RequestContext::new(Identity::anonymous());

        let err = gateway
            .respond(&["ports", "p9"], &Method::GET, &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
        ports.verify();
    }

    #[tokio::test]
    async fn test_handle_returns_keyed_body() {
        let ports = Arc::new(MockBackend::new());
        ports.expect_show().return_ok(json!({"id": "p1"}));
        let gateway = gateway(ports.clone());
        let mut ctx = RequestContext::new(Identity::anonymous());

        let response = gateway
            .handle(&["ports", "p1"], &Method::GET, &mut ctx)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.into_body().unwrap().into_json(),
            json!({"port": {"id": "p1"}})
        );
        assert_eq!(ctx.resource_id(), Some("p1"));
    }
}
