//! # Gateway Framework
//!
//! The dispatch core of a REST resource gateway. A host router hands it a path
//! (already split into segments), an HTTP method and a [`RequestContext`]; the
//! gateway works out which resource the path names, which operation the method
//! asks for, and calls the pluggable [`Backend`] registered for that resource.
//!
//! ## Architecture Overview
//!
//! The pipeline has three stages, each in its own module:
//!
//! 1. **Resolution** ([`resolver`]) - walk the segments from the root into a [`DispatchTarget`]
//! 2. **Dispatch** ([`dispatch`]) - map `(target kind, method)` to an [`Operation`]
//! 3. **Execution** ([`executor`]) - shape the payload, call the backend, key the result
//!
//! [`Gateway`] composes them. Backends are looked up by collection name in an
//! immutable [`Registry`] built once at start-up and shared by every request.
//!
//! ## Core Abstractions
//!
//! ### [`Backend`] - The Capability Contract
//!
//! Six async operations: `list`, `show`, `create`, `create_bulk`, `update`, `delete`.
//! A backend owns its domain rules; the gateway never inspects payloads beyond
//! wrapping them under the resource key.
//!
//! ### [`ResourceType`] - Names
//!
//! A `{singular, plural}` pair. The plural names the collection in the path and the
//! list response key; the singular keys single-resource payloads and item ids
//! (`port_id`).
//!
//! ### [`GatewayError`] - Failures
//!
//! Unknown collection (404), unsupported method (405), missing payload (400), or a
//! backend error passed through untouched.
//!
//! ## Quick Start
//!
//! ```rust
//! use gateway_framework::mock::MockBackend;
//! use gateway_framework::{Gateway, Identity, Registry, RequestContext, ResourceType};
//! use http::{Method, StatusCode};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ports = Arc::new(MockBackend::new());
//!     ports.expect_create().return_ok(json!({"id": "p1", "name": "web"}));
//!
//!     let registry = Registry::builder()
//!         .register(ResourceType::new("port", "ports"), ports.clone())
//!         .unwrap()
//!         .build();
//!     let gateway = Gateway::new(Arc::new(registry));
//!
//!     let mut ctx = RequestContext::new(Identity::new("user-1", "project-1"))
//!         .with_resources(vec![json!({"name": "web"})]);
//!     let response = gateway.handle(&["ports"], &Method::POST, &mut ctx).await.unwrap();
//!
//!     assert_eq!(response.status(), StatusCode::CREATED);
//!     assert_eq!(response.body().unwrap().key(), "port");
//! }
//! ```
//!
//! ## Testing
//!
//! See [`mock`] for a scriptable backend that records every call.

pub mod backend;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod mock;
pub mod registry;
pub mod resolver;
pub mod resource;
pub mod response;
pub mod target;
pub mod telemetry;

pub use backend::{Backend, BackendError};
pub use context::{Identity, PathIds, QueryParams, QueryValue, RequestContext, FIELDS_PARAM};
pub use dispatch::{select, Operation};
pub use error::GatewayError;
pub use executor::execute;
pub use gateway::Gateway;
pub use registry::{Registered, Registry, RegistryBuilder, RegistryError};
pub use resolver::{resolve_next, resolve_path, split_path};
pub use resource::ResourceType;
pub use response::{Response, ResponseBody};
pub use target::{DispatchTarget, TargetKind};
