//! # Mock Backend & Testing Guide
//!
//! [`MockBackend`] implements [`Backend`] entirely in memory. Queue the responses you
//! want with the fluent `expect_*` builders, route requests through the gateway, then
//! assert on what was called with [`MockBackend::calls`] and on what was left unused
//! with [`MockBackend::verify`].
//!
//! ## When to use the mock vs a real backend
//!
//! | Feature | MockBackend | Real backend |
//! |---------|-------------|--------------|
//! | **Speed** | Instant | Depends on the backend |
//! | **Determinism** | 100% deterministic | Subject to backend state |
//! | **Call recording** | Every call with its arguments | None |
//! | **Error Injection** | Easy (`return_err`) | Requires specific state |
//!
//! ## Example
//!
//! ```rust
//! use gateway_framework::mock::{BackendCall, MockBackend};
//! use gateway_framework::{Gateway, Identity, Registry, RequestContext, ResourceType};
//! use http::Method;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ports = Arc::new(MockBackend::new());
//!     ports.expect_list().return_ok(vec![json!({"id": "p1"})]);
//!
//!     let registry = Registry::builder()
//!         .register(ResourceType::new("port", "ports"), ports.clone())
//!         .unwrap()
//!         .build();
//!     let gateway = Gateway::new(Arc::new(registry));
//!
//!     let mut ctx = RequestContext::new(Identity::new("user-1", "project-1"));
//!     let response = gateway.handle(&["ports"], &Method::GET, &mut ctx).await.unwrap();
//!
//!     assert_eq!(response.body().unwrap().key(), "ports");
//!     assert!(matches!(ports.calls()[0], BackendCall::List { .. }));
//!     ports.verify();
//! }
//! ```
//!
//! A call that arrives with no matching expectation at the front of the queue
//! panics, which fails the test at the point of the unexpected call.

use crate::backend::{Backend, BackendError};
use crate::context::{Identity, QueryParams};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// =============================================================================
// RECORDED CALLS
// =============================================================================

/// A backend call as the mock received it.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    List {
        identity: Identity,
        params: QueryParams,
    },
    Show {
        identity: Identity,
        id: String,
        fields: Option<Vec<String>>,
    },
    Create {
        identity: Identity,
        body: Value,
    },
    CreateBulk {
        identity: Identity,
        body: Value,
    },
    Update {
        identity: Identity,
        id: String,
        body: Value,
    },
    Delete {
        identity: Identity,
        id: String,
    },
}

impl BackendCall {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCall::List { .. } => "list",
            BackendCall::Show { .. } => "show",
            BackendCall::Create { .. } => "create",
            BackendCall::CreateBulk { .. } => "create_bulk",
            BackendCall::Update { .. } => "update",
            BackendCall::Delete { .. } => "delete",
        }
    }
}

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// A queued response, consumed by the next call of the same kind.
enum Expectation {
    List(Result<Vec<Value>, BackendError>),
    Show(Result<Value, BackendError>),
    Create(Result<Value, BackendError>),
    CreateBulk(Result<Vec<Value>, BackendError>),
    Update(Result<Value, BackendError>),
    Delete(Result<(), BackendError>),
}

type Queue = Arc<Mutex<VecDeque<Expectation>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builder returned by every `expect_*` method.
pub struct ExpectationBuilder<T> {
    queue: Queue,
    wrap: fn(Result<T, BackendError>) -> Expectation,
}

impl<T> ExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        lock(&self.queue).push_back((self.wrap)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: BackendError) {
        lock(&self.queue).push_back((self.wrap)(Err(error)));
    }
}

/// A scriptable, call-recording [`Backend`].
#[derive(Default)]
pub struct MockBackend {
    expectations: Queue,
    calls: Mutex<Vec<BackendCall>>,
}

impl MockBackend {
    /// Creates a mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    fn builder<T>(&self, wrap: fn(Result<T, BackendError>) -> Expectation) -> ExpectationBuilder<T> {
        ExpectationBuilder {
            queue: self.expectations.clone(),
            wrap,
        }
    }

    pub fn expect_list(&self) -> ExpectationBuilder<Vec<Value>> {
        self.builder(Expectation::List)
    }

    pub fn expect_show(&self) -> ExpectationBuilder<Value> {
        self.builder(Expectation::Show)
    }

    pub fn expect_create(&self) -> ExpectationBuilder<Value> {
        self.builder(Expectation::Create)
    }

    pub fn expect_create_bulk(&self) -> ExpectationBuilder<Vec<Value>> {
        self.builder(Expectation::CreateBulk)
    }

    pub fn expect_update(&self) -> ExpectationBuilder<Value> {
        self.builder(Expectation::Update)
    }

    pub fn expect_delete(&self) -> ExpectationBuilder<()> {
        self.builder(Expectation::Delete)
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn record(&self, call: BackendCall) -> Expectation {
        let name = call.name();
        lock(&self.calls).push(call);
        let next = lock(&self.expectations).pop_front();
        match next {
            Some(expectation) => expectation,
            None => panic!("Unexpected {} call: no expectation queued", name),
        }
    }
}

fn mismatch(call: &str) -> ! {
    panic!("Unexpected {} call: expectation mismatch", call)
}

#[async_trait]
impl Backend for MockBackend {
    async fn list(
        &self,
        identity: &Identity,
        params: &QueryParams,
    ) -> Result<Vec<Value>, BackendError> {
        let call = BackendCall::List {
            identity: identity.clone(),
            params: params.clone(),
        };
        match self.record(call) {
            Expectation::List(response) => response,
            _ => mismatch("list"),
        }
    }

    async fn show(
        &self,
        identity: &Identity,
        id: &str,
        fields: Option<&[String]>,
    ) -> Result<Value, BackendError> {
        let call = BackendCall::Show {
            identity: identity.clone(),
            id: id.to_string(),
            fields: fields.map(<[String]>::to_vec),
        };
        match self.record(call) {
            Expectation::Show(response) => response,
            _ => mismatch("show"),
        }
    }

    async fn create(&self, identity: &Identity, body: Value) -> Result<Value, BackendError> {
        let call = BackendCall::Create {
            identity: identity.clone(),
            body,
        };
        match self.record(call) {
            Expectation::Create(response) => response,
            _ => mismatch("create"),
        }
    }

    async fn create_bulk(
        &self,
        identity: &Identity,
        body: Value,
    ) -> Result<Vec<Value>, BackendError> {
        let call = BackendCall::CreateBulk {
            identity: identity.clone(),
            body,
        };
        match self.record(call) {
            Expectation::CreateBulk(response) => response,
            _ => mismatch("create_bulk"),
        }
    }

    async fn update(
        &self,
        identity: &Identity,
        id: &str,
        body: Value,
    ) -> Result<Value, BackendError> {
        let call = BackendCall::Update {
            identity: identity.clone(),
            id: id.to_string(),
            body,
        };
        match self.record(call) {
            Expectation::Update(response) => response,
            _ => mismatch("update"),
        }
    }

    async fn delete(&self, identity: &Identity, id: &str) -> Result<(), BackendError> {
        let call = BackendCall::Delete {
            identity: identity.clone(),
            id: id.to_string(),
        };
        match self.record(call) {
            Expectation::Delete(response) => response,
            _ => mismatch("delete"),
        }
    }
}
