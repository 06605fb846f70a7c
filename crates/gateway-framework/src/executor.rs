//! # Operation Executor
//!
//! Runs a selected [`Operation`] against the backend registered for the target's
//! resource type, using what the resolver and the collaborators left in the
//! [`RequestContext`].
//!
//! ## Payload shaping
//!
//! | Operation | Backend call                              | Response key |
//! |-----------|-------------------------------------------|--------------|
//! | list      | `list(identity, query)`                   | `ports`      |
//! | show      | `show(identity, id, fields)`              | `port`       |
//! | create ×1 | `create(identity, {"port": p})`           | `port`       |
//! | create ×N | `create_bulk(identity, {"ports": [{"port": p}, …]})` | `ports` |
//! | update    | `update(identity, id, {"port": first})`   | `port`       |
//! | delete    | `delete(identity, id)`                    | none (204)   |
//!
//! ## Nested collections
//!
//! Under a nested path (`/networks/n1/ports`) the parent identifiers scope the call:
//! `list` receives them as query parameters (`network_id=n1`), and every create or
//! update payload has them set as top-level fields. Path values replace whatever the
//! caller supplied for the same key.
//!
//! Backend errors are logged and returned unchanged inside
//! [`GatewayError::Backend`].

use crate::backend::BackendError;
use crate::context::{PathIds, QueryParams, RequestContext};
use crate::dispatch::Operation;
use crate::error::GatewayError;
use crate::registry::Registry;
use crate::resource::ResourceType;
use crate::response::{Response, ResponseBody};
use crate::target::DispatchTarget;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// How a collection POST is served, decided by the number of decoded payloads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CreatePlan<'a> {
    Single(&'a Value),
    Bulk(&'a [Value]),
}

impl<'a> CreatePlan<'a> {
    /// `None` when there is nothing to create.
    pub fn for_resources(resources: &'a [Value]) -> Option<Self> {
        match resources {
            [] => None,
            [single] => Some(CreatePlan::Single(single)),
            many => Some(CreatePlan::Bulk(many)),
        }
    }
}

/// Executes `operation` on `target`. Exactly one backend call is made on success
/// paths; none when the request lacks a required payload.
pub async fn execute(
    registry: &Registry,
    target: &DispatchTarget,
    operation: Operation,
    ctx: &RequestContext,
) -> Result<Response, GatewayError> {
    let resource = target.resource().ok_or(GatewayError::NoResource)?;
    let entry = registry
        .resolve(resource.plural())
        .ok_or_else(|| GatewayError::NotFound {
            collection: resource.plural().to_string(),
        })?;
    let backend = entry.backend();
    let identity = ctx.identity();
    let parents = target.parents().ok_or(GatewayError::NoResource)?;
    let failed = propagate(operation, resource);

    debug!(%operation, collection = %resource, id = ?target.id(), "Executing");

    let body = match operation {
        Operation::List => {
            let query = scoped_query(ctx.query(), parents);
            let items = backend.list(identity, &query).await.map_err(&failed)?;
            ResponseBody::new(resource.plural(), Value::Array(items))
        }
        Operation::Show => {
            let id = item_id(target)?;
            let fields = ctx.query().fields();
            let item = backend
                .show(identity, id, fields.as_deref())
                .await
                .map_err(&failed)?;
            ResponseBody::new(resource.singular(), item)
        }
        Operation::Create => {
            let plan = CreatePlan::for_resources(ctx.resources())
                .ok_or(GatewayError::MissingBody { operation })?;
            match plan {
                CreatePlan::Single(payload) => {
                    let data = wrap(resource.singular(), scoped(payload, parents));
                    let created = backend.create(identity, data).await.map_err(&failed)?;
                    ResponseBody::new(resource.singular(), created)
                }
                CreatePlan::Bulk(payloads) => {
                    debug!(count = payloads.len(), "Emulating bulk create");
                    let items = payloads
                        .iter()
                        .map(|p| wrap(resource.singular(), scoped(p, parents)))
                        .collect();
                    let data = wrap(resource.plural(), Value::Array(items));
                    let created = backend
                        .create_bulk(identity, data)
                        .await
                        .map_err(&failed)?;
                    ResponseBody::new(resource.plural(), Value::Array(created))
                }
            }
        }
        Operation::Update => {
            let id = item_id(target)?;
            let resources = ctx.resources();
            let first = resources
                .first()
                .ok_or(GatewayError::MissingBody { operation })?;
            if resources.len() > 1 {
                debug!(
                    discarded = resources.len() - 1,
                    "Bulk update not supported, using first resource only"
                );
            }
            let data = wrap(resource.singular(), scoped(first, parents));
            let updated = backend
                .update(identity, id, data)
                .await
                .map_err(&failed)?;
            ResponseBody::new(resource.singular(), updated)
        }
        Operation::Delete => {
            let id = item_id(target)?;
            backend.delete(identity, id).await.map_err(&failed)?;
            info!(%operation, collection = %resource, id, "Completed");
            return Ok(Response::empty(operation.success_status()));
        }
    };

    info!(%operation, collection = %resource, id = ?target.id(), "Completed");
    Ok(Response::with_body(operation.success_status(), body))
}

fn item_id(target: &DispatchTarget) -> Result<&str, GatewayError> {
    target.id().ok_or(GatewayError::NoResource)
}

fn scoped_query(query: &QueryParams, parents: &PathIds) -> QueryParams {
    let mut query = query.clone();
    for (key, id) in parents {
        query.set(key.as_str(), id.as_str());
    }
    query
}

/// Sets the parent identifiers on an object payload. Anything else is passed
/// through for the backend to reject.
fn scoped(payload: &Value, parents: &PathIds) -> Value {
    let mut payload = payload.clone();
    if let Value::Object(fields) = &mut payload {
        for (key, id) in parents {
            fields.insert(key.clone(), Value::String(id.clone()));
        }
    }
    payload
}

fn wrap(key: &str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(key.to_string(), value);
    Value::Object(map)
}

fn propagate(
    operation: Operation,
    resource: &ResourceType,
) -> impl Fn(BackendError) -> GatewayError + '_ {
    move |error| {
        warn!(%operation, collection = %resource, %error, "Backend call failed");
        GatewayError::Backend(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Identity;
    use crate::mock::MockBackend;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_create_plan_by_payload_count() {
        let none: Vec<Value> = vec![];
        assert_eq!(CreatePlan::for_resources(&none), None);

        let one = vec![json!({"name": "a"})];
        assert_eq!(
            CreatePlan::for_resources(&one),
            Some(CreatePlan::Single(&one[0]))
        );

        let two = vec![json!({"name": "a"}), json!({"name": "b"})];
        assert!(matches!(
            CreatePlan::for_resources(&two),
            Some(CreatePlan::Bulk(items)) if items.len() == 2
        ));
    }

    #[test]
    fn test_parent_ids_scope_query_and_payload() {
        let parents: PathIds = [("network_id".to_string(), "n1".to_string())].into();

        let mut query = QueryParams::new();
        query.insert("network_id", "n2");
        query.insert("name", "web");
        let scoped_list = scoped_query(&query, &parents);
        assert!(scoped_list.get("network_id").unwrap().contains("n1"));
        assert!(!scoped_list.get("network_id").unwrap().contains("n2"));
        assert!(scoped_list.get("name").unwrap().contains("web"));

        assert_eq!(
            scoped(&json!({"name": "web", "network_id": "n2"}), &parents),
            json!({"name": "web", "network_id": "n1"})
        );
        assert_eq!(scoped(&json!("web"), &parents), json!("web"));
    }

    #[tokio::test]
    async fn test_item_operation_on_collection_names_no_resource() {
        let ports = ResourceType::new("port", "ports");
        let backend = Arc::new(MockBackend::new());
        let registry = Registry::builder()
            .register(ports.clone(), backend.clone())
            .unwrap()
            .build();
        let target = DispatchTarget::Collection {
            resource: ports,
            parents: PathIds::new(),
        };
        let ctx = RequestContext::new(Identity::anonymous());

        for operation in [Operation::Show, Operation::Delete] {
            let err = execute(&registry, &target, operation, &ctx)
                .await
                .unwrap_err();
            assert!(matches!(err, GatewayError::NoResource));
        }
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_wrap_single_key() {
        assert_eq!(wrap("port", json!({"a": 1})), json!({"port": {"a": 1}}));
    }
}
