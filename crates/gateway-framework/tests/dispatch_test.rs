use gateway_framework::mock::{BackendCall, MockBackend};
use gateway_framework::{
    resolve_path, select, split_path, BackendError, DispatchTarget, Gateway, GatewayError,
    Identity, QueryParams, Registry, RequestContext, ResourceType, TargetKind,
};
use http::{Method, StatusCode};
use serde_json::json;
use std::sync::Arc;

// --- Fixtures ---

struct Fixture {
    gateway: Gateway,
    networks: Arc<MockBackend>,
    ports: Arc<MockBackend>,
}

fn fixture() -> Fixture {
    let networks = Arc::new(MockBackend::new());
    let ports = Arc::new(MockBackend::new());
    let registry = Registry::builder()
        .register(ResourceType::new("network", "networks"), networks.clone())
        .unwrap()
        .register(ResourceType::new("port", "ports"), ports.clone())
        .unwrap()
        .build();
    Fixture {
        gateway: Gateway::new(Arc::new(registry)),
        networks,
        ports,
    }
}

fn identity() -> Identity {
    Identity::new("user-1", "project-1")
}

fn ctx() -> RequestContext {
    RequestContext::new(identity())
}

// --- Scenarios ---

#[tokio::test]
async fn test_list_collection() {
    let f = fixture();
    f.ports
        .expect_list()
        .return_ok(vec![json!({"id": "p1"}), json!({"id": "p2"})]);

    let mut query = QueryParams::new();
    query.insert("status", "ACTIVE");
    let mut ctx = ctx().with_query(query.clone());

    let response = f
        .gateway
        .handle(&["ports"], &Method::GET, &mut ctx)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.into_body().unwrap().into_json(),
        json!({"ports": [{"id": "p1"}, {"id": "p2"}]})
    );
    assert_eq!(
        f.ports.calls(),
        vec![BackendCall::List {
            identity: identity(),
            params: query
        }]
    );
    assert_eq!(ctx.collection(), Some("ports"));
    f.ports.verify();
}

#[tokio::test]
async fn test_delete_item_has_no_body() {
    let f = fixture();
    f.ports.expect_delete().return_ok(());
    let mut ctx = ctx();

    let response = f
        .gateway
        .handle(&["ports", "abc123"], &Method::DELETE, &mut ctx)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.body().is_none());
    assert_eq!(
        f.ports.calls(),
        vec![BackendCall::Delete {
            identity: identity(),
            id: "abc123".into()
        }]
    );
    assert_eq!(ctx.resource_id(), Some("abc123"));
    assert_eq!(
        ctx.uri_identifiers().get("port_id").map(String::as_str),
        Some("abc123")
    );
}

#[tokio::test]
async fn test_unknown_collection_is_not_found() {
    let f = fixture();
    let mut ctx = ctx();

    let err = f
        .gateway
        .handle(&["widgets"], &Method::GET, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::NotFound { ref collection } if collection == "widgets"));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(ctx.collection(), None);
    assert_eq!(f.ports.call_count() + f.networks.call_count(), 0);
}

#[tokio::test]
async fn test_post_with_two_payloads_bulk_creates() {
    let f = fixture();
    f.ports
        .expect_create_bulk()
        .return_ok(vec![json!({"id": "p1"}), json!({"id": "p2"})]);
    let p1 = json!({"name": "web"});
    let p2 = json!({"name": "db"});
    let mut ctx = ctx().with_resources(vec![p1.clone(), p2.clone()]);

    let response = f
        .gateway
        .handle(&["ports"], &Method::POST, &mut ctx)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response.into_body().unwrap();
    assert_eq!(body.key(), "ports");
    assert_eq!(body.value(), &json!([{"id": "p1"}, {"id": "p2"}]));
    assert_eq!(
        f.ports.calls(),
        vec![BackendCall::CreateBulk {
            identity: identity(),
            body: json!({"ports": [{"port": p1}, {"port": p2}]})
        }]
    );
}

#[tokio::test]
async fn test_update_uses_first_payload_only() {
    let f = fixture();
    f.ports
        .expect_update()
        .return_ok(json!({"id": "abc123", "name": "web"}));
    let p1 = json!({"name": "web"});
    let p2 = json!({"name": "ignored"});
    let mut ctx = ctx().with_resources(vec![p1.clone(), p2]);

    let response = f
        .gateway
        .handle(&["ports", "abc123"], &Method::PUT, &mut ctx)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body().unwrap().key(), "port");
    assert_eq!(
        f.ports.calls(),
        vec![BackendCall::Update {
            identity: identity(),
            id: "abc123".into(),
            body: json!({"port": p1})
        }]
    );
}

// --- Properties ---

#[tokio::test]
async fn test_collection_path_never_resolves_to_item() {
    let f = fixture();
    for name in f.gateway.registry().collections() {
        let mut ctx = ctx();
        let target = resolve_path(&[name], f.gateway.registry(), &mut ctx).unwrap();
        assert_eq!(target.kind(), TargetKind::Collection);
        assert_eq!(target.resource().unwrap().plural(), name);
    }
}

#[tokio::test]
async fn test_rejected_methods_never_reach_backend() {
    let f = fixture();
    let collection_rejects = [Method::HEAD, Method::PATCH, Method::PUT, Method::DELETE];
    let item_rejects = [Method::HEAD, Method::POST, Method::PATCH];

    for method in collection_rejects {
        let mut query = QueryParams::new();
        query.insert("name", "web");
        let mut ctx = ctx()
            .with_query(query)
            .with_resources(vec![json!({"name": "web"})]);
        let err = f
            .gateway
            .handle(&["ports"], &method, &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::MethodNotAllowed {
                kind: TargetKind::Collection,
                ..
            }
        ));
    }

    for method in item_rejects {
        let mut ctx = ctx().with_resources(vec![json!({"name": "web"})]);
        let err = f
            .gateway
            .handle(&["ports", "p1"], &method, &mut ctx)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    assert_eq!(f.ports.call_count(), 0);
}

#[test]
fn test_selection_is_idempotent() {
    let f = fixture();
    let segments = split_path("/networks/n1/ports/p1");
    for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
        let first = {
            let mut ctx = ctx();
            let target = resolve_path(&segments, f.gateway.registry(), &mut ctx).unwrap();
            select(&target, &method).ok()
        };
        let second = {
            let mut ctx = ctx();
            let target = resolve_path(&segments, f.gateway.registry(), &mut ctx).unwrap();
            select(&target, &method).ok()
        };
        assert_eq!(first, second);
    }
}

#[tokio::test]
async fn test_single_payload_creates_once() {
    let f = fixture();
    f.ports.expect_create().return_ok(json!({"id": "p1"}));
    let mut ctx = ctx().with_resources(vec![json!({"name": "web"})]);

    let response = f
        .gateway
        .handle(&["ports"], &Method::POST, &mut ctx)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.body().unwrap().key(), "port");
    let calls = f.ports.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0], BackendCall::Create { .. }));
}

#[tokio::test]
async fn test_many_payloads_bulk_create_once() {
    for n in 2..=5 {
        let f = fixture();
        f.ports.expect_create_bulk().return_ok(vec![]);
        let payloads = (0..n).map(|i| json!({"name": format!("p{i}")})).collect();
        let mut ctx = ctx().with_resources(payloads);

        f.gateway
            .handle(&["ports"], &Method::POST, &mut ctx)
            .await
            .unwrap();

        let calls = f.ports.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            BackendCall::CreateBulk { body, .. } => {
                assert_eq!(body["ports"].as_array().map(Vec::len), Some(n));
            }
            other => panic!("expected bulk create, got {other:?}"),
        }
    }
}

// --- Edge cases ---

#[tokio::test]
async fn test_missing_payload_is_rejected_before_backend() {
    let f = fixture();
    for (path, method) in [(vec!["ports"], Method::POST), (vec!["ports", "p1"], Method::PUT)] {
        let mut ctx = ctx();
        let err = f
            .gateway
            .handle(&path, &method, &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::MissingBody { .. }));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(f.ports.call_count(), 0);
}

#[tokio::test]
async fn test_nested_collection_inherits_parent_ids() {
    let f = fixture();
    f.ports.expect_show().return_ok(json!({"id": "p1"}));
    let mut ctx = ctx();

    let target = resolve_path(
        &["networks", "n1", "ports", "p1"],
        f.gateway.registry(),
        &mut ctx,
    )
    .unwrap();
    match &target {
        DispatchTarget::Item { id, parents, .. } => {
            assert_eq!(id, "p1");
            assert_eq!(parents.get("network_id").map(String::as_str), Some("n1"));
        }
        other => panic!("expected item, got {other:?}"),
    }
    assert_eq!(ctx.collection(), Some("ports"));
    assert_eq!(ctx.uri_identifiers().len(), 2);

    let mut ctx = RequestContext::new(identity());
    let response = f
        .gateway
        .handle(&["networks", "n1", "ports", "p1"], &Method::GET, &mut ctx)
        .await
        .unwrap();
    assert_eq!(response.body().unwrap().key(), "port");
    assert_eq!(f.networks.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_nested_collection_is_not_found() {
    let f = fixture();
    let mut ctx = ctx();
    let err = f
        .gateway
        .handle(&["networks", "n1", "widgets"], &Method::GET, &mut ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::NotFound { ref collection } if collection == "widgets"));
    assert_eq!(ctx.collection(), Some("networks"));
}

#[tokio::test]
async fn test_empty_path_names_no_resource() {
    let f = fixture();
    let segments = split_path("/");
    assert!(segments.is_empty());
    let mut ctx = ctx();
    let err = f
        .gateway
        .handle(&segments, &Method::GET, &mut ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::NoResource));
}

#[tokio::test]
async fn test_show_passes_fields_and_backend_errors() {
    let f = fixture();
    f.ports
        .expect_show()
        .return_err(BackendError::Unavailable("store closed".into()));
    let mut query = QueryParams::new();
    query.insert("fields", "id");
    query.insert("fields", "name");
    let mut ctx = ctx().with_query(query);

    let err = f
        .gateway
        .handle(&["ports", "p1"], &Method::GET, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GatewayError::Backend(BackendError::Unavailable(_))
    ));
    assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        f.ports.calls(),
        vec![BackendCall::Show {
            identity: identity(),
            id: "p1".into(),
            fields: Some(vec!["id".into(), "name".into()])
        }]
    );
}

#[tokio::test]
async fn test_nested_list_is_scoped_by_parent() {
    let f = fixture();
    f.ports.expect_list().return_ok(vec![]);
    let mut query = QueryParams::new();
    query.insert("network_id", "n2");
    query.insert("name", "web");
    let mut ctx = ctx().with_query(query);

    f.gateway
        .handle(&["networks", "n1", "ports"], &Method::GET, &mut ctx)
        .await
        .unwrap();

    let mut expected = QueryParams::new();
    expected.insert("name", "web");
    expected.insert("network_id", "n1");
    assert_eq!(
        f.ports.calls(),
        vec![BackendCall::List {
            identity: identity(),
            params: expected
        }]
    );
    assert_eq!(f.networks.call_count(), 0);
}

#[tokio::test]
async fn test_nested_create_and_update_carry_parent_id() {
    let f = fixture();
    f.ports.expect_create().return_ok(json!({"id": "p1"}));
    f.ports.expect_create_bulk().return_ok(vec![]);
    f.ports.expect_update().return_ok(json!({"id": "p1"}));

    let mut single = ctx().with_resources(vec![json!({"name": "web"})]);
    f.gateway
        .handle(&["networks", "n1", "ports"], &Method::POST, &mut single)
        .await
        .unwrap();

    let mut bulk = ctx().with_resources(vec![json!({"name": "a"}), json!({"name": "b"})]);
    f.gateway
        .handle(&["networks", "n1", "ports"], &Method::POST, &mut bulk)
        .await
        .unwrap();

    let mut update = ctx().with_resources(vec![json!({"network_id": "n2"})]);
    f.gateway
        .handle(&["networks", "n1", "ports", "p1"], &Method::PUT, &mut update)
        .await
        .unwrap();

    assert_eq!(
        f.ports.calls(),
        vec![
            BackendCall::Create {
                identity: identity(),
                body: json!({"port": {"name": "web", "network_id": "n1"}})
            },
            BackendCall::CreateBulk {
                identity: identity(),
                body: json!({"ports": [
                    {"port": {"name": "a", "network_id": "n1"}},
                    {"port": {"name": "b", "network_id": "n1"}}
                ]})
            },
            BackendCall::Update {
                identity: identity(),
                id: "p1".into(),
                body: json!({"port": {"network_id": "n1"}})
            },
        ]
    );
    f.ports.verify();
}
