//! # Gateway Sample
//!
//! Runs a scripted session against the sample gateway.
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run -p gateway-sample
//! GATEWAY_CONFIG=gateway.toml cargo run -p gateway-sample
//! ```
//!
//! The session creates a network, bulk-creates two ports on it, lists and shows them,
//! updates one, deletes the other, and finally sends a request for an unknown
//! collection (404) and one with an unsupported method (405).

use gateway_framework::telemetry::setup_tracing_with;
use gateway_framework::{
    split_path, Identity, QueryParams, RequestContext, Response, ResponseBody,
};
use gateway_sample::config::GatewayConfig;
use gateway_sample::lifecycle::GatewaySystem;
use http::Method;
use serde_json::{json, Value};
use std::error::Error;
use tracing::{error, info, Instrument};

/// One scripted request.
struct Step {
    name: &'static str,
    method: Method,
    path: String,
    query: QueryParams,
    resources: Vec<Value>,
}

impl Step {
    fn new(name: &'static str, method: Method, path: impl Into<String>) -> Self {
        Self {
            name,
            method,
            path: path.into(),
            query: QueryParams::new(),
            resources: Vec::new(),
        }
    }

    fn query(mut self, name: &str, value: &str) -> Self {
        self.query.insert(name, value);
        self
    }

    fn resources(mut self, resources: Vec<Value>) -> Self {
        self.resources = resources;
        self
    }
}

async fn run_step(system: &GatewaySystem, identity: &Identity, step: Step) -> Option<Response> {
    let span = tracing::info_span!("step", name = step.name);
    async {
        let mut ctx = RequestContext::new(identity.clone())
            .with_query(step.query)
            .with_resources(step.resources);
        let segments = split_path(&step.path);
        match system.gateway.respond(&segments, &step.method, &mut ctx).await {
            Ok(response) => {
                let body = response
                    .body()
                    .cloned()
                    .map(ResponseBody::into_json)
                    .unwrap_or(Value::Null);
                info!(status = %response.status(), %body, "Response");
                Some(response)
            }
            Err(e) => {
                error!(status = %e.status(), error = %e, "Backend error");
                None
            }
        }
    }
    .instrument(span)
    .await
}

fn created_id(response: Option<&Response>) -> Option<String> {
    response?
        .body()?
        .value()
        .get("id")?
        .as_str()
        .map(str::to_owned)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = GatewayConfig::from_env()?;
    setup_tracing_with(&config.logging.filter);

    info!("Starting gateway sample");
    let system = GatewaySystem::start(&config)?;
    let identity = Identity::new("demo-user", "demo-project");

    let network = run_step(
        &system,
        &identity,
        Step::new("create_network", Method::POST, "/networks")
            .resources(vec![json!({"name": "private"})]),
    )
    .await;
    let network_id = created_id(network.as_ref()).unwrap_or_default();

    run_step(
        &system,
        &identity,
        Step::new("bulk_create_ports", Method::POST, "/ports").resources(vec![
            json!({"name": "web", "network_id": network_id}),
            json!({"name": "db", "network_id": network_id}),
        ]),
    )
    .await;

    run_step(
        &system,
        &identity,
        Step::new("list_ports", Method::GET, "/ports").query("network_id", &network_id),
    )
    .await;

    run_step(
        &system,
        &identity,
        Step::new("show_port", Method::GET, "/ports/port-1")
            .query("fields", "id")
            .query("fields", "name"),
    )
    .await;

    run_step(
        &system,
        &identity,
        Step::new("update_port", Method::PUT, "/ports/port-1")
            .resources(vec![json!({"name": "frontend"})]),
    )
    .await;

    run_step(
        &system,
        &identity,
        Step::new("delete_port", Method::DELETE, "/ports/port-2"),
    )
    .await;

    run_step(
        &system,
        &identity,
        Step::new("unknown_collection", Method::GET, "/widgets"),
    )
    .await;

    run_step(
        &system,
        &identity,
        Step::new("unsupported_method", Method::PATCH, "/ports/port-1"),
    )
    .await;

    system.shutdown().await?;

    info!("Gateway sample completed");
    Ok(())
}
