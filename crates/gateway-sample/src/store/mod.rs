//! # Store Actors
//!
//! The sample backend: one actor per resource type, each owning an in-memory map
//! of records, reached through a [`StoreClient`] that implements
//! [`Backend`](gateway_framework::Backend).
//!
//! ```text
//! Gateway ──▶ StoreClient ──mpsc──▶ StoreActor (records)
//!                  ▲                      │
//!                  └──────oneshot─────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use gateway_framework::{Backend, Identity, ResourceType};
//! use gateway_sample::store;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = store::new(ResourceType::new("port", "ports"), 8);
//!     let handle = tokio::spawn(actor.run());
//!
//!     let identity = Identity::new("user-1", "project-1");
//!     let created = client
//!         .create(&identity, json!({"port": {"name": "web"}}))
//!         .await
//!         .unwrap();
//!     assert_eq!(created["id"], "port-1");
//!     assert_eq!(created["project_id"], "project-1");
//!
//!     drop(client);
//!     handle.await.unwrap();
//! }
//! ```

mod actor;
mod client;
mod message;
pub mod record;

pub use actor::StoreActor;
pub use client::StoreClient;
pub use message::{Reply, StoreRequest};

use gateway_framework::ResourceType;
use tokio::sync::mpsc;

/// Creates a store actor and its client.
///
/// `buffer_size` is the capacity of the request channel; callers wait when it is full.
pub fn new(resource: ResourceType, buffer_size: usize) -> (StoreActor, StoreClient) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let actor = StoreActor::new(resource.clone(), receiver);
    let client = StoreClient::new(resource, sender);
    (actor, client)
}
