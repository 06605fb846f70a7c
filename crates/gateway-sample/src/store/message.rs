//! # Store Messages
//!
//! Requests sent from a [`StoreClient`](super::StoreClient) to its
//! [`StoreActor`](super::StoreActor). One variant per backend operation; each carries
//! a oneshot sender for the reply. Payloads arrive already unwrapped from their
//! `{"port": {...}}` envelopes.

use super::record::Record;
use gateway_framework::{BackendError, QueryParams};
use serde_json::Value;
use tokio::sync::oneshot;

/// One-shot reply channel used by store actors.
pub type Reply<T> = oneshot::Sender<Result<T, BackendError>>;

#[derive(Debug)]
pub enum StoreRequest {
    List {
        params: QueryParams,
        respond_to: Reply<Vec<Value>>,
    },
    Show {
        id: String,
        fields: Option<Vec<String>>,
        respond_to: Reply<Value>,
    },
    Create {
        record: Record,
        respond_to: Reply<Value>,
    },
    CreateBulk {
        records: Vec<Record>,
        respond_to: Reply<Vec<Value>>,
    },
    Update {
        id: String,
        changes: Record,
        respond_to: Reply<Value>,
    },
    Delete {
        id: String,
        respond_to: Reply<()>,
    },
}
