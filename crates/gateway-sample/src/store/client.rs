use super::message::{Reply, StoreRequest};
use super::record::{self, Record};
use async_trait::async_trait;
use gateway_framework::{Backend, BackendError, Identity, QueryParams, ResourceType};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

const OWNER_FIELD: &str = "project_id";

/// [`Backend`] implementation that forwards every call to a [`StoreActor`](super::StoreActor).
///
/// The client unwraps request envelopes, stamps the caller's project on new
/// records and then hands the bare records to the actor. It holds only a sender,
/// so cloning is cheap.
#[derive(Clone)]
pub struct StoreClient {
    resource: ResourceType,
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub(crate) fn new(resource: ResourceType, sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { resource, sender }
    }

    async fn call<T>(
        &self,
        request: impl FnOnce(Reply<T>) -> StoreRequest,
    ) -> Result<T, BackendError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(request(respond_to)).await.map_err(|_| {
            BackendError::Unavailable(format!("{} store is closed", self.resource))
        })?;
        response.await.map_err(|_| {
            BackendError::Unavailable(format!("{} store dropped the request", self.resource))
        })?
    }
}

fn stamp_owner(identity: &Identity, record: &mut Record) {
    if let Some(project_id) = &identity.project_id {
        if !record.contains_key(OWNER_FIELD) {
            record.insert(OWNER_FIELD.to_string(), Value::String(project_id.clone()));
        }
    }
}

#[async_trait]
impl Backend for StoreClient {
    async fn list(
        &self,
        _identity: &Identity,
        params: &QueryParams,
    ) -> Result<Vec<Value>, BackendError> {
        let params = params.clone();
        self.call(|respond_to| StoreRequest::List { params, respond_to })
            .await
    }

    async fn show(
        &self,
        _identity: &Identity,
        id: &str,
        fields: Option<&[String]>,
    ) -> Result<Value, BackendError> {
        let id = id.to_string();
        let fields = fields.map(<[String]>::to_vec);
        self.call(|respond_to| StoreRequest::Show {
            id,
            fields,
            respond_to,
        })
        .await
    }

    async fn create(&self, identity: &Identity, body: Value) -> Result<Value, BackendError> {
        let mut record = record::unwrap_envelope(body, self.resource.singular())?;
        stamp_owner(identity, &mut record);
        self.call(|respond_to| StoreRequest::Create { record, respond_to })
            .await
    }

    async fn create_bulk(
        &self,
        identity: &Identity,
        body: Value,
    ) -> Result<Vec<Value>, BackendError> {
        let mut records =
            record::unwrap_bulk(body, self.resource.plural(), self.resource.singular())?;
        for record in &mut records {
            stamp_owner(identity, record);
        }
        debug!(collection = %self.resource, count = records.len(), "Sending bulk create");
        self.call(|respond_to| StoreRequest::CreateBulk {
            records,
            respond_to,
        })
        .await
    }

    async fn update(
        &self,
        _identity: &Identity,
        id: &str,
        body: Value,
    ) -> Result<Value, BackendError> {
        let changes = record::unwrap_envelope(body, self.resource.singular())?;
        let id = id.to_string();
        self.call(|respond_to| StoreRequest::Update {
            id,
            changes,
            respond_to,
        })
        .await
    }

    async fn delete(&self, _identity: &Identity, id: &str) -> Result<(), BackendError> {
        let id = id.to_string();
        self.call(|respond_to| StoreRequest::Delete { id, respond_to })
            .await
    }
}
