use super::message::StoreRequest;
use super::record::{self, Record, ID_FIELD};
use gateway_framework::{BackendError, QueryParams, ResourceType};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The in-memory store for one resource type.
///
/// # Architecture Note
/// This struct is the "Server" half of a store. It owns the records and the receiver
/// end of the channel, and processes requests one at a time, so the records need no
/// lock. Records are kept in id order, which is the order `list` returns them in.
///
/// Ids are `"<singular>-<n>"` from a per-store counter unless the payload supplies
/// its own `id`.
pub struct StoreActor {
    resource: ResourceType,
    receiver: mpsc::Receiver<StoreRequest>,
    store: BTreeMap<String, Record>,
    next_id: u64,
}

impl StoreActor {
    pub(crate) fn new(resource: ResourceType, receiver: mpsc::Receiver<StoreRequest>) -> Self {
        Self {
            resource,
            receiver,
            store: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Runs the store's event loop until every client has been dropped.
    pub async fn run(mut self) {
        let collection = self.resource.clone();
        info!(%collection, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::List { params, respond_to } => {
                    let items = self.list(&params);
                    debug!(%collection, ?params, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                StoreRequest::Show {
                    id,
                    fields,
                    respond_to,
                } => {
                    let result = match self.store.get(&id) {
                        Some(found) => Ok(shape(found, fields.as_deref())),
                        None => {
                            warn!(%collection, %id, "Not found");
                            Err(not_found(&collection, &id))
                        }
                    };
                    debug!(%collection, %id, found = result.is_ok(), "Show");
                    let _ = respond_to.send(result);
                }
                StoreRequest::Create { record, respond_to } => {
                    debug!(%collection, ?record, "Create");
                    let result = self.create(vec![record]).map(|mut created| {
                        created.pop().unwrap_or(Value::Null)
                    });
                    match &result {
                        Ok(_) => info!(%collection, size = self.store.len(), "Created"),
                        Err(e) => warn!(%collection, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::CreateBulk {
                    records,
                    respond_to,
                } => {
                    let count = records.len();
                    debug!(%collection, count, "Create bulk");
                    let result = self.create(records);
                    match &result {
                        Ok(_) => info!(%collection, count, size = self.store.len(), "Created"),
                        Err(e) => warn!(%collection, count, error = %e, "Bulk create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Update {
                    id,
                    changes,
                    respond_to,
                } => {
                    debug!(%collection, %id, ?changes, "Update");
                    let result = self.update(&id, changes);
                    match &result {
                        Ok(_) => info!(%collection, %id, "Updated"),
                        Err(e) => warn!(%collection, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Delete { id, respond_to } => {
                    debug!(%collection, %id, "Delete");
                    if self.store.remove(&id).is_some() {
                        info!(%collection, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(%collection, %id, "Not found");
                        let _ = respond_to.send(Err(not_found(&collection, &id)));
                    }
                }
            }
        }

        info!(%collection, size = self.store.len(), "Shutdown");
    }

    fn list(&self, params: &QueryParams) -> Vec<Value> {
        let fields = params.fields();
        self.store
            .values()
            .filter(|r| record::matches(r, params))
            .map(|r| shape(r, fields.as_deref()))
            .collect()
    }

    /// Inserts every record or none. Ids are checked against the store and against
    /// each other before anything is written.
    fn create(&mut self, records: Vec<Record>) -> Result<Vec<Value>, BackendError> {
        let mut counter = self.next_id;
        let mut claimed = HashSet::new();
        let mut prepared = Vec::with_capacity(records.len());

        for mut record in records {
            let id = match record::record_id(&record)?.map(str::to_owned) {
                Some(id) => {
                    if self.store.contains_key(&id) || claimed.contains(&id) {
                        return Err(BackendError::Conflict(format!(
                            "{} {} already exists",
                            self.resource.singular(),
                            id
                        )));
                    }
                    id
                }
                None => self.allocate(&mut counter, &claimed),
            };
            record.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            claimed.insert(id.clone());
            prepared.push((id, record));
        }

        self.next_id = counter;
        Ok(prepared
            .into_iter()
            .map(|(id, record)| {
                let created = Value::Object(record.clone());
                self.store.insert(id, record);
                created
            })
            .collect())
    }

    fn allocate(&self, counter: &mut u64, claimed: &HashSet<String>) -> String {
        loop {
            let id = format!("{}-{}", self.resource.singular(), counter);
            *counter += 1;
            if !self.store.contains_key(&id) && !claimed.contains(&id) {
                return id;
            }
        }
    }

    fn update(&mut self, id: &str, changes: Record) -> Result<Value, BackendError> {
        if let Some(new_id) = record::record_id(&changes)? {
            if new_id != id {
                return Err(BackendError::Invalid(format!(
                    "id of {} {} cannot be changed",
                    self.resource.singular(),
                    id
                )));
            }
        }
        let Some(existing) = self.store.get_mut(id) else {
            return Err(not_found(&self.resource, id));
        };
        record::merge(existing, changes);
        Ok(Value::Object(existing.clone()))
    }
}

fn shape(record: &Record, fields: Option<&[String]>) -> Value {
    match fields {
        Some(fields) => record::project(record, fields),
        None => Value::Object(record.clone()),
    }
}

fn not_found(resource: &ResourceType, id: &str) -> BackendError {
    BackendError::NotFound(format!("{} {}", resource.singular(), id))
}
