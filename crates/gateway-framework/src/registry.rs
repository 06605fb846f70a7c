//! # Backend Registry
//!
//! Maps a collection name (`ports`) to the [`ResourceType`] it names and the
//! [`Backend`] that serves it. The registry is built once at start-up with
//! [`Registry::builder`] and is immutable afterwards, so lookups are plain reads that
//! any number of in-flight requests can perform concurrently.
//!
//! There is no global instance. The registry is handed to the
//! [`Gateway`](crate::gateway::Gateway) by `Arc`, and tests build their own with fake
//! backends.

use crate::backend::Backend;
use crate::resource::ResourceType;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Errors raised while building a registry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Collection already registered: {0}")]
    Duplicate(String),
    #[error("Resource type {0} needs distinct singular and plural names")]
    IndistinctNames(String),
}

/// A registered resource type together with its backend.
#[derive(Clone)]
pub struct Registered {
    resource: ResourceType,
    backend: Arc<dyn Backend>,
}

impl Registered {
    pub fn resource(&self) -> &ResourceType {
        &self.resource
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }
}

impl fmt::Debug for Registered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registered")
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}

/// Collects registrations before freezing them into a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    entries: HashMap<String, Registered>,
}

impl RegistryBuilder {
    pub fn register(
        mut self,
        resource: ResourceType,
        backend: Arc<dyn Backend>,
    ) -> Result<Self, RegistryError> {
        if !resource.is_distinct() {
            return Err(RegistryError::IndistinctNames(resource.plural().to_string()));
        }
        if self.entries.contains_key(resource.plural()) {
            return Err(RegistryError::Duplicate(resource.plural().to_string()));
        }
        debug!(collection = %resource, "Registered backend");
        self.entries.insert(
            resource.plural().to_string(),
            Registered { resource, backend },
        );
        Ok(self)
    }

    pub fn build(self) -> Registry {
        Registry {
            entries: self.entries,
        }
    }
}

/// Read-only lookup from collection name to backend.
pub struct Registry {
    entries: HashMap<String, Registered>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Side-effect-free lookup by collection (plural) name.
    pub fn resolve(&self, collection: &str) -> Option<&Registered> {
        self.entries.get(collection)
    }

    /// Registered collection names, sorted.
    pub fn collections(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("collections", &self.collections())
            .finish()
    }
}
