//! # Resource Types
//!
//! A [`ResourceType`] names one kind of resource twice: once in the singular
//! (`port`, used for item payload keys and path identifiers) and once in the plural
//! (`ports`, used for collection paths, backend lookup and collection payload keys).

use std::fmt;
use std::sync::Arc;

/// Immutable `{singular, plural}` name pair for a resource kind.
///
/// Both names are used as dictionary keys for the lifetime of the process, so the
/// pair is cheap to clone and never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceType {
    singular: Arc<str>,
    plural: Arc<str>,
}

impl ResourceType {
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        let singular: String = singular.into();
        let plural: String = plural.into();
        Self {
            singular: Arc::from(singular),
            plural: Arc::from(plural),
        }
    }

    /// Item-level name, e.g. `port`.
    pub fn singular(&self) -> &str {
        &self.singular
    }

    /// Collection-level name, e.g. `ports`.
    pub fn plural(&self) -> &str {
        &self.plural
    }

    /// Key under which an item id of this type is recorded in the path identifiers
    /// (`port_id`).
    pub fn id_key(&self) -> String {
        format!("{}_id", self.singular)
    }

    pub fn is_distinct(&self) -> bool {
        self.singular != self.plural
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plural)
    }
}
