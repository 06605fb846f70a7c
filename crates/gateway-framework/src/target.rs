//! # Dispatch Targets
//!
//! A [`DispatchTarget`] is where the path resolver currently stands: before any
//! segment (`Root`), on a collection (`/ports`), or on an item (`/ports/abc123`).
//! Targets are plain values created fresh for every resolution step. They carry no
//! backend handle and no behavior beyond accessors.

use crate::context::PathIds;
use crate::resource::ResourceType;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchTarget {
    Root,
    Collection {
        resource: ResourceType,
        parents: PathIds,
    },
    Item {
        resource: ResourceType,
        id: String,
        parents: PathIds,
    },
}

/// The shape of a target, without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Root,
    Collection,
    Item,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetKind::Root => "root",
            TargetKind::Collection => "collection",
            TargetKind::Item => "item",
        };
        f.write_str(name)
    }
}

impl DispatchTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            DispatchTarget::Root => TargetKind::Root,
            DispatchTarget::Collection { .. } => TargetKind::Collection,
            DispatchTarget::Item { .. } => TargetKind::Item,
        }
    }

    pub fn resource(&self) -> Option<&ResourceType> {
        match self {
            DispatchTarget::Root => None,
            DispatchTarget::Collection { resource, .. } | DispatchTarget::Item { resource, .. } => {
                Some(resource)
            }
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            DispatchTarget::Item { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Identifiers of the enclosing items, e.g. `network_id` for `/networks/n1/ports`.
    pub fn parents(&self) -> Option<&PathIds> {
        match self {
            DispatchTarget::Root => None,
            DispatchTarget::Collection { parents, .. } | DispatchTarget::Item { parents, .. } => {
                Some(parents)
            }
        }
    }
}
