//! # Path Resolver
//!
//! Walks the request path one segment at a time. Each step is the pure function
//! [`resolve_next`]: given the current [`DispatchTarget`] and the next segment it
//! returns the next target and how many segments it consumed.
//!
//! | Standing on  | Next segment is       | Produces                       |
//! |--------------|-----------------------|--------------------------------|
//! | `Root`       | a collection name     | `Collection` (or 404)          |
//! | `Collection` | an item id            | `Item`                         |
//! | `Item`       | a nested collection   | `Collection` (or 404)          |
//!
//! Segments are opaque strings. An id that the backend will later reject is still
//! resolved here; id-format errors are the backend's to report.

use crate::context::{PathIds, RequestContext};
use crate::error::GatewayError;
use crate::registry::Registry;
use crate::target::DispatchTarget;
use tracing::{debug, warn};

/// Every resolution step consumes exactly one segment.
const SEGMENTS_PER_STEP: usize = 1;

/// Splits a raw path into segments, dropping empty ones (`/ports//x/` → `["ports", "x"]`).
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Resolves one segment against `current`.
///
/// Side effects on `ctx`:
/// - a collection step records the collection name,
/// - an item step records `"<singular>_id" -> id` and the resolved item id.
pub fn resolve_next(
    current: &DispatchTarget,
    segment: &str,
    registry: &Registry,
    ctx: &mut RequestContext,
) -> Result<(DispatchTarget, usize), GatewayError> {
    let next = match current {
        DispatchTarget::Root => lookup_collection(segment, PathIds::new(), registry, ctx)?,
        DispatchTarget::Collection { resource, parents } => {
            ctx.record_item(resource, segment);
            DispatchTarget::Item {
                resource: resource.clone(),
                id: segment.to_string(),
                parents: parents.clone(),
            }
        }
        DispatchTarget::Item {
            resource,
            id,
            parents,
        } => {
            let mut inherited = parents.clone();
            inherited.insert(resource.id_key(), id.clone());
            lookup_collection(segment, inherited, registry, ctx)?
        }
    };
    Ok((next, SEGMENTS_PER_STEP))
}

/// Resolves a whole path starting from [`DispatchTarget::Root`].
pub fn resolve_path<S: AsRef<str>>(
    segments: &[S],
    registry: &Registry,
    ctx: &mut RequestContext,
) -> Result<DispatchTarget, GatewayError> {
    let mut target = DispatchTarget::Root;
    let mut remaining = segments;
    while let Some(segment) = remaining.first() {
        let (next, consumed) = resolve_next(&target, segment.as_ref(), registry, ctx)?;
        target = next;
        remaining = &remaining[consumed..];
    }
    debug!(kind = %target.kind(), resource = ?target.resource().map(|r| r.plural()), "Path resolved");
    Ok(target)
}

fn lookup_collection(
    name: &str,
    parents: PathIds,
    registry: &Registry,
    ctx: &mut RequestContext,
) -> Result<DispatchTarget, GatewayError> {
    let Some(entry) = registry.resolve(name) else {
        warn!(collection = name, "No backend found for collection - returning 404");
        return Err(GatewayError::NotFound {
            collection: name.to_string(),
        });
    };
    ctx.record_collection(name);
    Ok(DispatchTarget::Collection {
        resource: entry.resource().clone(),
        parents,
    })
}
