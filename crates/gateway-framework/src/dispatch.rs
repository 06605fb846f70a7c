//! # Verb Dispatcher
//!
//! Maps `(target kind, HTTP method)` to an [`Operation`]. The table is fixed:
//!
//! | Target     | Supported                                   | Everything else |
//! |------------|---------------------------------------------|-----------------|
//! | Collection | `GET` → list, `POST` → create               | 405             |
//! | Item       | `GET` → show, `PUT` → update, `DELETE` → delete | 405         |
//!
//! HEAD, PATCH and every extension method fall into "everything else"; there is no
//! fallback row. Selection never touches a backend.

use crate::error::GatewayError;
use crate::target::{DispatchTarget, TargetKind};
use http::{Method, StatusCode};
use std::fmt;

/// Backend operation selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Show,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Status signalled when the operation succeeds.
    pub fn success_status(self) -> StatusCode {
        match self {
            Operation::Create => StatusCode::CREATED,
            Operation::Delete => StatusCode::NO_CONTENT,
            Operation::List | Operation::Show | Operation::Update => StatusCode::OK,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Show => "show",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Picks the operation for `method` on `target`.
///
/// Fails with [`GatewayError::MethodNotAllowed`] for any method the table does not
/// list, and with [`GatewayError::NoResource`] when the path never named a collection.
pub fn select(target: &DispatchTarget, method: &Method) -> Result<Operation, GatewayError> {
    let kind = target.kind();
    let operation = match (kind, method.as_str()) {
        (TargetKind::Root, _) => return Err(GatewayError::NoResource),
        (TargetKind::Collection, "GET") => Operation::List,
        (TargetKind::Collection, "POST") => Operation::Create,
        (TargetKind::Item, "GET") => Operation::Show,
        (TargetKind::Item, "PUT") => Operation::Update,
        (TargetKind::Item, "DELETE") => Operation::Delete,
        _ => {
            return Err(GatewayError::MethodNotAllowed {
                method: method.to_string(),
                kind,
            })
        }
    };
    Ok(operation)
}
