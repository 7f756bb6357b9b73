//! Model documents, batch resolution, and dependency expansion.

pub mod document;
pub mod expander;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashMap;

use thiserror::Error;

use crate::dtmi::{Dtmi, InvalidDtmiError};

pub use document::ModelDocument;
pub use expander::DependencyExpander;
pub use resolver::{ExpandedOutcome, ModelResolver};

/// Mapping from DTMI to resolved model document.
///
/// Keys compare case-insensitively. A successful resolution holds every
/// requested model and, depending on the resolution mode, everything
/// transitively reachable from them.
pub type ModelMap = HashMap<Dtmi, ModelDocument>;

/// Errors raised while parsing or checking model documents.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The payload was not parseable JSON.
    #[error("model document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has no string-valued `@id` field.
    #[error("model document has no \"@id\" field")]
    MissingId,

    /// The `@id` or a dependency reference is not a well-formed DTMI.
    #[error("model document holds an invalid reference: {0}")]
    InvalidReference(#[from] InvalidDtmiError),

    /// The document shape diverges from the repository convention.
    #[error("malformed model document: {0}")]
    Malformed(String),

    /// The document declares a different identity than it was fetched for.
    #[error("requested \"{requested}\" but document declares \"{declared}\"")]
    IdentityMismatch { requested: String, declared: String },
}
