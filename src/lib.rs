//! Async Rust client for DTDL models repositories.
//!
//! Resolves DTMIs (Digital Twin Model Identifiers) against a local or
//! remote repository, walks each model's transitive dependencies, and
//! returns the complete closure as one identifier-to-document map.

pub mod error;

pub mod client;
pub mod dtmi;
pub mod fetch;
pub mod model;

pub use error::{Error, Result};

pub use dtmi::{Dtmi, InvalidDtmiError};

pub use fetch::{FetchError, FilesystemFetcher, HttpFetcher, ModelFetcher};

pub use model::{
    DependencyExpander, ExpandedOutcome, ModelDocument, ModelError, ModelMap, ModelResolver,
};

pub use client::{
    DependencyResolution, GetModelsOptions, ModelsRepositoryClient, RepositoryLocation,
    GLOBAL_ENDPOINT,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
