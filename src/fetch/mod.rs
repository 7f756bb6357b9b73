//! Repository fetch backends.
//!
//! A fetcher turns a repository-relative path such as
//! `dtmi/com/example/thermostat-1.json` into raw document bytes. Two
//! backends are provided, one for local directories and one for remote
//! HTTP(S) endpoints; anything else can plug in through [`ModelFetcher`].

pub mod filesystem;
pub mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use filesystem::FilesystemFetcher;
pub use http::HttpFetcher;

/// Errors produced by repository fetchers.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The document does not exist in the repository.
    #[error("model document not found: {0}")]
    NotFound(String),

    /// Any other filesystem or network failure.
    #[error("transport failure for {path}: {reason}")]
    Transport { path: String, reason: String },
}

/// Capability to read documents out of a models repository.
///
/// Implementations must tolerate arbitrarily many concurrent `fetch` calls;
/// the resolver issues them in parallel batches.
#[async_trait]
pub trait ModelFetcher: Send + Sync {
    /// Fetch the document at a repository-relative, `/`-separated path.
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError>;
}
