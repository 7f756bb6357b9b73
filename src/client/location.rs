//! Repository location normalization.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use crate::error::{Error, Result};
use crate::fetch::{FilesystemFetcher, HttpFetcher, ModelFetcher};

/// A normalized models repository location.
///
/// Anything starting with `http://` or `https://` is remote; `file://`
/// URLs and plain paths are local directories.
#[derive(Debug, Clone)]
pub enum RepositoryLocation {
    /// Remote repository served over HTTP(S).
    Remote(Url),
    /// Repository rooted in a local directory.
    Local(PathBuf),
}

impl RepositoryLocation {
    /// Normalize a location string.
    pub fn parse(location: &str) -> Result<Self> {
        let trimmed = location.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidLocation("empty location".to_string()));
        }

        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            let url = Url::parse(trimmed)
                .map_err(|e| Error::InvalidLocation(format!("{}: {}", trimmed, e)))?;
            return Ok(Self::Remote(url));
        }

        if let Some(path) = trimmed.strip_prefix("file://") {
            return Ok(Self::Local(PathBuf::from(path)));
        }

        Ok(Self::Local(PathBuf::from(trimmed)))
    }

    /// Construct the fetch backend matching this location.
    pub fn fetcher(&self) -> Arc<dyn ModelFetcher> {
        match self {
            Self::Remote(url) => Arc::new(HttpFetcher::new(url.clone())),
            Self::Local(root) => Arc::new(FilesystemFetcher::new(root.clone())),
        }
    }
}

impl fmt::Display for RepositoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{}", url),
            Self::Local(root) => write!(f, "{}", root.display()),
        }
    }
}
