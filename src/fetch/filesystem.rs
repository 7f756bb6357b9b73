//! Local filesystem repository backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{FetchError, ModelFetcher};

/// Fetcher reading documents from a repository rooted in a local directory.
#[derive(Debug, Clone)]
pub struct FilesystemFetcher {
    root: PathBuf,
}

impl FilesystemFetcher {
    /// Create a fetcher rooted at the given repository directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The repository root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target(&self, path: &str) -> PathBuf {
        // Repository paths always use '/', the platform may not.
        let mut target = self.root.clone();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            target.push(segment);
        }
        target
    }
}

#[async_trait]
impl ModelFetcher for FilesystemFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let target = self.target(path);
        log::debug!("Reading {}", target.display());

        match tokio::fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(FetchError::NotFound(path.to_string()))
            }
            Err(err) => Err(FetchError::Transport {
                path: path.to_string(),
                reason: err.to_string(),
            }),
        }
    }
}
