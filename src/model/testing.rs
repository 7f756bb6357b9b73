//! In-memory fetcher for exercising resolution without a repository.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::fetch::{FetchError, ModelFetcher};

/// Fetcher serving documents from memory while counting every fetch.
pub(crate) struct MapFetcher {
    documents: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    fetches: AtomicU32,
}

impl MapFetcher {
    pub(crate) fn new() -> Self {
        Self {
            documents: HashMap::new(),
            failing: HashSet::new(),
            fetches: AtomicU32::new(0),
        }
    }

    /// Serve `body` at `path`.
    pub(crate) fn with(mut self, path: &str, body: &Value) -> Self {
        let bytes = serde_json::to_vec(body).unwrap();
        self.documents.insert(path.to_string(), bytes);
        self
    }

    /// Serve raw bytes at `path`.
    pub(crate) fn with_bytes(mut self, path: &str, body: &[u8]) -> Self {
        self.documents.insert(path.to_string(), body.to_vec());
        self
    }

    /// Answer `path` with a transport failure.
    pub(crate) fn with_failure(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    /// Number of fetches served so far, including failures.
    pub(crate) fn fetches(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelFetcher for MapFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(path) {
            return Err(FetchError::Transport {
                path: path.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }
}
