//! Remote HTTP(S) repository backend.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use super::{FetchError, ModelFetcher};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fetcher issuing GET requests against a remote models repository.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    /// Create a fetcher for the repository served at `base`.
    pub fn new(base: Url) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("modelsrepo/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self::with_client(client, base)
    }

    /// Create a fetcher with a caller-configured HTTP client.
    pub fn with_client(client: Client, mut base: Url) -> Self {
        // Url::join drops the last path segment unless the base ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    /// The repository base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::Transport {
                path: path.to_string(),
                reason: format!("Failed to build request URL: {}", e),
            })
    }
}

#[async_trait]
impl ModelFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(path)?;
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(path.to_string()));
        }
        if !response.status().is_success() {
            return Err(FetchError::Transport {
                path: path.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Ok(bytes.to_vec())
    }
}
