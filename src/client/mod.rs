//! High-level client API for models repositories.
//!
//! Provides the main user-facing interface for resolving DTDL models and
//! their dependency closures.

pub mod location;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dtmi::Dtmi;
use crate::error::Result;
use crate::fetch::ModelFetcher;
use crate::model::{DependencyExpander, ExpandedOutcome, ModelMap, ModelResolver};

pub use location::RepositoryLocation;

/// The public global models repository endpoint.
pub const GLOBAL_ENDPOINT: &str = "https://devicemodels.azure.com";

/// How `get_models` treats model dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyResolution {
    /// Resolve exactly the requested models, no dependency traversal.
    Disabled,
    /// Resolve the requested models plus their full dependency closure.
    Enabled,
    /// Resolve from precomputed expanded documents where available,
    /// falling back to enabled-style traversal where they are not.
    TryFromExpanded,
}

impl fmt::Display for DependencyResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disabled => "disabled",
            Self::Enabled => "enabled",
            Self::TryFromExpanded => "tryFromExpanded",
        };
        write!(f, "{}", name)
    }
}

/// Per-call options for `get_models`.
#[derive(Debug, Clone, Default)]
pub struct GetModelsOptions {
    /// Overrides the client's dependency resolution mode for this call.
    pub dependency_resolution: Option<DependencyResolution>,
}

/// Client for DTDL models repositories.
///
/// The dependency resolution mode is fixed at construction and can be
/// overridden per call through [`GetModelsOptions`].
pub struct ModelsRepositoryClient {
    resolver: ModelResolver,
    dependency_resolution: DependencyResolution,
}

impl ModelsRepositoryClient {
    /// Create a client for the global models repository endpoint.
    ///
    /// The global endpoint publishes expanded documents, so the default
    /// mode is [`DependencyResolution::TryFromExpanded`].
    pub fn new() -> Self {
        let location =
            RepositoryLocation::parse(GLOBAL_ENDPOINT).expect("global endpoint is a valid URL");
        log::debug!("Client configured for {}", location);
        Self {
            resolver: ModelResolver::new(location.fetcher()),
            dependency_resolution: DependencyResolution::TryFromExpanded,
        }
    }

    /// Create a client for an explicit repository location, either an
    /// HTTP(S) URL or a local directory.
    pub fn from_location(location: &str) -> Result<Self> {
        let location = RepositoryLocation::parse(location)?;
        log::debug!("Client configured for {}", location);
        Ok(Self {
            resolver: ModelResolver::new(location.fetcher()),
            dependency_resolution: DependencyResolution::Enabled,
        })
    }

    /// Create a client over an injected fetch backend.
    pub fn with_fetcher(
        fetcher: Arc<dyn ModelFetcher>,
        dependency_resolution: DependencyResolution,
    ) -> Self {
        Self {
            resolver: ModelResolver::new(fetcher),
            dependency_resolution,
        }
    }

    /// The client's default dependency resolution mode.
    pub fn dependency_resolution(&self) -> DependencyResolution {
        self.dependency_resolution
    }

    /// Resolve a single model.
    ///
    /// Shorthand for [`get_models`](Self::get_models) with one identifier;
    /// with dependency resolution enabled the result still holds the whole
    /// closure.
    pub async fn get_model(&self, dtmi: &str, options: GetModelsOptions) -> Result<ModelMap> {
        self.get_models(&[dtmi], options).await
    }

    /// Resolve a set of models according to the dependency resolution mode.
    ///
    /// Identifiers are validated and deduplicated up front. The call either
    /// returns a map holding everything it set out to resolve or fails as a
    /// whole; no partial map is handed out.
    pub async fn get_models<S: AsRef<str>>(
        &self,
        dtmis: &[S],
        options: GetModelsOptions,
    ) -> Result<ModelMap> {
        let mut requested: Vec<Dtmi> = Vec::with_capacity(dtmis.len());
        for dtmi in dtmis {
            let dtmi = Dtmi::parse(dtmi.as_ref())?;
            if !requested.contains(&dtmi) {
                requested.push(dtmi);
            }
        }

        let resolution = options
            .dependency_resolution
            .unwrap_or(self.dependency_resolution);
        log::debug!(
            "get_models: {} identifier(s), dependency resolution {}",
            requested.len(),
            resolution
        );

        match resolution {
            DependencyResolution::Disabled => self.resolver.resolve(&requested).await,
            DependencyResolution::Enabled => self.resolve_closure(&requested, false).await,
            DependencyResolution::TryFromExpanded => {
                match self.resolver.resolve_expanded(&requested).await? {
                    ExpandedOutcome::Resolved(models) => Ok(models),
                    ExpandedOutcome::Unavailable(dtmi) => {
                        log::warn!(
                            "Expanded document missing for {}, falling back to dependency traversal",
                            dtmi
                        );
                        self.resolve_closure(&requested, true).await
                    }
                }
            }
        }
    }

    async fn resolve_closure(&self, requested: &[Dtmi], try_expanded: bool) -> Result<ModelMap> {
        let base = self.resolver.resolve(requested).await?;
        let expander = DependencyExpander::new(self.resolver.clone(), try_expanded);
        expander.expand(base.into_values().collect()).await
    }
}

impl Default for ModelsRepositoryClient {
    fn default() -> Self {
        Self::new()
    }
}
