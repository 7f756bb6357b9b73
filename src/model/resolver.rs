//! Batch model resolution.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use super::{ModelDocument, ModelError, ModelMap};
use crate::dtmi::Dtmi;
use crate::error::{Error, Result};
use crate::fetch::{FetchError, ModelFetcher};

/// Upper bound on concurrently outstanding fetches per batch.
pub const MAX_CONCURRENT_FETCHES: usize = 8;

/// Outcome of resolving a batch from expanded documents.
#[derive(Debug)]
pub enum ExpandedOutcome {
    /// Every requested model resolved from its expanded form; the map holds
    /// each model together with its full dependency closure.
    Resolved(ModelMap),
    /// At least one expanded document is absent from the repository, so the
    /// batch should be resolved from individual documents instead.
    Unavailable(Dtmi),
}

enum ExpandedFetch {
    Hit(Dtmi, Vec<u8>),
    Miss(Dtmi),
}

/// Resolves batches of DTMIs into parsed, identity-checked documents.
#[derive(Clone)]
pub struct ModelResolver {
    fetcher: Arc<dyn ModelFetcher>,
}

impl ModelResolver {
    /// Create a resolver over the given fetch backend.
    pub fn new(fetcher: Arc<dyn ModelFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch, parse, and identity-check every requested model.
    ///
    /// Fetches are issued concurrently and all of them are driven to
    /// completion before the first failure, if any, is propagated. On
    /// success the map holds exactly the requested models.
    pub async fn resolve(&self, dtmis: &[Dtmi]) -> Result<ModelMap> {
        log::debug!("Resolving {} model document(s)", dtmis.len());

        let results: Vec<Result<(Dtmi, Vec<u8>)>> = stream::iter(dtmis.to_vec())
            .map(|dtmi| async move {
                let bytes = self.fetcher.fetch(&dtmi.to_path()).await?;
                Ok((dtmi, bytes))
            })
            .buffer_unordered(MAX_CONCURRENT_FETCHES)
            .collect()
            .await;

        let mut models = ModelMap::with_capacity(results.len());
        for result in results {
            let (dtmi, bytes) = result?;
            let document = ModelDocument::from_slice(&bytes)?;
            if document.id() != &dtmi {
                return Err(Error::Model(ModelError::IdentityMismatch {
                    requested: dtmi.to_string(),
                    declared: document.id().to_string(),
                }));
            }
            models.insert(dtmi, document);
        }
        Ok(models)
    }

    /// Try to resolve every requested model from its expanded document.
    ///
    /// A missing expanded document yields [`ExpandedOutcome::Unavailable`]
    /// so the caller can fall back to individual documents; any other
    /// failure in the batch is fatal and takes precedence.
    pub async fn resolve_expanded(&self, dtmis: &[Dtmi]) -> Result<ExpandedOutcome> {
        log::debug!("Resolving {} expanded document(s)", dtmis.len());

        let results: Vec<Result<ExpandedFetch>> = stream::iter(dtmis.to_vec())
            .map(|dtmi| async move {
                match self.fetcher.fetch(&dtmi.to_expanded_path()).await {
                    Ok(bytes) => Ok(ExpandedFetch::Hit(dtmi, bytes)),
                    Err(FetchError::NotFound(_)) => Ok(ExpandedFetch::Miss(dtmi)),
                    Err(e) => Err(Error::Fetch(e)),
                }
            })
            .buffer_unordered(MAX_CONCURRENT_FETCHES)
            .collect()
            .await;

        let mut fetched = Vec::with_capacity(results.len());
        let mut missing: Option<Dtmi> = None;
        for result in results {
            match result? {
                ExpandedFetch::Hit(dtmi, bytes) => fetched.push((dtmi, bytes)),
                ExpandedFetch::Miss(dtmi) => missing = missing.or(Some(dtmi)),
            }
        }

        if let Some(dtmi) = missing {
            log::debug!("No expanded document for {}", dtmi);
            return Ok(ExpandedOutcome::Unavailable(dtmi));
        }

        let mut models = ModelMap::new();
        for (dtmi, bytes) in fetched {
            merge_expanded(&mut models, &dtmi, &bytes)?;
        }
        Ok(ExpandedOutcome::Resolved(models))
    }
}

/// Parse an expanded payload and merge its documents into `models`.
///
/// Expanded documents are arrays holding a model plus its closure; a bare
/// object is accepted as the single-model form. The payload must contain
/// the model it was fetched for.
fn merge_expanded(models: &mut ModelMap, dtmi: &Dtmi, bytes: &[u8]) -> Result<()> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(ModelError::Json)?;
    let documents = match value {
        serde_json::Value::Array(entries) => entries
            .into_iter()
            .map(ModelDocument::from_json)
            .collect::<std::result::Result<Vec<_>, ModelError>>()?,
        other => vec![ModelDocument::from_json(other)?],
    };

    if !documents.iter().any(|doc| doc.id() == dtmi) {
        return Err(Error::Model(ModelError::Malformed(format!(
            "expanded document for \"{}\" does not contain it",
            dtmi
        ))));
    }

    for document in documents {
        // Overlapping closures keep whichever copy landed first.
        models.entry(document.id().clone()).or_insert(document);
    }
    Ok(())
}
