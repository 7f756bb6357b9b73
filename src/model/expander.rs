//! Dependency closure expansion.

use super::resolver::ExpandedOutcome;
use super::{ModelDocument, ModelMap, ModelResolver};
use crate::dtmi::Dtmi;
use crate::error::Result;

/// Walks the dependency graph of a set of models to completion.
///
/// Dependencies are discovered level by level: each level's missing models
/// are resolved as one concurrent batch, and a model already present in
/// the result is never fetched again. That filter is also what terminates
/// cyclic graphs.
pub struct DependencyExpander {
    resolver: ModelResolver,
    try_expanded: bool,
}

impl DependencyExpander {
    /// Create an expander over `resolver`.
    ///
    /// With `try_expanded` set, each dependency batch is first attempted
    /// from expanded documents and falls back to individual documents when
    /// a batch member has no expanded form.
    pub fn new(resolver: ModelResolver, try_expanded: bool) -> Self {
        Self {
            resolver,
            try_expanded,
        }
    }

    /// Expand `initial` into its full dependency closure.
    ///
    /// On success every model transitively reachable from `initial`
    /// through `extends` or component schema references is present exactly
    /// once. On failure no partial map is returned.
    pub async fn expand(&self, initial: Vec<ModelDocument>) -> Result<ModelMap> {
        let mut models = ModelMap::new();
        let mut frontier: Vec<Dtmi> = Vec::with_capacity(initial.len());

        for document in initial {
            let id = document.id().clone();
            if !models.contains_key(&id) {
                frontier.push(id.clone());
                models.insert(id, document);
            }
        }

        while !frontier.is_empty() {
            let mut pending: Vec<Dtmi> = Vec::new();
            for id in &frontier {
                if let Some(document) = models.get(id) {
                    for dependency in document.dependencies() {
                        if !models.contains_key(dependency) && !pending.contains(dependency) {
                            pending.push(dependency.clone());
                        }
                    }
                }
            }

            if pending.is_empty() {
                break;
            }

            log::debug!("Expanding {} pending dependencies", pending.len());
            let resolved = self.resolve_batch(&pending).await?;

            frontier.clear();
            for (id, document) in resolved {
                if !models.contains_key(&id) {
                    frontier.push(id.clone());
                    models.insert(id, document);
                }
            }
        }

        Ok(models)
    }

    async fn resolve_batch(&self, batch: &[Dtmi]) -> Result<ModelMap> {
        if self.try_expanded {
            match self.resolver.resolve_expanded(batch).await? {
                ExpandedOutcome::Resolved(models) => return Ok(models),
                ExpandedOutcome::Unavailable(dtmi) => {
                    log::info!(
                        "No expanded document for {}, resolving the batch individually",
                        dtmi
                    );
                }
            }
        }
        self.resolver.resolve(batch).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::error::Error;
    use crate::fetch::FetchError;
    use crate::model::testing::MapFetcher;

    fn dtmi(value: &str) -> Dtmi {
        Dtmi::parse(value).unwrap()
    }

    fn interface(id: &str) -> serde_json::Value {
        json!({
            "@context": "dtmi:dtdl:context;2",
            "@id": id,
            "@type": "Interface"
        })
    }

    fn extends(id: &str, parent: &str) -> serde_json::Value {
        json!({
            "@context": "dtmi:dtdl:context;2",
            "@id": id,
            "@type": "Interface",
            "extends": parent
        })
    }

    fn document(value: serde_json::Value) -> ModelDocument {
        ModelDocument::from_json(value).unwrap()
    }

    fn make_expander(fetcher: Arc<MapFetcher>, try_expanded: bool) -> DependencyExpander {
        DependencyExpander::new(ModelResolver::new(fetcher), try_expanded)
    }

    #[tokio::test]
    async fn test_expand_walks_chain_to_completion() {
        let fetcher = Arc::new(
            MapFetcher::new()
                .with(
                    "dtmi/com/example/b-1.json",
                    &extends("dtmi:com:example:B;1", "dtmi:com:example:C;1"),
                )
                .with("dtmi/com/example/c-1.json", &interface("dtmi:com:example:C;1")),
        );
        let expander = make_expander(fetcher, false);

        let seed = document(extends("dtmi:com:example:A;1", "dtmi:com:example:B;1"));
        let models = expander.expand(vec![seed]).await.unwrap();

        assert_eq!(models.len(), 3);
        assert!(models.contains_key(&dtmi("dtmi:com:example:C;1")));
    }

    #[tokio::test]
    async fn test_expand_fetches_shared_dependency_once() {
        // Diamond: A and B both extend C.
        let fetcher = Arc::new(
            MapFetcher::new().with("dtmi/com/example/c-1.json", &interface("dtmi:com:example:C;1")),
        );
        let expander = make_expander(fetcher.clone(), false);

        let models = expander
            .expand(vec![
                document(extends("dtmi:com:example:A;1", "dtmi:com:example:C;1")),
                document(extends("dtmi:com:example:B;1", "dtmi:com:example:C;1")),
            ])
            .await
            .unwrap();

        assert_eq!(models.len(), 3);
        assert_eq!(fetcher.fetches(), 1);
    }

    #[tokio::test]
    async fn test_expand_terminates_on_cycles() {
        let fetcher = Arc::new(
            MapFetcher::new()
                .with(
                    "dtmi/com/example/a-1.json",
                    &extends("dtmi:com:example:A;1", "dtmi:com:example:B;1"),
                )
                .with(
                    "dtmi/com/example/b-1.json",
                    &extends("dtmi:com:example:B;1", "dtmi:com:example:A;1"),
                ),
        );
        let expander = make_expander(fetcher.clone(), false);

        let seed = document(extends("dtmi:com:example:A;1", "dtmi:com:example:B;1"));
        let models = expander.expand(vec![seed]).await.unwrap();

        assert_eq!(models.len(), 2);
        // Only B is ever fetched; A came in as a seed.
        assert_eq!(fetcher.fetches(), 1);
    }

    #[tokio::test]
    async fn test_expand_self_reference_terminates() {
        let fetcher = Arc::new(MapFetcher::new());
        let expander = make_expander(fetcher.clone(), false);

        let seed = document(extends("dtmi:com:example:A;1", "dtmi:com:example:A;1"));
        let models = expander.expand(vec![seed]).await.unwrap();

        assert_eq!(models.len(), 1);
        assert_eq!(fetcher.fetches(), 0);
    }

    #[tokio::test]
    async fn test_expand_with_complete_input_fetches_nothing() {
        let fetcher = Arc::new(MapFetcher::new());
        let expander = make_expander(fetcher.clone(), false);

        let models = expander
            .expand(vec![
                document(extends("dtmi:com:example:A;1", "dtmi:com:example:B;1")),
                document(interface("dtmi:com:example:B;1")),
            ])
            .await
            .unwrap();

        assert_eq!(models.len(), 2);
        assert_eq!(fetcher.fetches(), 0);
    }

    #[tokio::test]
    async fn test_expand_missing_dependency_fails() {
        let fetcher = Arc::new(MapFetcher::new());
        let expander = make_expander(fetcher, false);

        let seed = document(extends("dtmi:com:example:A;1", "dtmi:com:example:B;1"));
        let err = expander.expand(vec![seed]).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(FetchError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_expand_prefers_expanded_documents() {
        let expanded = json!([
            extends("dtmi:com:example:B;1", "dtmi:com:example:C;1"),
            interface("dtmi:com:example:C;1")
        ]);
        let fetcher = Arc::new(
            MapFetcher::new().with("dtmi/com/example/b-1.expanded.json", &expanded),
        );
        let expander = make_expander(fetcher.clone(), true);

        let seed = document(extends("dtmi:com:example:A;1", "dtmi:com:example:B;1"));
        let models = expander.expand(vec![seed]).await.unwrap();

        // One expanded fetch brought in B and C together.
        assert_eq!(models.len(), 3);
        assert_eq!(fetcher.fetches(), 1);
    }

    #[tokio::test]
    async fn test_expand_falls_back_when_expanded_is_missing() {
        let fetcher = Arc::new(
            MapFetcher::new()
                .with(
                    "dtmi/com/example/b-1.json",
                    &extends("dtmi:com:example:B;1", "dtmi:com:example:C;1"),
                )
                .with("dtmi/com/example/c-1.json", &interface("dtmi:com:example:C;1")),
        );
        let expander = make_expander(fetcher, true);

        let seed = document(extends("dtmi:com:example:A;1", "dtmi:com:example:B;1"));
        let models = expander.expand(vec![seed]).await.unwrap();
        assert_eq!(models.len(), 3);
    }

    #[tokio::test]
    async fn test_expand_duplicate_seeds_collapse() {
        let fetcher = Arc::new(MapFetcher::new());
        let expander = make_expander(fetcher, false);

        let models = expander
            .expand(vec![
                document(interface("dtmi:com:example:A;1")),
                document(interface("dtmi:com:example:a;1")),
            ])
            .await
            .unwrap();
        assert_eq!(models.len(), 1);
    }
}
