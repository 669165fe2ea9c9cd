use std::sync::Arc;

use crate::{
    catalog::CatalogIndex,
    error::AppResult,
    models::{FallbackReason, PosterOutcome, Recommendation},
    services::posters::PosterService,
};

/// Number of recommendations served when the caller does not ask for a count
pub const DEFAULT_NEIGHBOR_COUNT: usize = 5;

/// Ties the catalog index and the poster pipeline together: top-k neighbor
/// lookup, then one poster fetch per neighbor.
pub struct RecommendationService {
    catalog: Arc<CatalogIndex>,
    posters: Arc<PosterService>,
}

impl RecommendationService {
    pub fn new(catalog: Arc<CatalogIndex>, posters: Arc<PosterService>) -> Self {
        Self { catalog, posters }
    }

    /// All selectable titles, in catalog order
    pub fn titles(&self) -> Vec<String> {
        self.catalog.titles()
    }

    /// Recommends the `k` titles most similar to `title`.
    ///
    /// Lookup errors propagate; poster failures never do — they surface as
    /// placeholder URLs. The per-neighbor fetches are independent, so they
    /// run as parallel tasks and are joined in neighbor order.
    pub async fn recommend(&self, title: &str, k: usize) -> AppResult<Vec<Recommendation>> {
        let neighbors = self.catalog.neighbors(title, k)?;

        tracing::info!(title, neighbor_count = neighbors.len(), "Serving recommendations");

        let mut tasks = Vec::with_capacity(neighbors.len());
        for (entry, _score) in neighbors {
            let posters = Arc::clone(&self.posters);
            let external_id = entry.external_id;
            let task = tokio::spawn(async move { posters.fetch(external_id).await });
            tasks.push((entry.title, task));
        }

        let mut recommendations = Vec::with_capacity(tasks.len());
        for (neighbor_title, task) in tasks {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(error = %e, title = %neighbor_title, "Poster fetch task failed");
                    PosterOutcome::Fallback(FallbackReason::Unknown)
                }
            };

            recommendations.push(Recommendation {
                title: neighbor_title,
                poster_url: outcome.image_url(),
            });
        }

        Ok(recommendations)
    }
}
