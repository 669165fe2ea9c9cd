use std::sync::Arc;

use crate::{
    cache::{Clock, TtlCache},
    models::{FallbackReason, PosterOutcome},
    services::providers::{MetadataProvider, ProviderError},
};

/// Fetches poster references from the remote catalog service, with a TTL
/// cache and a typed fallback per failure class.
///
/// `fetch` never fails: every transport, HTTP, and payload problem is
/// absorbed into a `Fallback` so the caller can always render something.
/// Fallbacks are cached alongside real posters, so a persistently-failing id
/// is not retried within the TTL window.
pub struct PosterService {
    provider: Arc<dyn MetadataProvider>,
    cache: TtlCache<i64, PosterOutcome>,
    poster_base_url: String,
}

impl PosterService {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        poster_base_url: String,
        cache_ttl_secs: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            cache: TtlCache::new(cache_ttl_secs, clock),
            poster_base_url: poster_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolves the poster outcome for one external id (cache first)
    pub async fn fetch(&self, external_id: i64) -> PosterOutcome {
        if let Some(cached) = self.cache.get(&external_id).await {
            tracing::debug!(external_id, "Poster cache hit");
            return cached;
        }

        tracing::debug!(external_id, "Poster cache miss");

        let outcome = self.fetch_uncached(external_id).await;

        if let PosterOutcome::Fallback(reason) = &outcome {
            tracing::warn!(external_id, reason = ?reason, "Poster fetch fell back");
        }

        // Fallbacks are cached too; a failing id is retried only after expiry.
        self.cache.insert(external_id, outcome.clone()).await;

        outcome
    }

    async fn fetch_uncached(&self, external_id: i64) -> PosterOutcome {
        if external_id <= 0 {
            return PosterOutcome::Fallback(FallbackReason::InvalidId);
        }

        match self.provider.movie_details(external_id).await {
            Ok(details) => {
                if details.status_code == Some(7) {
                    return PosterOutcome::Fallback(FallbackReason::InvalidCredential);
                }

                match details.poster_path {
                    Some(path) => PosterOutcome::Poster(format!(
                        "{}/{}",
                        self.poster_base_url,
                        path.trim_start_matches('/')
                    )),
                    None => PosterOutcome::Fallback(FallbackReason::Unavailable),
                }
            }
            Err(ProviderError::Status(404)) => PosterOutcome::Fallback(FallbackReason::NotFound),
            Err(ProviderError::Status(status)) => {
                PosterOutcome::Fallback(FallbackReason::HttpError(status))
            }
            Err(ProviderError::Connection(_)) | Err(ProviderError::Timeout(_)) => {
                PosterOutcome::Fallback(FallbackReason::ConnectionError)
            }
            Err(ProviderError::Decode(_)) => PosterOutcome::Fallback(FallbackReason::Unknown),
        }
    }
}
