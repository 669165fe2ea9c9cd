use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::AppResult,
    models::MovieDetails,
    services::providers::{MetadataProvider, ProviderError},
};

/// TMDB movie details provider
///
/// Calls `GET <base>/<id>?api_key=<key>&language=en-US` with a bounded
/// request timeout.
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn movie_details(&self, external_id: i64) -> Result<MovieDetails, ProviderError> {
        let url = format!("{}/{}", self.api_url, external_id);

        tracing::debug!(external_id, "Fetching movie details from TMDB");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", "en-US"),
            ])
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(external_id, status = %status, "TMDB returned error status");
            return Err(ProviderError::Status(status.as_u16()));
        }

        response
            .json::<MovieDetails>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

fn classify_transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else {
        ProviderError::Connection(e.to_string())
    }
}
