/// Metadata provider abstraction
///
/// The poster pipeline talks to the remote catalog service through this trait
/// so that failure classification and caching can be tested against a mock
/// transport. TMDB is the only production implementation.
use crate::models::MovieDetails;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Transport-level failures, kept distinct so the caller can map each class
/// to its own fallback
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Connection failure: {0}")]
    Connection(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Malformed response body: {0}")]
    Decode(String),
}

/// Trait for remote movie metadata sources
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch the details payload for one external id.
    ///
    /// A 2xx response with a decodable body is `Ok` even when the payload
    /// carries an embedded API error; payload interpretation belongs to the
    /// caller.
    async fn movie_details(&self, external_id: i64) -> Result<MovieDetails, ProviderError>;
}
