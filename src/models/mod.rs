use serde::{Deserialize, Serialize};

/// One catalog row: a movie title and the external id used to query the
/// metadata service. Immutable once the catalog is loaded.
///
/// The artifact field is named `movie_id` (upstream pipeline convention).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub title: String,
    #[serde(rename = "movie_id")]
    pub external_id: i64,
}

/// Raw TMDB response from GET /movie/{id}
///
/// Only the fields this service reads. TMDB embeds API-level errors in a 2xx
/// payload via `status_code` (7 = invalid API key).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub status_code: Option<i32>,
    #[serde(default)]
    pub status_message: Option<String>,
}

/// Why a poster fetch produced a placeholder instead of a real image URL
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// External id could not be normalized to a positive integer
    InvalidId,
    /// Transport failure: DNS, connection refused, timeout
    ConnectionError,
    /// Remote service returned HTTP 404 for the id
    NotFound,
    /// Any other HTTP error status
    HttpError(u16),
    /// Payload signalled an invalid API credential
    InvalidCredential,
    /// Success payload, but no poster reference present
    Unavailable,
    /// Anything else: malformed payload, panicked fetch task
    Unknown,
}

const PLACEHOLDER_BASE: &str = "https://placehold.co/500x750/cccccc/333333";

impl FallbackReason {
    /// Human-readable placeholder label; part of the external interface.
    pub fn placeholder_label(&self) -> &'static str {
        match self {
            FallbackReason::InvalidCredential => "Invalid API Key",
            FallbackReason::NotFound => "ID Not Found",
            FallbackReason::HttpError(_) => "Network Error",
            FallbackReason::ConnectionError => "Connection Refused",
            FallbackReason::Unavailable => "Poster Unavailable",
            FallbackReason::InvalidId | FallbackReason::Unknown => "Unknown Error",
        }
    }

    /// Placeholder image URL rendered in place of a real poster
    pub fn placeholder_url(&self) -> String {
        format!(
            "{}?text={}",
            PLACEHOLDER_BASE,
            self.placeholder_label().replace(' ', "+")
        )
    }
}

/// Outcome of a poster fetch; never a hard error to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum PosterOutcome {
    /// Full URL to a real poster image
    Poster(String),
    /// Typed substitute for a failed fetch
    Fallback(FallbackReason),
}

impl PosterOutcome {
    /// URL the caller renders: the real poster or a fixed placeholder
    pub fn image_url(&self) -> String {
        match self {
            PosterOutcome::Poster(url) => url.clone(),
            PosterOutcome::Fallback(reason) => reason.placeholder_url(),
        }
    }
}

/// A single recommendation returned to the client
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub poster_url: String,
}
