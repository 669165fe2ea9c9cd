use std::sync::Arc;

use crate::services::RecommendationService;

/// Shared application state
///
/// `recommender` is `None` when the catalog artifacts failed to load at
/// startup; the process then serves in degraded mode and refuses
/// recommendation queries.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Option<Arc<RecommendationService>>,
}

impl AppState {
    pub fn new(recommender: Arc<RecommendationService>) -> Self {
        Self {
            recommender: Some(recommender),
        }
    }

    /// State for a process whose catalog artifacts could not be loaded
    pub fn degraded() -> Self {
        Self { recommender: None }
    }
}
