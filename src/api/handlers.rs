use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::Recommendation,
    services::{RecommendationService, DEFAULT_NEIGHBOR_COUNT},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    pub title: String,
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    DEFAULT_NEIGHBOR_COUNT
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub title: String,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// Handlers

/// Health check; reports whether recommendation serving is available
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.recommender.is_some() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse { status })
}

/// All selectable titles, in catalog order
pub async fn list_titles(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let recommender = require_recommender(&state)?;
    Ok(Json(recommender.titles()))
}

/// Top-k recommendations for a selected title, with poster references
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> AppResult<Json<RecommendResponse>> {
    let recommender = require_recommender(&state)?;

    let recommendations = recommender.recommend(&params.title, params.k).await?;

    Ok(Json(RecommendResponse {
        title: params.title,
        recommendations,
    }))
}

fn require_recommender(state: &AppState) -> AppResult<Arc<RecommendationService>> {
    state.recommender.clone().ok_or_else(|| {
        AppError::DataLoad("Catalog artifacts are not loaded; recommendations unavailable".to_string())
    })
}
