use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use cinematch_api::{
    api::{create_router, AppState},
    cache::SystemClock,
    catalog::CatalogIndex,
    config::Config,
    services::{providers::TmdbProvider, PosterService, RecommendationService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        catalog = %config.catalog_path,
        similarity = %config.similarity_path,
        ttl_secs = config.poster_cache_ttl_secs,
        "Starting cinematch-api"
    );

    let state = build_state(&config)?;

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads the catalog artifacts and wires up the services.
///
/// A failed catalog load is not fatal to the process: the server starts in
/// degraded mode and refuses recommendation queries until restarted with
/// valid artifacts.
fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let catalog = match CatalogIndex::load(
        Path::new(&config.catalog_path),
        Path::new(&config.similarity_path),
    ) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(error = %e, "Catalog load failed, serving in degraded mode");
            return Ok(AppState::degraded());
        }
    };

    let provider = TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?;

    let posters = PosterService::new(
        Arc::new(provider),
        config.poster_base_url.clone(),
        config.poster_cache_ttl_secs,
        Arc::new(SystemClock),
    );

    let recommender = RecommendationService::new(Arc::new(catalog), Arc::new(posters));

    Ok(AppState::new(Arc::new(recommender)))
}
