use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use cinematch_api::{
    config::Config,
    dataset,
    routes::create_router,
    services::{
        metadata::{MetadataCache, TmdbClient},
        recommendations::Recommender,
    },
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // A dataset that fails to load leaves the service degraded instead of
    // taking it down; data endpoints answer 503 until a restart fixes it.
    let recommender = match dataset::load(&config.catalog_path, &config.matrix_path) {
        Ok(dataset) => {
            let client = Arc::new(TmdbClient::new(
                config.tmdb_api_key.clone(),
                config.tmdb_api_url.clone(),
            ));
            let cache = Arc::new(MetadataCache::new(
                client,
                Duration::from_secs(config.metadata_ttl_secs),
                Duration::from_secs(config.degraded_ttl_secs),
            ));
            Some(Arc::new(Recommender::new(Arc::new(dataset), cache)))
        }
        Err(e) => {
            tracing::error!(error = %e, "Dataset load failed, serving degraded");
            None
        }
    };

    let state = AppState::new(recommender);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
