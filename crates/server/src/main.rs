use std::sync::Arc;

use anyhow::Context;
use moviematch_analysis::gemini::GeminiClient;
use moviematch_db::credentials::CredentialStore;
use moviematch_metadata::omdb::OmdbClient;
use moviematch_search::SearchOrchestrator;
use moviematch_server::config::ServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;

    info!(db_path = %config.db_path, "connecting to database");
    let pool = moviematch_db::connect(&config.db_path)
        .await
        .context("failed to connect to database")?;

    moviematch_db::migrate::run(&pool)
        .await
        .context("failed to run migrations")?;
    info!("migrations complete");

    let credentials = CredentialStore::load(pool.clone(), config.default_credentials.clone())
        .await
        .context("failed to load API keys")?;

    let http = config.http_client().context("failed to build HTTP client")?;
    let catalog = Arc::new(OmdbClient::with_base_url(
        config.metadata_url.clone(),
        http.clone(),
    ));
    let analyzer = Arc::new(GeminiClient::with_endpoints(
        config.analysis_url.clone(),
        config.analysis_endpoints.clone(),
        http,
    ));
    info!(
        metadata_url = %config.metadata_url,
        analysis_url = %config.analysis_url,
        endpoints = config.analysis_endpoints.len(),
        "API clients ready"
    );

    let app_state = moviematch_server::state::AppState {
        db: pool,
        credentials,
        search: SearchOrchestrator::new(catalog, analyzer),
    };

    let app = moviematch_server::routes::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .context("failed to bind")?;
    info!(addr = %config.bind_addr, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
