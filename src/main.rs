// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use stratos_telemetry::application::dataset_service::DatasetService;
use stratos_telemetry::application::query_service::QueryService;
use stratos_telemetry::application::series_store::SeriesStore;
use stratos_telemetry::infrastructure::config::load_server_config;
use stratos_telemetry::infrastructure::csv_source::CsvSeriesSource;
use stratos_telemetry::infrastructure::image_resolver::FileImageResolver;
use stratos_telemetry::presentation::{app_state::AppState, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_server_config()?;

    // Load the mission once (infrastructure layer); any failure here is fatal
    let source = CsvSeriesSource::from_settings(&config.dataset);
    let resolver = FileImageResolver::from_settings(&config.dataset);
    let store = Arc::new(
        SeriesStore::load(&source, &resolver)
            .await
            .with_context(|| format!("Failed to load dataset {}", config.dataset.name))?,
    );

    // Create services (application layer)
    let dataset_service = DatasetService::new(config.dataset.name.clone(), &store);
    let query_service = QueryService::new(store);

    // Create application state
    let state = Arc::new(AppState {
        dataset_service,
        query_service,
    });

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting stratos-telemetry service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}
