// Mission replay - loads the dataset, then walks mission time issuing live queries
use std::time::Duration;

use stratos_telemetry::domain::dataset::Dataset;
use stratos_telemetry::domain::playback::Playback;
use stratos_telemetry::domain::snapshot::Snapshot;
use stratos_telemetry::infrastructure::config::load_client_config;
use stratos_telemetry::infrastructure::dataset_client::DatasetClient;
use stratos_telemetry::infrastructure::query_client::{ClientError, QueryClient};
use stratos_telemetry::infrastructure::retry::{ReconnectPolicy, RetryPolicy};
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_client_config()?.client;

    // Live socket first so it is up by the time the dataset arrives
    let queries = QueryClient::spawn(
        config.socket_url.clone(),
        ReconnectPolicy::from(&config.reconnect),
        config.request_timeout(),
    );
    let mut state_changes = queries.state_changes();
    tokio::spawn(async move {
        while let Some(state) = state_changes.next().await {
            tracing::info!("Live query socket {:?}", state);
        }
    });

    let datasets = DatasetClient::new(config.server_url.clone(), RetryPolicy::from(&config.retry));
    let dataset = datasets.fetch(&config.dataset).await?;
    if let Some(bounds) = dataset.bounds() {
        tracing::info!(
            "Mission {} .. {}, path within {:?} - {:?}",
            dataset.start_time,
            dataset.end_time,
            bounds.min,
            bounds.max
        );
    }
    if let Some((at, altitude)) = dataset
        .altitude_series()
        .into_iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
    {
        tracing::info!("Peak altitude {:.0} m at {}", altitude, at);
    }

    let tick = Duration::from_millis(config.playback.tick_ms);
    let mut playback = Playback::new(dataset.start_time, dataset.end_time, tick, config.playback.rate)?;
    if let Some(start) = config.playback.start {
        playback.seek(start);
    }
    let mut ticker = tokio::time::interval(tick);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        let instant = playback.current();
        match queries.query(instant).await {
            Ok(Some(snapshot)) => report(&dataset, &snapshot),
            Ok(None) => tracing::info!("{}: no data yet", instant),
            // lost queries are simply re-sent on the next tick
            Err(ClientError::NotConnected | ClientError::ConnectionLost | ClientError::Timeout(_)) => {
                tracing::debug!("{}: query skipped", instant);
                continue;
            }
            Err(ClientError::Closed) => break,
        }
        playback.advance();
    }

    queries.shutdown().await;
    Ok(())
}

fn report(dataset: &Dataset, snapshot: &Snapshot) {
    let cameras: Vec<_> = dataset.images_at(&snapshot.images).map(|i| i.camera).collect();
    tracing::info!(
        "{} alt {:.0} m, {:.1} km travelled, {:.1} km from origin, ext {} C, images {:?}",
        snapshot.mission_time,
        snapshot.navigation.altitude,
        snapshot.travel.distance_travelled / 1000.0,
        snapshot.travel.distance_from_origin / 1000.0,
        snapshot
            .environment
            .as_ref()
            .map(|e| format!("{:.1}", e.external_temperature))
            .unwrap_or_else(|| "-".to_string()),
        cameras
    );
    if let Some(event) = &snapshot.event {
        tracing::debug!("last event: {}", event.message);
    }
}
