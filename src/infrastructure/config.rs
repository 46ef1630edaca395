use crate::domain::telemetry::Camera;
use crate::infrastructure::retry::{ReconnectPolicy, RetryPolicy};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub dataset: DatasetSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetSettings {
    /// Served under `/datasets/{name}`
    pub name: String,
    /// All other paths are relative to this directory
    pub root: PathBuf,
    pub navigation: PathBuf,
    pub environment: PathBuf,
    pub events: PathBuf,
    pub nadir_images: PathBuf,
    pub horizon_images: PathBuf,
}

impl DatasetSettings {
    pub fn path(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    pub fn image_dir(&self, camera: Camera) -> PathBuf {
        match camera {
            Camera::Nadir => self.path(&self.nadir_images),
            Camera::Horizon => self.path(&self.horizon_images),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub client: ClientSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientSettings {
    /// e.g. `http://localhost:8080`
    pub server_url: String,
    /// e.g. `ws://localhost:8080/`
    pub socket_url: String,
    pub dataset: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub reconnect: ReconnectSettings,
    #[serde(default)]
    pub playback: PlaybackSettings,
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrySettings {
    pub base_delay_ms: u64,
    pub max_retries: u32,
    pub backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            base_delay_ms: 250,
            max_retries: 5,
            backoff_ms: 1_000,
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(s: &RetrySettings) -> Self {
        RetryPolicy::new(
            Duration::from_millis(s.base_delay_ms),
            s.max_retries,
            Duration::from_millis(s.backoff_ms),
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReconnectSettings {
    pub base_delay_ms: u64,
    pub backoff_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            base_delay_ms: 250,
            backoff_ms: 1_000,
            max_delay_ms: 10_000,
        }
    }
}

impl From<&ReconnectSettings> for ReconnectPolicy {
    fn from(s: &ReconnectSettings) -> Self {
        ReconnectPolicy::new(
            Duration::from_millis(s.base_delay_ms),
            Duration::from_millis(s.backoff_ms),
            Duration::from_millis(s.max_delay_ms),
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlaybackSettings {
    pub tick_ms: u64,
    /// Mission seconds per wall-clock second
    pub rate: u32,
    /// Where playback begins; the mission start when unset
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_ms: 250,
            rate: 600,
            start: None,
        }
    }
}

fn load<T: for<'de> Deserialize<'de>>(file: &str) -> anyhow::Result<T> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(file))
        .add_source(config::Environment::with_prefix("STRATOS").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    load("config/server")
}

pub fn load_client_config() -> anyhow::Result<ClientConfig> {
    load("config/client")
}
