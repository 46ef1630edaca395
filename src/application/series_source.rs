// Source traits for raw mission data
use crate::domain::telemetry::{Camera, EnvironmentPoint, EventPoint, NavigationPoint};
use async_trait::async_trait;

#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Navigation samples in recorded (chronological) order
    async fn load_navigation(&self) -> anyhow::Result<Vec<NavigationPoint>>;

    async fn load_environment(&self) -> anyhow::Result<Vec<EnvironmentPoint>>;

    async fn load_events(&self) -> anyhow::Result<Vec<EventPoint>>;
}

#[async_trait]
pub trait ImageResolver: Send + Sync {
    /// Base64 content of the image `file_name` taken by `camera`,
    /// or None if it cannot be found
    async fn resolve(&self, camera: Camera, file_name: &str) -> Option<String>;
}
