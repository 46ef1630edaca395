// File system image resolver - one directory per camera
use crate::application::series_source::ImageResolver;
use crate::domain::telemetry::Camera;
use crate::infrastructure::config::DatasetSettings;
use async_trait::async_trait;
use base64::Engine;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileImageResolver {
    nadir_dir: PathBuf,
    horizon_dir: PathBuf,
}

impl FileImageResolver {
    pub fn new(nadir_dir: PathBuf, horizon_dir: PathBuf) -> Self {
        Self {
            nadir_dir,
            horizon_dir,
        }
    }

    pub fn from_settings(settings: &DatasetSettings) -> Self {
        Self::new(settings.image_dir(Camera::Nadir), settings.image_dir(Camera::Horizon))
    }

    fn dir(&self, camera: Camera) -> &Path {
        match camera {
            Camera::Nadir => &self.nadir_dir,
            Camera::Horizon => &self.horizon_dir,
        }
    }
}

#[async_trait]
impl ImageResolver for FileImageResolver {
    async fn resolve(&self, camera: Camera, file_name: &str) -> Option<String> {
        // never leave the camera directory
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name == ".." {
            return None;
        }

        let path = self.dir(camera).join(file_name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
            Err(e) => {
                tracing::debug!("Cannot read image {}: {}", path.display(), e);
                None
            }
        }
    }
}
