// Image series derived from capture events
use crate::application::series_source::ImageResolver;
use crate::domain::telemetry::{Camera, EventPoint, ImagePoint};

/// The file name referenced by a capture event is the last path segment of its message
fn referenced_file(message: &str) -> &str {
    message.rsplit('/').next().unwrap_or(message).trim()
}

/// One image per capture event whose file can be resolved, in event order.
/// Unresolvable captures are dropped.
pub async fn derive_images(events: &[EventPoint], resolver: &dyn ImageResolver) -> Vec<ImagePoint> {
    let mut images = Vec::new();

    for event in events {
        let Some(camera) = Camera::from_event_message(&event.message) else {
            continue;
        };
        let file_name = referenced_file(&event.message);

        match resolver.resolve(camera, file_name).await {
            Some(image) => images.push(ImagePoint {
                mission_time: event.mission_time,
                camera,
                image,
            }),
            None => {
                tracing::debug!("Skipping {:?} image {} - resource not found", camera, file_name);
            }
        }
    }

    images
}
