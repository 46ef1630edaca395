// Series store - immutable mission series, loaded once at startup
use crate::application::images::derive_images;
use crate::application::series_source::{ImageResolver, SeriesSource};
use crate::application::travel::compute_travel;
use crate::domain::telemetry::{
    EnvironmentPoint, EventPoint, ImagePoint, NavigationPoint, TimePoint, TravelPoint,
};
use anyhow::Context;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("navigation series is empty")]
    EmptyNavigation,
    #[error("{series} series goes back in time at sample {index}")]
    Unordered { series: &'static str, index: usize },
}

/// All series of one mission. Travel is built here together with navigation
/// so both always have the same length and ordering.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    navigation: Vec<NavigationPoint>,
    travel: Vec<TravelPoint>,
    environment: Vec<EnvironmentPoint>,
    events: Vec<EventPoint>,
    images: Vec<ImagePoint>,
}

impl SeriesStore {
    pub fn new(
        navigation: Vec<NavigationPoint>,
        environment: Vec<EnvironmentPoint>,
        events: Vec<EventPoint>,
        images: Vec<ImagePoint>,
    ) -> Result<Self, StoreError> {
        if navigation.is_empty() {
            return Err(StoreError::EmptyNavigation);
        }
        check_ordered("navigation", &navigation)?;
        check_ordered("environment", &environment)?;
        check_ordered("event", &events)?;
        check_ordered("image", &images)?;

        let travel = compute_travel(&navigation);

        Ok(Self {
            navigation,
            travel,
            environment,
            events,
            images,
        })
    }

    /// Read every series from `source` and derive the image series from the events
    pub async fn load(source: &dyn SeriesSource, resolver: &dyn ImageResolver) -> anyhow::Result<Self> {
        let navigation = source.load_navigation().await.context("Failed to load navigation")?;
        let environment = source.load_environment().await.context("Failed to load environment")?;
        let events = source.load_events().await.context("Failed to load events")?;
        let images = derive_images(&events, resolver).await;

        tracing::info!(
            "Loaded {} navigation, {} environment, {} event samples and {} images",
            navigation.len(),
            environment.len(),
            events.len(),
            images.len()
        );

        Ok(Self::new(navigation, environment, events, images)?)
    }

    pub fn navigation(&self) -> &[NavigationPoint] {
        &self.navigation
    }

    pub fn travel(&self) -> &[TravelPoint] {
        &self.travel
    }

    pub fn environment(&self) -> &[EnvironmentPoint] {
        &self.environment
    }

    pub fn events(&self) -> &[EventPoint] {
        &self.events
    }

    pub fn images(&self) -> &[ImagePoint] {
        &self.images
    }
}

fn check_ordered<T: TimePoint>(series: &'static str, points: &[T]) -> Result<(), StoreError> {
    match points
        .windows(2)
        .position(|w| w[1].mission_time() < w[0].mission_time())
    {
        Some(i) => Err(StoreError::Unordered { series, index: i + 1 }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::Camera;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 8, 18, 10, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn nav(secs: i64) -> NavigationPoint {
        NavigationPoint::new(at(secs), -81.0, 48.0 + secs as f64 / 100.0, 0.0)
    }

    #[test]
    fn test_travel_aligned_with_navigation() {
        let store = SeriesStore::new(vec![nav(0), nav(1), nav(1), nav(5)], vec![], vec![], vec![]).unwrap();
        assert_eq!(store.travel().len(), store.navigation().len());
        assert_eq!(store.travel()[3].mission_time, at(5));
    }

    #[test]
    fn test_empty_navigation_rejected() {
        let err = SeriesStore::new(vec![], vec![], vec![], vec![]).unwrap_err();
        assert_eq!(err, StoreError::EmptyNavigation);
    }

    #[test]
    fn test_out_of_order_series_rejected() {
        let events = vec![EventPoint::new(at(3), "a"), EventPoint::new(at(2), "b")];
        let err = SeriesStore::new(vec![nav(0)], vec![], events, vec![]).unwrap_err();
        assert_eq!(err, StoreError::Unordered { series: "event", index: 1 });
    }

    struct FixedSource;

    #[async_trait]
    impl SeriesSource for FixedSource {
        async fn load_navigation(&self) -> anyhow::Result<Vec<NavigationPoint>> {
            Ok(vec![nav(0), nav(10)])
        }

        async fn load_environment(&self) -> anyhow::Result<Vec<EnvironmentPoint>> {
            Ok(vec![])
        }

        async fn load_events(&self) -> anyhow::Result<Vec<EventPoint>> {
            Ok(vec![
                EventPoint::new(at(2), "Requesting image from NAVEM /cam2/h1.jpg"),
                EventPoint::new(at(4), "Taking onboard image /cam1/missing.jpg"),
            ])
        }
    }

    struct HorizonOnly;

    #[async_trait]
    impl ImageResolver for HorizonOnly {
        async fn resolve(&self, camera: Camera, _file_name: &str) -> Option<String> {
            (camera == Camera::Horizon).then(|| "aW1n".to_string())
        }
    }

    #[tokio::test]
    async fn test_load_derives_images() {
        let store = SeriesStore::load(&FixedSource, &HorizonOnly).await.unwrap();
        assert_eq!(store.navigation().len(), 2);
        assert_eq!(store.events().len(), 2);
        assert_eq!(store.images().len(), 1);
        assert_eq!(store.images()[0].camera, Camera::Horizon);
    }
}
