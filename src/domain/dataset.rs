// Dataset domain model - the one-shot full mission response
use super::telemetry::{iso_millis, EnvironmentPoint, ImagePoint, NavigationPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(with = "iso_millis")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end_time: DateTime<Utc>,
    /// `[longitude, latitude]` pairs in navigation order
    pub path: Vec<[f64; 2]>,
    pub navigation: Vec<NavigationPoint>,
    pub environment: Vec<EnvironmentPoint>,
    pub images: Vec<ImagePoint>,
}

/// South-west and north-east corners of the flight path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Dataset {
    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.path.first()?;
        let bounds = self.path.iter().fold(
            Bounds { min: first, max: first },
            |b, [lng, lat]| Bounds {
                min: [b.min[0].min(*lng), b.min[1].min(*lat)],
                max: [b.max[0].max(*lng), b.max[1].max(*lat)],
            },
        );
        Some(bounds)
    }

    /// Resolve snapshot image indices, skipping any that fall outside the list
    pub fn images_at<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a ImagePoint> + 'a {
        indices.iter().filter_map(|&i| self.images.get(i))
    }

    pub fn altitude_series(&self) -> Vec<(DateTime<Utc>, f64)> {
        self.navigation
            .iter()
            .map(|n| (n.mission_time, n.altitude))
            .collect()
    }
}
