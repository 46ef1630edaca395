// Snapshot domain model - all series as of one navigation sample
use super::telemetry::{iso_millis, EnvironmentPoint, EventPoint, NavigationPoint, TimePoint, TravelPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(with = "iso_millis")]
    pub mission_time: DateTime<Utc>,
    pub navigation: NavigationPoint,
    pub travel: TravelPoint,
    pub event: Option<EventPoint>,
    /// Indices into the dataset image list, at most one per camera
    pub images: Vec<usize>,
    pub environment: Option<EnvironmentPoint>,
}

impl TimePoint for Snapshot {
    fn mission_time(&self) -> DateTime<Utc> {
        self.mission_time
    }
}
