// Telemetry data domain models
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Any record carrying a mission timestamp.
pub trait TimePoint {
    fn mission_time(&self) -> DateTime<Utc>;
}

macro_rules! impl_time_point {
    ($($t:ty),*) => {
        $(impl TimePoint for $t {
            fn mission_time(&self) -> DateTime<Utc> {
                self.mission_time
            }
        })*
    };
}

impl_time_point!(NavigationPoint, TravelPoint, EnvironmentPoint, EventPoint, ImagePoint);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationPoint {
    #[serde(with = "iso_millis")]
    pub mission_time: DateTime<Utc>,
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
}

impl NavigationPoint {
    pub fn new(mission_time: DateTime<Utc>, longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            mission_time,
            longitude,
            latitude,
            altitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPoint {
    #[serde(with = "iso_millis")]
    pub mission_time: DateTime<Utc>,
    /// Great-circle distance to the first navigation sample, in meters
    pub distance_from_origin: f64,
    /// Running sum of consecutive-sample distances, in meters
    pub distance_travelled: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentPoint {
    #[serde(with = "iso_millis")]
    pub mission_time: DateTime<Utc>,
    pub internal_temperature: f64,
    pub external_temperature: f64,
    pub relative_humidity: f64,
    pub external_pressure: f64,
    pub dew_point: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPoint {
    #[serde(with = "iso_millis")]
    pub mission_time: DateTime<Utc>,
    pub message: String,
}

impl EventPoint {
    pub fn new(mission_time: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            mission_time,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Camera {
    Horizon,
    Nadir,
}

impl Camera {
    pub const ALL: [Camera; 2] = [Camera::Horizon, Camera::Nadir];

    /// Event message fragment announcing a capture by this camera
    pub fn marker(self) -> &'static str {
        match self {
            Camera::Horizon => "Requesting image from NAVEM",
            Camera::Nadir => "Taking onboard image",
        }
    }

    pub fn from_event_message(message: &str) -> Option<Camera> {
        Self::ALL.into_iter().find(|c| message.contains(c.marker()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePoint {
    #[serde(with = "iso_millis")]
    pub mission_time: DateTime<Utc>,
    pub camera: Camera,
    /// Base64 encoded image content
    pub image: String,
}

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix,
/// e.g. `2018-08-18T14:03:12.250Z`. Any RFC 3339 string is accepted on input.
pub mod iso_millis {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn format(time: &DateTime<Utc>) -> String {
        time.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_camera_from_event_message() {
        assert_eq!(
            Camera::from_event_message("Requesting image from NAVEM: /data/cam2/img_0042.jpg"),
            Some(Camera::Horizon)
        );
        assert_eq!(
            Camera::from_event_message("Taking onboard image /cam1/img_0007.jpg"),
            Some(Camera::Nadir)
        );
        assert_eq!(Camera::from_event_message("Heater on"), None);
    }

    #[test]
    fn test_mission_time_serialized_with_millis() {
        let t = Utc.with_ymd_and_hms(2018, 8, 18, 14, 3, 12).unwrap();
        let nav = NavigationPoint::new(t, -81.3, 48.5, 1200.0);
        let json = serde_json::to_value(&nav).unwrap();

        assert_eq!(json["missionTime"], "2018-08-18T14:03:12.000Z");
        assert_eq!(json["longitude"], -81.3);
        assert_eq!(serde_json::from_value::<NavigationPoint>(json).unwrap(), nav);
    }

    #[test]
    fn test_camera_wire_names() {
        assert_eq!(serde_json::to_string(&Camera::Horizon).unwrap(), "\"HORIZON\"");
        assert_eq!(serde_json::from_str::<Camera>("\"NADIR\"").unwrap(), Camera::Nadir);
    }
}
