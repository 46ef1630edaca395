// Travel computation - cumulative distance derived from navigation
use crate::domain::telemetry::{NavigationPoint, TravelPoint};
use geo::{Distance, Haversine, Point};

fn point(nav: &NavigationPoint) -> Point {
    Point::new(nav.longitude, nav.latitude)
}

/// Great-circle distance in meters on the mean Earth radius
pub fn geodesic_distance(a: &NavigationPoint, b: &NavigationPoint) -> f64 {
    Haversine.distance(point(a), point(b))
}

/// One travel point per navigation sample, same order and timestamps.
/// Callers guarantee a non-empty series.
pub fn compute_travel(navigation: &[NavigationPoint]) -> Vec<TravelPoint> {
    let Some(origin) = navigation.first() else {
        return Vec::new();
    };

    let mut travelled = 0.0;
    let mut previous = origin;
    navigation
        .iter()
        .map(|nav| {
            travelled += geodesic_distance(previous, nav);
            previous = nav;
            TravelPoint {
                mission_time: nav.mission_time,
                distance_from_origin: geodesic_distance(origin, nav),
                distance_travelled: travelled,
            }
        })
        .collect()
}
