// As-of join engine - most recent sample at-or-before an instant
use crate::application::series_store::SeriesStore;
use crate::domain::snapshot::Snapshot;
use crate::domain::telemetry::{Camera, TimePoint};
use chrono::{DateTime, Utc};

/// Number of leading samples with `mission_time <= instant`.
/// Relies on the series being non-decreasing in time.
fn upper_bound<T: TimePoint>(series: &[T], instant: DateTime<Utc>) -> usize {
    series.partition_point(|p| p.mission_time() <= instant)
}

/// Index of the last sample at-or-before `instant` that satisfies `predicate`.
/// Samples sharing a timestamp resolve to the later one.
pub fn lookup_index_where<T, P>(series: &[T], instant: DateTime<Utc>, predicate: P) -> Option<usize>
where
    T: TimePoint,
    P: Fn(&T) -> bool,
{
    series[..upper_bound(series, instant)].iter().rposition(predicate)
}

pub fn lookup_index<T: TimePoint>(series: &[T], instant: DateTime<Utc>) -> Option<usize> {
    upper_bound(series, instant).checked_sub(1)
}

pub fn lookup<T: TimePoint>(series: &[T], instant: DateTime<Utc>) -> Option<&T> {
    lookup_index(series, instant).map(|i| &series[i])
}

/// One snapshot per navigation sample, in navigation order
pub fn combine(store: &SeriesStore) -> Vec<Snapshot> {
    (0..store.navigation().len())
        .map(|i| snapshot_for(store, i))
        .collect()
}

/// The combined snapshot at-or-before `instant`, without building the full list
pub fn snapshot_at(store: &SeriesStore, instant: DateTime<Utc>) -> Option<Snapshot> {
    lookup_index(store.navigation(), instant).map(|i| snapshot_for(store, i))
}

fn snapshot_for(store: &SeriesStore, index: usize) -> Snapshot {
    let navigation = &store.navigation()[index];
    let t = navigation.mission_time;

    // HORIZON first, then NADIR
    let images = Camera::ALL
        .into_iter()
        .filter_map(|camera| lookup_index_where(store.images(), t, |img| img.camera == camera))
        .collect();

    Snapshot {
        mission_time: t,
        navigation: navigation.clone(),
        travel: store.travel()[index].clone(),
        event: lookup(store.events(), t).cloned(),
        images,
        environment: lookup(store.environment(), t).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::{EnvironmentPoint, EventPoint, ImagePoint, NavigationPoint};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 8, 18, 10, 0, 0).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(secs)
    }

    fn event(secs: i64, message: &str) -> EventPoint {
        EventPoint::new(at(secs), message)
    }

    fn env(secs: i64, internal: f64) -> EnvironmentPoint {
        EnvironmentPoint {
            mission_time: at(secs),
            internal_temperature: internal,
            external_temperature: -20.0,
            relative_humidity: 40.0,
            external_pressure: 900.0,
            dew_point: -5.0,
        }
    }

    fn image(secs: i64, camera: Camera) -> ImagePoint {
        ImagePoint {
            mission_time: at(secs),
            camera,
            image: String::new(),
        }
    }

    /// linear forward scan, the reference behaviour
    fn scan<'a>(series: &'a [EventPoint], instant: DateTime<Utc>) -> Option<&'a EventPoint> {
        series.iter().take_while(|e| e.mission_time <= instant).last()
    }

    #[test]
    fn test_scenario_navigation_lookups() {
        let navigation = vec![
            NavigationPoint::new(at(0), 0.0, 0.0, 0.0),
            NavigationPoint::new(at(10), 1.0, 1.0, 0.0),
        ];

        assert!(lookup(&navigation, at(-1)).is_none());
        assert_eq!(lookup(&navigation, at(0)), Some(&navigation[0]));
        assert_eq!(lookup(&navigation, at(5)), Some(&navigation[0]));
        assert_eq!(lookup(&navigation, at(10)), Some(&navigation[1]));
        assert_eq!(lookup(&navigation, at(1000)), Some(&navigation[1]));
    }

    #[test]
    fn test_empty_series() {
        let events: Vec<EventPoint> = vec![];
        assert!(lookup(&events, at(0)).is_none());
        assert!(lookup_index_where(&events, at(0), |_| true).is_none());
    }

    #[test]
    fn test_ties_resolve_to_later_sample() {
        let events = vec![event(0, "a"), event(5, "b"), event(5, "c"), event(9, "d")];
        assert_eq!(lookup(&events, at(5)).unwrap().message, "c");
        assert_eq!(lookup(&events, at(7)).unwrap().message, "c");
    }

    #[test]
    fn test_matches_linear_scan_and_is_monotonic() {
        let events = vec![
            event(0, "a"),
            event(3, "b"),
            event(3, "c"),
            event(4, "d"),
            event(12, "e"),
            event(12, "f"),
            event(30, "g"),
        ];

        let mut last_seen: Option<DateTime<Utc>> = None;
        for secs in -3..40 {
            let found = lookup(&events, at(secs));
            assert_eq!(found, scan(&events, at(secs)), "at {secs}s");

            let found_time = found.map(|e| e.mission_time);
            assert!(found_time >= last_seen, "regressed at {secs}s");
            last_seen = found_time;
        }
    }

    #[test]
    fn test_predicate_filters_before_bound() {
        let images = vec![
            image(0, Camera::Nadir),
            image(2, Camera::Horizon),
            image(4, Camera::Nadir),
            image(6, Camera::Horizon),
        ];

        assert_eq!(lookup_index_where(&images, at(5), |i| i.camera == Camera::Horizon), Some(1));
        assert_eq!(lookup_index_where(&images, at(5), |i| i.camera == Camera::Nadir), Some(2));
        assert_eq!(lookup_index_where(&images, at(1), |i| i.camera == Camera::Horizon), None);
        assert_eq!(
            lookup_index_where(&images, at(9), |i| i.camera == Camera::Horizon).map(|i| images[i].mission_time),
            Some(at(6))
        );
    }

    fn store() -> SeriesStore {
        SeriesStore::new(
            vec![
                NavigationPoint::new(at(0), 0.0, 0.0, 100.0),
                NavigationPoint::new(at(10), 0.0, 0.1, 200.0),
                NavigationPoint::new(at(20), 0.0, 0.2, 300.0),
                NavigationPoint::new(at(30), 0.0, 0.3, 400.0),
            ],
            vec![env(15, 21.0), env(25, 19.5)],
            vec![event(5, "launch"), event(22, "Taking onboard image /x/a.jpg")],
            vec![image(8, Camera::Horizon), image(22, Camera::Nadir)],
        )
        .unwrap()
    }

    #[test]
    fn test_combine_one_snapshot_per_navigation_sample() {
        let store = store();
        let snapshots = combine(&store);

        assert_eq!(snapshots.len(), 4);
        for (s, n) in snapshots.iter().zip(store.navigation()) {
            assert_eq!(s.mission_time, n.mission_time);
            assert_eq!(&s.navigation, n);
        }

        // nothing recorded yet
        assert!(snapshots[0].event.is_none());
        assert!(snapshots[0].environment.is_none());
        assert!(snapshots[0].images.is_empty());

        assert_eq!(snapshots[1].event.as_ref().unwrap().message, "launch");
        assert!(snapshots[1].environment.is_none());
        assert_eq!(snapshots[1].images, vec![0]);

        assert_eq!(snapshots[2].environment.as_ref().unwrap().internal_temperature, 21.0);
        assert_eq!(snapshots[3].environment.as_ref().unwrap().internal_temperature, 19.5);
        assert_eq!(snapshots[3].images, vec![0, 1]);
        assert_eq!(snapshots[3].travel, store.travel()[3]);
    }

    #[test]
    fn test_snapshot_at_matches_combined_list() {
        let store = store();
        let snapshots = combine(&store);

        for secs in -5..40 {
            let expected = snapshots.iter().filter(|s| s.mission_time <= at(secs)).last();
            assert_eq!(snapshot_at(&store, at(secs)).as_ref(), expected, "at {secs}s");
        }
    }

    #[test]
    fn test_snapshot_uses_navigation_time_for_auxiliary_series() {
        let store = store();
        // environment at 25s exists, but the anchoring navigation sample is at 20s
        let snapshot = snapshot_at(&store, at(27)).unwrap();
        assert_eq!(snapshot.mission_time, at(20));
        assert_eq!(snapshot.environment.unwrap().mission_time, at(15));
    }
}
