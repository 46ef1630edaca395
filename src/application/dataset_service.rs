// Dataset service - Use case for serving the full mission dataset
use crate::application::series_store::SeriesStore;
use crate::domain::dataset::Dataset;
use std::sync::Arc;

#[derive(Clone)]
pub struct DatasetService {
    name: String,
    dataset: Arc<Dataset>,
}

impl DatasetService {
    /// Assembles the dataset once; every request shares it
    pub fn new(name: impl Into<String>, store: &SeriesStore) -> Self {
        Self {
            name: name.into(),
            dataset: Arc::new(assemble_dataset(store)),
        }
    }

    pub fn get_dataset(&self, name: &str) -> Option<Arc<Dataset>> {
        (name == self.name).then(|| self.dataset.clone())
    }
}

pub fn assemble_dataset(store: &SeriesStore) -> Dataset {
    let navigation = store.navigation();
    // the store never holds an empty navigation series
    let start_time = navigation.first().map(|n| n.mission_time).unwrap_or_default();
    let end_time = navigation.last().map(|n| n.mission_time).unwrap_or_default();

    Dataset {
        start_time,
        end_time,
        path: navigation.iter().map(|n| [n.longitude, n.latitude]).collect(),
        navigation: navigation.to_vec(),
        environment: store.environment().to_vec(),
        images: store.images().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::{Camera, ImagePoint, NavigationPoint};
    use chrono::{Duration, TimeZone, Utc};

    fn store() -> SeriesStore {
        let t0 = Utc.with_ymd_and_hms(2018, 8, 18, 10, 0, 0).unwrap();
        SeriesStore::new(
            vec![
                NavigationPoint::new(t0, -81.33, 48.47, 290.0),
                NavigationPoint::new(t0 + Duration::minutes(90), -80.9, 48.61, 31_000.0),
            ],
            vec![],
            vec![],
            vec![ImagePoint {
                mission_time: t0 + Duration::minutes(30),
                camera: Camera::Nadir,
                image: "eA==".to_string(),
            }],
        )
        .unwrap()
    }

    #[test]
    fn test_assemble_dataset() {
        let store = store();
        let dataset = assemble_dataset(&store);

        assert_eq!(dataset.start_time, store.navigation()[0].mission_time);
        assert_eq!(dataset.end_time, store.navigation()[1].mission_time);
        assert_eq!(dataset.path, vec![[-81.33, 48.47], [-80.9, 48.61]]);
        assert_eq!(dataset.navigation.len(), 2);
        assert_eq!(dataset.images.len(), 1);
    }

    #[test]
    fn test_unknown_dataset_name() {
        let service = DatasetService::new("timmins", &store());
        assert!(service.get_dataset("timmins").is_some());
        assert!(service.get_dataset("kiruna").is_none());
    }
}
