// CSV series source - the mission's NAVEM / CDH text exports
use crate::application::series_source::SeriesSource;
use crate::domain::telemetry::{EnvironmentPoint, EventPoint, NavigationPoint};
use crate::infrastructure::config::DatasetSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::{Path, PathBuf};

const MISSION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone)]
pub struct CsvSeriesSource {
    navigation: PathBuf,
    environment: PathBuf,
    events: PathBuf,
}

impl CsvSeriesSource {
    pub fn new(navigation: PathBuf, environment: PathBuf, events: PathBuf) -> Self {
        Self {
            navigation,
            environment,
            events,
        }
    }

    pub fn from_settings(settings: &DatasetSettings) -> Self {
        Self::new(
            settings.path(&settings.navigation),
            settings.path(&settings.environment),
            settings.path(&settings.events),
        )
    }
}

/// Mission times are recorded in UTC without an offset
pub fn parse_mission_time(s: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), MISSION_TIME_FORMAT)
        .with_context(|| format!("Invalid mission time '{}'", s))?;
    Ok(naive.and_utc())
}

struct Record<'a> {
    row: &'a csv::StringRecord,
}

impl Record<'_> {
    fn text(&self, column: usize) -> Result<&str> {
        self.row
            .get(column)
            .with_context(|| format!("Missing column {}", column))
    }

    fn number(&self, column: usize) -> Result<f64> {
        let text = self.text(column)?;
        text.trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid number '{}' in column {}", text, column))
    }

    fn time(&self, column: usize) -> Result<DateTime<Utc>> {
        parse_mission_time(self.text(column)?)
    }
}

/// Parse every data row (the header row is skipped) with `transform`
fn parse_rows<T>(path: &Path, bytes: &[u8], transform: impl Fn(Record) -> Result<T>) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .double_quote(false)
        .escape(Some(b'\\'))
        .from_reader(bytes);

    let mut points = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("{}: unreadable record {}", path.display(), i + 1))?;
        let point = transform(Record { row: &row })
            .with_context(|| format!("{}: bad record {}", path.display(), i + 1))?;
        points.push(point);
    }

    Ok(points)
}

async fn read_series<T>(path: &Path, transform: impl Fn(Record) -> Result<T>) -> Result<Vec<T>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let points = parse_rows(path, &bytes, transform)?;

    tracing::debug!("Read {} samples from {}", points.len(), path.display());
    Ok(points)
}

#[async_trait]
impl SeriesSource for CsvSeriesSource {
    async fn load_navigation(&self) -> Result<Vec<NavigationPoint>> {
        read_series(&self.navigation, |r| {
            Ok(NavigationPoint {
                mission_time: r.time(1)?,
                longitude: r.number(5)?,
                latitude: r.number(4)?,
                altitude: r.number(6)?,
            })
        })
        .await
    }

    async fn load_environment(&self) -> Result<Vec<EnvironmentPoint>> {
        read_series(&self.environment, |r| {
            Ok(EnvironmentPoint {
                mission_time: r.time(1)?,
                internal_temperature: r.number(4)?,
                external_temperature: r.number(5)?,
                relative_humidity: r.number(6)?,
                external_pressure: r.number(7)?,
                dew_point: r.number(8)?,
            })
        })
        .await
    }

    async fn load_events(&self) -> Result<Vec<EventPoint>> {
        read_series(&self.events, |r| {
            Ok(EventPoint {
                mission_time: r.time(1)?,
                message: r.text(4)?.to_string(),
            })
        })
        .await
    }
}
