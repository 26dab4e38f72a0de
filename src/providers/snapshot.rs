//! File-backed conditions used in place of the live weather, snow and
//! avalanche services

use super::{AvalancheProvider, Fetch, SnowProvider, WarningSeason, WeatherProvider};
use crate::models::{AvalancheOutlook, Location, SnowReading, WeatherReading};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Points further than this from every snapshot entry get no data
pub const DEFAULT_MATCH_RADIUS_KM: f64 = 10.0;

/// Readings recorded for one point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPoint {
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(default)]
    pub weather: Option<WeatherReading>,
    #[serde(default)]
    pub snow: Option<SnowReading>,
    #[serde(default)]
    pub avalanche: Option<AvalancheOutlook>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionsSnapshot {
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    pub points: Vec<SnapshotPoint>,
}

/// Serves weather, snow and avalanche readings from a conditions snapshot
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    snapshot: ConditionsSnapshot,
    match_radius_km: f64,
}

impl SnapshotProvider {
    #[must_use]
    pub fn new(snapshot: ConditionsSnapshot) -> Self {
        Self {
            snapshot,
            match_radius_km: DEFAULT_MATCH_RADIUS_KM,
        }
    }

    pub fn load(path: &Path) -> crate::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let provider = Self::from_json_str(&raw)?;
        info!(
            "Loaded conditions for {} points from {}",
            provider.snapshot.points.len(),
            path.display()
        );
        Ok(provider)
    }

    pub fn from_json_str(raw: &str) -> crate::Result<Self> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    #[must_use]
    pub fn with_match_radius(mut self, radius_km: f64) -> Self {
        self.match_radius_km = radius_km;
        self
    }

    #[must_use]
    pub fn snapshot(&self) -> &ConditionsSnapshot {
        &self.snapshot
    }

    /// Entry with the same name, else the nearest one inside the match radius
    fn point_for(&self, location: &Location) -> Option<&SnapshotPoint> {
        let by_name = self
            .snapshot
            .points
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(location.name.trim()));
        if by_name.is_some() {
            return by_name;
        }

        self.snapshot
            .points
            .iter()
            .map(|p| {
                let km = haversine::distance(
                    haversine::Location {
                        latitude: p.latitude,
                        longitude: p.longitude,
                    },
                    haversine::Location {
                        latitude: location.latitude,
                        longitude: location.longitude,
                    },
                    haversine::Units::Kilometers,
                );
                (p, km)
            })
            .filter(|(_, km)| *km <= self.match_radius_km)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, km)| {
                debug!("Matched {} to snapshot point {} ({:.1} km)", location.name, p.name, km);
                p
            })
    }
}

fn fetched<T: Clone>(value: Option<&T>) -> Fetch<T> {
    value.map_or(Fetch::Unavailable, |v| Fetch::Fresh(v.clone()))
}

#[async_trait]
impl WeatherProvider for SnapshotProvider {
    fn name(&self) -> &str {
        "weather snapshot"
    }

    async fn weather(&self, point: &Location) -> crate::Result<Fetch<WeatherReading>> {
        Ok(fetched(self.point_for(point).and_then(|p| p.weather.as_ref())))
    }
}

#[async_trait]
impl SnowProvider for SnapshotProvider {
    fn name(&self) -> &str {
        "snow snapshot"
    }

    async fn snow(&self, point: &Location) -> crate::Result<Fetch<SnowReading>> {
        Ok(fetched(self.point_for(point).and_then(|p| p.snow.as_ref())))
    }
}

#[async_trait]
impl AvalancheProvider for SnapshotProvider {
    fn name(&self) -> &str {
        "avalanche snapshot"
    }

    async fn avalanche(
        &self,
        point: &Location,
        date: NaiveDate,
    ) -> crate::Result<Fetch<AvalancheOutlook>> {
        let season = WarningSeason::for_date(date);
        if season == WarningSeason::Off {
            return Ok(Fetch::Fresh(AvalancheOutlook::NoWarningPeriod));
        }
        let outlook = self.point_for(point).and_then(|p| p.avalanche.clone());
        Ok(outlook.map_or(Fetch::Unavailable, |o| Fetch::Fresh(season.filter(o))))
    }
}
