//! External data collaborators
//!
//! - `gate`: per-provider call spacing in front of the persistent cache
//! - `snapshot`: file-backed weather, snow and avalanche readings
//! - `season`: avalanche bulletin calendar
//! - `gazetteer`: offline geocoder for Norwegian place names

pub mod gate;
pub mod gazetteer;
pub mod season;
pub mod snapshot;

use crate::models::{AvalancheOutlook, Location, SnowReading, WeatherReading};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;

pub use gate::ProviderGate;
pub use gazetteer::{Gazetteer, LocationInput, LocationParser};
pub use season::WarningSeason;
pub use snapshot::SnapshotProvider;

/// Outcome of a successful provider call
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    /// A new reading
    Fresh(T),
    /// The provider says the previously returned reading still holds
    NotModified,
    /// The provider has nothing for this point
    Unavailable,
}

/// Latitude/longitude rounded to a fixed number of decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordinateKey {
    lat: i64,
    lon: i64,
    precision: u32,
}

impl CoordinateKey {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, precision: u32) -> Self {
        let scale = 10f64.powi(i32::try_from(precision).unwrap_or(4));
        Self {
            lat: (latitude * scale).round() as i64,
            lon: (longitude * scale).round() as i64,
            precision,
        }
    }

    #[must_use]
    pub fn for_location(location: &Location, precision: u32) -> Self {
        Self::new(location.latitude, location.longitude, precision)
    }
}

impl fmt::Display for CoordinateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = 10f64.powi(i32::try_from(self.precision).unwrap_or(4));
        let decimals = self.precision as usize;
        write!(
            f,
            "{:.*},{:.*}",
            decimals,
            self.lat as f64 / scale,
            decimals,
            self.lon as f64 / scale
        )
    }
}

/// 24 hour weather summary source
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn weather(&self, point: &Location) -> crate::Result<Fetch<WeatherReading>>;
}

/// Snow depth and recent snowfall source
#[async_trait]
pub trait SnowProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn snow(&self, point: &Location) -> crate::Result<Fetch<SnowReading>>;
}

/// Avalanche bulletin source
#[async_trait]
pub trait AvalancheProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn avalanche(
        &self,
        point: &Location,
        date: NaiveDate,
    ) -> crate::Result<Fetch<AvalancheOutlook>>;
}

/// Place name to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when nothing matches
    async fn geocode(&self, query: &str) -> crate::Result<Option<Location>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_key_rounding() {
        let a = CoordinateKey::new(69.649_21, 18.955_34, 4);
        let b = CoordinateKey::new(69.649_24, 18.955_26, 4);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "69.6492,18.9553");
        assert_ne!(a, CoordinateKey::new(69.6493, 18.9553, 4));
    }
}
