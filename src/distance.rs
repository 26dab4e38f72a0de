//! Great-circle distances and driving-range conversion

use crate::config::SearchConfig;
use crate::models::{Destination, Location};

/// Average winter driving speed on Norwegian roads
pub const AVERAGE_DRIVING_SPEED_KMH: f64 = 70.0;

/// Great-circle distance between two points in km
#[must_use]
pub fn distance_km(from: &Location, to: &Destination) -> f64 {
    haversine::distance(
        haversine::Location {
            latitude: from.latitude,
            longitude: from.longitude,
        },
        haversine::Location {
            latitude: to.latitude,
            longitude: to.longitude,
        },
        haversine::Units::Kilometers,
    )
}

/// Hours of driving for a distance at the configured average speed
#[must_use]
pub fn driving_hours(distance_km: f64, search: &SearchConfig) -> f64 {
    distance_km / search.average_driving_speed_kmh
}

/// Reachable distance for a driving budget.
///
/// Whole-hour budgets listed in the table use the curated road distance,
/// anything else falls back to hours times average speed.
#[must_use]
pub fn max_distance_for_hours(hours: f64, search: &SearchConfig) -> f64 {
    if hours.fract() == 0.0 {
        if let Some(band) = search
            .driving_distances
            .iter()
            .find(|band| f64::from(band.hours) == hours)
        {
            return band.distance_km;
        }
    }
    hours * search.average_driving_speed_kmh
}
