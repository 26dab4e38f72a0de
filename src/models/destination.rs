//! Ski touring destination model

use crate::error::SkiTourError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nominal length of a tour when the catalog does not say otherwise
pub const DEFAULT_TRIP_DISTANCE_KM: f64 = 5.0;

/// Landscape category of a destination, also used as a user preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    CoastalAlpine,
    HighAlpine,
    ForestValley,
    PlateauRidge,
    FjordValley,
    Balanced,
}

impl TerrainType {
    pub const ALL: [TerrainType; 6] = [
        TerrainType::CoastalAlpine,
        TerrainType::HighAlpine,
        TerrainType::ForestValley,
        TerrainType::PlateauRidge,
        TerrainType::FjordValley,
        TerrainType::Balanced,
    ];

    /// Stable identifier used in configuration files
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            TerrainType::CoastalAlpine => "coastal_alpine",
            TerrainType::HighAlpine => "high_alpine",
            TerrainType::ForestValley => "forest_valley",
            TerrainType::PlateauRidge => "plateau_ridge",
            TerrainType::FjordValley => "fjord_valley",
            TerrainType::Balanced => "balanced",
        }
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainType::CoastalAlpine => write!(f, "Coastal alpine"),
            TerrainType::HighAlpine => write!(f, "High alpine"),
            TerrainType::ForestValley => write!(f, "Forest valley"),
            TerrainType::PlateauRidge => write!(f, "Plateau and ridge"),
            TerrainType::FjordValley => write!(f, "Fjord valley"),
            TerrainType::Balanced => write!(f, "Mixed terrain"),
        }
    }
}

/// How the trailhead is reached in winter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    RoadAccess,
    LiftAccess,
    HutAccess,
    BoatOrSnowmobile,
    RoadClosedWinter,
    BoatAccess,
    TechnicalApproach,
}

impl AccessType {
    pub const ALL: [AccessType; 7] = [
        AccessType::RoadAccess,
        AccessType::LiftAccess,
        AccessType::HutAccess,
        AccessType::BoatOrSnowmobile,
        AccessType::RoadClosedWinter,
        AccessType::BoatAccess,
        AccessType::TechnicalApproach,
    ];

    /// Stable identifier used in configuration files
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            AccessType::RoadAccess => "road_access",
            AccessType::LiftAccess => "lift_access",
            AccessType::HutAccess => "hut_access",
            AccessType::BoatOrSnowmobile => "boat_or_snowmobile",
            AccessType::RoadClosedWinter => "road_closed_winter",
            AccessType::BoatAccess => "boat_access",
            AccessType::TechnicalApproach => "technical_approach",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessType::RoadAccess => write!(f, "Road access"),
            AccessType::LiftAccess => write!(f, "Lift access"),
            AccessType::HutAccess => write!(f, "Hut access"),
            AccessType::BoatOrSnowmobile => write!(f, "Boat or snowmobile"),
            AccessType::RoadClosedWinter => write!(f, "Road closed in winter"),
            AccessType::BoatAccess => write!(f, "Boat access"),
            AccessType::TechnicalApproach => write!(f, "Technical approach"),
        }
    }
}

/// Typical avalanche terrain exposure of the route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvalancheExposure {
    Low,
    Moderate,
    Considerable,
    High,
    Variable,
}

impl fmt::Display for AvalancheExposure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvalancheExposure::Low => write!(f, "low"),
            AvalancheExposure::Moderate => write!(f, "moderate"),
            AvalancheExposure::Considerable => write!(f, "considerable"),
            AvalancheExposure::High => write!(f, "high"),
            AvalancheExposure::Variable => write!(f, "variable"),
        }
    }
}

/// Elevation profile of a tour, stored as `[start, summit]` in catalog files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ElevationRange {
    /// Trailhead / parking elevation in metres
    pub start_m: f64,
    /// Summit elevation in metres
    pub summit_m: f64,
}

impl ElevationRange {
    #[must_use]
    pub fn new(start_m: f64, summit_m: f64) -> Self {
        Self { start_m, summit_m }
    }

    /// Vertical metres from start to summit
    #[must_use]
    pub fn vertical_m(&self) -> f64 {
        self.summit_m - self.start_m
    }
}

impl From<[f64; 2]> for ElevationRange {
    fn from([start_m, summit_m]: [f64; 2]) -> Self {
        Self { start_m, summit_m }
    }
}

impl From<ElevationRange> for [f64; 2] {
    fn from(range: ElevationRange) -> Self {
        [range.start_m, range.summit_m]
    }
}

/// A catalog destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    pub terrain_type: TerrainType,
    pub elevation_range: ElevationRange,
    /// Scenic quality, 0-100
    pub view_score: f64,
    /// Technical difficulty, 0-10
    pub technical_level: f64,
    #[serde(alias = "access")]
    pub access_type: AccessType,
    pub avalanche_exposure: AvalancheExposure,
    /// Ski region the tour belongs to, e.g. "Lyngen"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Nominal one-way tour length in km
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Destination {
    /// Tour length used by the walking-distance cap
    #[must_use]
    pub fn trip_distance(&self) -> f64 {
        self.trip_distance_km.unwrap_or(DEFAULT_TRIP_DISTANCE_KM)
    }

    /// Reject entries that indicate a broken catalog
    pub fn validate(&self) -> crate::Result<()> {
        let fail = |message: String| Err(SkiTourError::catalog(self.name.clone(), message));

        if self.name.trim().is_empty() {
            return fail("destination name is empty".to_string());
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return fail(format!("latitude {} is not a valid coordinate", self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return fail(format!(
                "longitude {} is not a valid coordinate",
                self.longitude
            ));
        }

        let range = self.elevation_range;
        if !range.start_m.is_finite() || !range.summit_m.is_finite() {
            return fail("elevation range contains non-finite values".to_string());
        }
        if range.start_m >= range.summit_m {
            return fail(format!(
                "elevation range start {} m must be below summit {} m",
                range.start_m, range.summit_m
            ));
        }

        if !(0.0..=100.0).contains(&self.view_score) {
            return fail(format!("view_score {} outside 0-100", self.view_score));
        }
        if !(0.0..=10.0).contains(&self.technical_level) {
            return fail(format!(
                "technical_level {} outside 0-10",
                self.technical_level
            ));
        }
        if let Some(trip) = self
            .trip_distance_km
            .filter(|trip| !trip.is_finite() || *trip <= 0.0)
        {
            return fail(format!("trip_distance_km {trip} must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn destination(name: &str, terrain_type: TerrainType, start_m: f64, summit_m: f64) -> Destination {
        Destination {
            name: name.to_string(),
            latitude: 69.5,
            longitude: 20.0,
            terrain_type,
            elevation_range: ElevationRange::new(start_m, summit_m),
            view_score: 80.0,
            technical_level: 5.0,
            access_type: AccessType::RoadAccess,
            avalanche_exposure: AvalancheExposure::Moderate,
            region: None,
            trip_distance_km: None,
            difficulty: None,
            season: None,
            description: None,
            features: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::destination;
    use super::*;

    #[test]
    fn test_parse_catalog_entry() {
        let json = r#"{
            "name": "Store Lenangstind",
            "lat": 69.8342,
            "lon": 20.1589,
            "terrain_type": "coastal_alpine",
            "elevation_range": [20, 1625],
            "view_score": 95,
            "technical_level": 8,
            "access": "road_access",
            "avalanche_exposure": "high",
            "region": "Lyngen",
            "season": "March-May"
        }"#;

        let dest: Destination = serde_json::from_str(json).unwrap();
        assert_eq!(dest.region.as_deref(), Some("Lyngen"));
        assert_eq!(dest.elevation_range, ElevationRange::new(20.0, 1625.0));
        assert_eq!(dest.access_type, AccessType::RoadAccess);
        assert_eq!(dest.trip_distance(), DEFAULT_TRIP_DISTANCE_KM);
        assert!(dest.validate().is_ok());
    }

    #[test]
    fn test_inverted_elevation_is_rejected() {
        let dest = destination("Upside down", TerrainType::HighAlpine, 1200.0, 400.0);
        let err = dest.validate().unwrap_err();
        assert!(matches!(err, SkiTourError::Catalog { .. }));
        assert!(err.to_string().contains("Upside down"));
    }

    #[test]
    fn test_flat_elevation_is_rejected() {
        let dest = destination("Flat", TerrainType::PlateauRidge, 800.0, 800.0);
        assert!(dest.validate().is_err());
    }

    #[test]
    fn test_out_of_range_view_score_is_rejected() {
        let mut dest = destination("Too pretty", TerrainType::FjordValley, 0.0, 900.0);
        dest.view_score = 140.0;
        assert!(dest.validate().is_err());
    }

    #[test]
    fn test_terrain_keys_match_serde_names() {
        for terrain in TerrainType::ALL {
            let json = serde_json::to_string(&terrain).unwrap();
            assert_eq!(json, format!("\"{}\"", terrain.key()));
        }
        for access in AccessType::ALL {
            let json = serde_json::to_string(&access).unwrap();
            assert_eq!(json, format!("\"{}\"", access.key()));
        }
    }
}
