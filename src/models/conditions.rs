//! Provider readings: weather summary, snow observation, avalanche bulletin

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// 24 hour weather summary for a point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Mean air temperature over the next 24 hours in Celsius
    pub avg_temp_24h_c: f64,
    pub min_temp_24h_c: f64,
    pub max_temp_24h_c: f64,
    /// Total precipitation over the next 24 hours in mm
    pub precipitation_24h_mm: f64,
    /// Hours with measurable precipitation
    #[serde(default)]
    pub precipitation_hours: u32,
    /// Current wind speed in m/s
    pub wind_speed_ms: f64,
    /// Current relative humidity in percent, if reported
    #[serde(default)]
    pub humidity_pct: Option<f64>,
    /// Current cloud cover in percent, if reported
    #[serde(default)]
    pub cloud_cover_pct: Option<f64>,
}

impl WeatherReading {
    /// Reading with identical min/avg/max temperature
    #[must_use]
    pub fn steady(temp_c: f64, precipitation_mm: f64, wind_speed_ms: f64) -> Self {
        Self {
            avg_temp_24h_c: temp_c,
            min_temp_24h_c: temp_c,
            max_temp_24h_c: temp_c,
            precipitation_24h_mm: precipitation_mm,
            precipitation_hours: 0,
            wind_speed_ms,
            humidity_pct: None,
            cloud_cover_pct: None,
        }
    }

    #[must_use]
    pub fn with_humidity(mut self, humidity_pct: f64) -> Self {
        self.humidity_pct = Some(humidity_pct);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureTrend {
    Stable,
    Warming,
    Cooling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindEffect {
    Minimal,
    Moderate,
    Significant,
}

/// Snow observation at a reference elevation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowReading {
    /// Snow depth in cm measured at `reference_elevation_m`
    pub snow_depth_cm: f64,
    /// New snow over the last three days in cm
    pub snowfall_3days_cm: f64,
    pub temperature_trend: TemperatureTrend,
    pub wind_effect: WindEffect,
    /// Elevation the depth applies to, in metres
    pub reference_elevation_m: f64,
}

/// European avalanche danger scale value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DangerLevel(u8);

impl DangerLevel {
    pub const LOW: DangerLevel = DangerLevel(1);
    pub const MODERATE: DangerLevel = DangerLevel(2);
    pub const CONSIDERABLE: DangerLevel = DangerLevel(3);
    pub const HIGH: DangerLevel = DangerLevel(4);
    pub const VERY_HIGH: DangerLevel = DangerLevel(5);

    /// All levels from lowest to highest
    pub const ALL: [DangerLevel; 5] = [
        Self::LOW,
        Self::MODERATE,
        Self::CONSIDERABLE,
        Self::HIGH,
        Self::VERY_HIGH,
    ];

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Short English label of the level
    #[must_use]
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Low",
            2 => "Moderate",
            3 => "Considerable",
            4 => "High",
            _ => "Very high",
        }
    }
}

impl TryFrom<u8> for DangerLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("avalanche danger level must be 1-5, got {value}"))
        }
    }
}

impl From<DangerLevel> for u8 {
    fn from(level: DangerLevel) -> Self {
        level.0
    }
}

impl fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5 ({})", self.0, self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvalancheProblem {
    WindSlab,
    PersistentWeakLayer,
    NewSnow,
    WetSnow,
    GlidingSnow,
}

impl fmt::Display for AvalancheProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvalancheProblem::WindSlab => write!(f, "wind slab"),
            AvalancheProblem::PersistentWeakLayer => write!(f, "persistent weak layer"),
            AvalancheProblem::NewSnow => write!(f, "new snow"),
            AvalancheProblem::WetSnow => write!(f, "wet snow"),
            AvalancheProblem::GlidingSnow => write!(f, "gliding snow"),
        }
    }
}

/// A published avalanche warning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvalancheReading {
    pub danger_level: DangerLevel,
    #[serde(default)]
    pub problems: BTreeSet<AvalancheProblem>,
    /// Day the warning applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_for: Option<NaiveDate>,
}

impl AvalancheReading {
    #[must_use]
    pub fn new(danger_level: DangerLevel) -> Self {
        Self {
            danger_level,
            problems: BTreeSet::new(),
            valid_for: None,
        }
    }

    #[must_use]
    pub fn with_problem(mut self, problem: AvalancheProblem) -> Self {
        self.problems.insert(problem);
        self
    }
}

/// What an avalanche provider can say about a point on a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AvalancheOutlook {
    /// A bulletin is published for the region
    Warning(AvalancheReading),
    /// Outside the season in which bulletins are issued
    NoWarningPeriod,
}

impl AvalancheOutlook {
    /// The bulletin, if one is in force
    #[must_use]
    pub fn reading(&self) -> Option<&AvalancheReading> {
        match self {
            AvalancheOutlook::Warning(reading) => Some(reading),
            AvalancheOutlook::NoWarningPeriod => None,
        }
    }
}
