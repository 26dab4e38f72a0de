//! Composite scoring of a single destination

use super::components::{
    avalanche_score, distance_score, snow_score, view_terrain_score, weather_score,
};
use super::tables::ScoringTables;
use super::weights::ScoringWeights;
use crate::models::{
    AvalancheReading, Destination, SnowReading, TerrainType, UserProfile, WeatherReading,
};
use crate::snow_depth::{ElevationProfile, SnowDepthAnalysis};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Snow score multiplier for destinations that cannot be skied
pub const UNSKIABLE_SNOW_FACTOR: f64 = 0.3;
/// Total score multiplier for destinations outside the driving range
pub const OUT_OF_RANGE_FACTOR: f64 = 0.7;

/// Outcome of scoring one destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub destination_name: String,
    pub total_score: f64,
    pub weather_score: f64,
    pub snow_score: f64,
    /// Present iff an avalanche bulletin was available
    pub avalanche_score: Option<f64>,
    pub view_terrain_score: f64,
    pub distance_score: f64,
    pub distance_km: f64,
    pub weights: ScoringWeights,
    pub within_range: bool,
    pub avalanche_data_available: bool,
    pub snow_depth_analysis: Option<SnowDepthAnalysis>,
    pub personalized_summary: String,
}

impl ScoringResult {
    /// True unless a snow analysis ran and found the tour unskiable
    #[must_use]
    pub fn is_skiable(&self) -> bool {
        self.snow_depth_analysis
            .as_ref()
            .is_none_or(|analysis| analysis.is_skiable)
    }
}

/// Provider readings gathered for one destination
#[derive(Debug, Clone, Copy, Default)]
pub struct Conditions<'a> {
    pub weather: Option<&'a WeatherReading>,
    pub snow: Option<&'a SnowReading>,
    pub avalanche: Option<&'a AvalancheReading>,
}

/// Trip constraints the destination is scored against
#[derive(Debug, Clone, Copy)]
pub struct TripContext {
    pub distance_km: f64,
    pub max_distance_km: f64,
    pub max_walking_hours: f64,
    /// Used for the drive time in the summary
    pub average_speed_kmh: f64,
}

/// Combines feasibility analysis, component scores and weights
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    tables: ScoringTables,
}

impl ScoringEngine {
    #[must_use]
    pub fn new(tables: ScoringTables) -> Self {
        Self { tables }
    }

    #[must_use]
    pub fn tables(&self) -> &ScoringTables {
        &self.tables
    }

    /// Score a destination.
    ///
    /// Missing provider data never fails; a malformed destination does.
    #[instrument(skip_all, fields(destination = %destination.name))]
    pub fn score(
        &self,
        destination: &Destination,
        conditions: Conditions<'_>,
        trip: TripContext,
        profile: &UserProfile,
    ) -> crate::Result<ScoringResult> {
        destination.validate()?;

        let analysis = conditions.snow.map(|snow| {
            SnowDepthAnalysis::analyze(
                &ElevationProfile::from(destination),
                snow,
                trip.max_walking_hours,
            )
        });

        let avalanche_data_available = conditions.avalanche.is_some();
        let weights = ScoringWeights::for_profile(profile, avalanche_data_available);

        let weather = weather_score(conditions.weather, profile);
        let mut snow = snow_score(conditions.snow, analysis.as_ref(), profile);
        let avalanche = avalanche_score(conditions.avalanche, profile);
        let view_terrain = view_terrain_score(destination, profile, &self.tables);
        let distance = distance_score(trip.distance_km, trip.max_distance_km);

        let mut within_range = trip.distance_km <= trip.max_distance_km;
        if analysis.as_ref().is_some_and(|a| !a.is_skiable) {
            snow *= UNSKIABLE_SNOW_FACTOR;
            within_range = false;
        }

        let mut total = weather * weights.weather
            + snow * weights.snow
            + view_terrain * weights.view_terrain
            + distance * weights.distance;
        if let Some(avalanche) = avalanche {
            total += avalanche * weights.avalanche;
        }
        if !within_range {
            total *= OUT_OF_RANGE_FACTOR;
        }

        debug!(
            total,
            weather, snow, view_terrain, distance, within_range, "scored destination"
        );

        let personalized_summary =
            build_summary(destination, conditions, trip, profile, analysis.as_ref());

        Ok(ScoringResult {
            destination_name: destination.name.clone(),
            total_score: total,
            weather_score: weather,
            snow_score: snow,
            avalanche_score: avalanche,
            view_terrain_score: view_terrain,
            distance_score: distance,
            distance_km: trip.distance_km,
            weights,
            within_range,
            avalanche_data_available,
            snow_depth_analysis: analysis,
            personalized_summary,
        })
    }
}

fn terrain_callout(terrain: TerrainType) -> &'static str {
    match terrain {
        TerrainType::CoastalAlpine => "🌊 Perfect coastal alpine terrain",
        TerrainType::HighAlpine => "🏔️ Ideal high alpine conditions",
        TerrainType::ForestValley => "🌲 Your preferred forest terrain",
        TerrainType::PlateauRidge => "🌬️ Open plateau as you like",
        TerrainType::FjordValley => "🏞️ Beautiful fjord valley setting",
        TerrainType::Balanced => "⛰️ Great terrain match",
    }
}

fn build_summary(
    destination: &Destination,
    conditions: Conditions<'_>,
    trip: TripContext,
    profile: &UserProfile,
    analysis: Option<&SnowDepthAnalysis>,
) -> String {
    let mut parts = Vec::new();

    let drive_hours = trip.distance_km / trip.average_speed_kmh;
    parts.push(format!("🚗 {:.0}km ({drive_hours:.1}h drive)", trip.distance_km));

    if let Some(analysis) = analysis {
        if analysis.walking_required {
            let hours = analysis.walking_time_hours;
            if hours > 1.0 {
                parts.push(format!("🥾 {hours:.1}h walk to snow"));
            } else {
                parts.push(format!("🥾 {:.0}min walk to snow", hours * 60.0));
            }
        } else {
            parts.push("🅿️ Ski from parking".to_string());
        }

        if analysis.damage_risk {
            parts.push("⚠️ Rock damage risk".to_string());
        } else if analysis.min_depth_cm > 75.0 {
            parts.push("❄️ Excellent snow coverage".to_string());
        } else {
            parts.push(format!("❄️ {:.0}cm min depth", analysis.min_depth_cm));
        }
    }

    if let Some(weather) = conditions.weather {
        if profile.view_priority >= 7 {
            if weather.precipitation_24h_mm <= 0.0 {
                parts.push("☀️ Clear skies for epic views".to_string());
            } else {
                parts.push(format!(
                    "🌧️ Limited visibility ({:.1}mm)",
                    weather.precipitation_24h_mm
                ));
            }
        }
        parts.push(format!("🌡️ {:.1}°C", weather.avg_temp_24h_c));
    }

    match conditions.avalanche {
        Some(reading) => {
            let level = reading.danger_level;
            if profile.safety_priority >= 7 {
                if level.value() <= 2 {
                    parts.push(format!(
                        "✅ Avalanche danger {}/5 ({})",
                        level.value(),
                        level.label()
                    ));
                } else {
                    parts.push(format!(
                        "⚠️ Avalanche danger {}/5 - Use caution",
                        level.value()
                    ));
                }
            } else {
                parts.push(format!("⚠️ Avalanche danger {}/5", level.value()));
            }
        }
        None => parts.push("📅 No avalanche warnings available".to_string()),
    }

    if destination.terrain_type == profile.terrain_preference {
        parts.push(terrain_callout(destination.terrain_type).to_string());
    }

    let fresh_snow = conditions.snow.map_or(0.0, |s| s.snowfall_3days_cm);
    if profile.powder_priority >= 8 && fresh_snow >= 20.0 {
        parts.push("🎿 Powder hunter's paradise!".to_string());
    } else if profile.view_priority >= 8 && destination.view_score >= 90.0 {
        parts.push("📸 Incredible scenic potential!".to_string());
    } else if profile.adventure_seeking >= 8 && destination.technical_level >= 7.0 {
        parts.push("⚡ Epic adventure potential!".to_string());
    }

    parts.join(" • ")
}
