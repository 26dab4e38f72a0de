//! Component scorers
//!
//! Each scorer maps one provider reading (or its absence) plus the user
//! profile to a 0-100 score. Weather and snow fall back to fixed neutral
//! scores; avalanche safety is the only one that can be absent.

use super::tables::ScoringTables;
use crate::models::{
    AvalancheProblem, AvalancheReading, Destination, SnowReading, TemperatureTrend, UserProfile,
    WeatherReading, WindEffect,
};
use crate::snow_depth::SnowDepthAnalysis;

/// Weather score used when no forecast is available
pub const NEUTRAL_WEATHER_SCORE: f64 = 50.0;
/// Snow score used when no snow observation is available
pub const NEUTRAL_SNOW_SCORE: f64 = 30.0;
/// Flat bonus when the terrain matches the user's preference
pub const TERRAIN_MATCH_BONUS: f64 = 15.0;

/// Maps a 0-10 trait to `floor + trait/10 * span`
fn trait_multiplier(value: u8, floor: f64, span: f64) -> f64 {
    floor + f64::from(value) / 10.0 * span
}

/// Score the 24 hour weather summary
#[must_use]
pub fn weather_score(weather: Option<&WeatherReading>, profile: &UserProfile) -> f64 {
    let Some(weather) = weather else {
        return NEUTRAL_WEATHER_SCORE;
    };

    let temperature = match weather.avg_temp_24h_c {
        t if (-5.0..=5.0).contains(&t) => 40.0,
        t if (-10.0..=10.0).contains(&t) => 30.0,
        t if (-15.0..=15.0).contains(&t) => 20.0,
        _ => 10.0,
    };

    let visibility = match weather.precipitation_24h_mm {
        p if p <= 0.0 => 30.0,
        p if p < 2.0 => 20.0,
        p if p < 5.0 => 10.0,
        _ => 0.0,
    };
    let visibility = visibility * trait_multiplier(profile.view_priority, 0.5, 0.5);

    let wind = match weather.wind_speed_ms {
        w if w < 5.0 => 15.0,
        w if w < 10.0 => 10.0,
        w if w < 15.0 => 5.0,
        _ => 0.0,
    };

    let comfort = match weather.humidity_pct {
        Some(h) if (40.0..=70.0).contains(&h) => 15.0,
        _ => 0.0,
    };

    f64::min(temperature + visibility + wind + comfort, 100.0)
}

/// Score the raw snow observation, before elevation analysis
#[must_use]
pub fn basic_snow_score(snow: &SnowReading, profile: &UserProfile) -> f64 {
    let depth = match snow.snow_depth_cm {
        d if d >= 50.0 => 40.0,
        d if d >= 30.0 => 25.0,
        d if d >= 20.0 => 10.0,
        _ => 0.0,
    };

    let fresh = match snow.snowfall_3days_cm {
        s if s >= 30.0 => 30.0,
        s if s >= 15.0 => 20.0,
        s if s >= 5.0 => 10.0,
        _ => 0.0,
    };
    let fresh = fresh * trait_multiplier(profile.powder_priority, 0.5, 0.5);

    let trend = match snow.temperature_trend {
        TemperatureTrend::Stable => 20.0,
        TemperatureTrend::Cooling => 15.0,
        TemperatureTrend::Warming => 5.0,
    };

    let wind = match snow.wind_effect {
        WindEffect::Minimal => 10.0,
        WindEffect::Moderate => 5.0,
        WindEffect::Significant => 0.0,
    };

    f64::min(depth + fresh + trend + wind, 100.0)
}

/// Score snow conditions, adjusted by the feasibility analysis when present
#[must_use]
pub fn snow_score(
    snow: Option<&SnowReading>,
    analysis: Option<&SnowDepthAnalysis>,
    profile: &UserProfile,
) -> f64 {
    let Some(snow) = snow else {
        return NEUTRAL_SNOW_SCORE;
    };

    let mut score = basic_snow_score(snow, profile);

    if let Some(analysis) = analysis {
        if analysis.walking_required {
            score *= match analysis.walking_time_hours {
                h if h > 2.0 => 0.5,
                h if h > 1.0 => 0.7,
                h if h > 0.5 => 0.9,
                _ => 1.0,
            };
        }
        if analysis.damage_risk {
            score *= 0.8;
        }
        if analysis.min_depth_cm > 75.0 && !analysis.walking_required {
            score *= 1.1;
        }
    }

    f64::min(score, 100.0)
}

fn danger_base_score(level: u8) -> f64 {
    match level {
        1 => 100.0,
        2 => 80.0,
        3 => 50.0,
        4 => 20.0,
        _ => 0.0,
    }
}

fn problem_penalty(problem: AvalancheProblem) -> f64 {
    match problem {
        AvalancheProblem::PersistentWeakLayer => 15.0,
        AvalancheProblem::WindSlab | AvalancheProblem::NewSnow => 8.0,
        AvalancheProblem::WetSnow => 5.0,
        AvalancheProblem::GlidingSnow => 0.0,
    }
}

/// Score avalanche safety; `None` means no bulletin, never a default level
#[must_use]
pub fn avalanche_score(avalanche: Option<&AvalancheReading>, profile: &UserProfile) -> Option<f64> {
    let reading = avalanche?;
    let multiplier = profile.risk_tolerance.hazard_multiplier();
    let level = reading.danger_level.value();

    let mut score = danger_base_score(level);
    if level >= 3 {
        score = 100.0 - (100.0 - score) * multiplier;
    }

    for problem in &reading.problems {
        score -= problem_penalty(*problem) * multiplier;
    }

    Some(score.clamp(0.0, 100.0))
}

/// Score scenery and terrain fit, including the access-type adjustment
#[must_use]
pub fn view_terrain_score(
    destination: &Destination,
    profile: &UserProfile,
    tables: &ScoringTables,
) -> f64 {
    let mut score = destination.view_score * tables.view_multiplier(destination.terrain_type);
    if destination.terrain_type == profile.terrain_preference {
        score += TERRAIN_MATCH_BONUS;
    }
    score *= trait_multiplier(profile.view_priority, 0.3, 0.7);

    let adventure_factor = f64::from(profile.adventure_seeking) / 10.0;
    score += tables.access_adjustment(destination.access_type, adventure_factor);

    score.clamp(0.0, 100.0)
}

/// Linear proximity score: 100 at the start, 0 at the range limit and beyond
#[must_use]
pub fn distance_score(distance_km: f64, max_distance_km: f64) -> f64 {
    if max_distance_km <= 0.0 || distance_km > max_distance_km {
        return 0.0;
    }
    100.0 * (1.0 - distance_km / max_distance_km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::destination::test_support::destination;
    use crate::models::{AccessType, DangerLevel, RiskTolerance, TerrainType};
    use crate::snow_depth::ElevationProfile;

    fn snow(depth: f64, fresh: f64) -> SnowReading {
        SnowReading {
            snow_depth_cm: depth,
            snowfall_3days_cm: fresh,
            temperature_trend: TemperatureTrend::Stable,
            wind_effect: WindEffect::Minimal,
            reference_elevation_m: 600.0,
        }
    }

    #[test]
    fn test_weather_neutral_without_data() {
        assert_eq!(weather_score(None, &UserProfile::default()), 50.0);
    }

    #[test]
    fn test_weather_ideal_day() {
        let weather = WeatherReading::steady(0.0, 0.0, 2.0).with_humidity(50.0);
        // 40 + 30 * 0.75 + 15 + 15
        assert!((weather_score(Some(&weather), &UserProfile::default()) - 92.5).abs() < 1e-9);

        let view_lover = UserProfile {
            view_priority: 10,
            ..UserProfile::default()
        };
        assert_eq!(weather_score(Some(&weather), &view_lover), 100.0);
    }

    #[test]
    fn test_weather_without_humidity_has_no_comfort_bonus() {
        let weather = WeatherReading::steady(0.0, 0.0, 2.0);
        assert!((weather_score(Some(&weather), &UserProfile::default()) - 77.5).abs() < 1e-9);
    }

    #[test]
    fn test_weather_harsh_day() {
        let weather = WeatherReading::steady(-22.0, 8.0, 18.0).with_humidity(90.0);
        assert_eq!(weather_score(Some(&weather), &UserProfile::default()), 10.0);
    }

    #[test]
    fn test_snow_neutral_without_data() {
        assert_eq!(snow_score(None, None, &UserProfile::default()), 30.0);
    }

    #[test]
    fn test_basic_snow_score() {
        // 40 + 20 * 0.75 + 20 + 10
        let score = basic_snow_score(&snow(80.0, 20.0), &UserProfile::default());
        assert!((score - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_snow_bonus_for_deep_cover() {
        let reading = snow(80.0, 20.0);
        let analysis = SnowDepthAnalysis::analyze(
            &ElevationProfile::new(600.0, 1200.0, 5.0),
            &reading,
            0.0,
        );
        let score = snow_score(Some(&reading), Some(&analysis), &UserProfile::default());
        assert!((score - 93.5).abs() < 1e-9);
    }

    #[test]
    fn test_snow_penalties_stack() {
        let reading = SnowReading {
            reference_elevation_m: 0.0,
            ..snow(5.0, 0.0)
        };
        // Snow line ~72 m above a sea-level start, 50 cm at 650 m
        let analysis =
            SnowDepthAnalysis::analyze(&ElevationProfile::new(0.0, 1300.0, 5.0), &reading, 3.0);
        assert!(analysis.walking_required && analysis.damage_risk);
        let base = basic_snow_score(&reading, &UserProfile::default());
        let expected = base * 0.8;
        let score = snow_score(Some(&reading), Some(&analysis), &UserProfile::default());
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_avalanche_absent_stays_absent() {
        assert_eq!(avalanche_score(None, &UserProfile::default()), None);
    }

    #[test]
    fn test_avalanche_levels_by_tolerance() {
        let conservative = UserProfile {
            risk_tolerance: RiskTolerance::Conservative,
            ..UserProfile::default()
        };
        let aggressive = UserProfile {
            risk_tolerance: RiskTolerance::Aggressive,
            ..UserProfile::default()
        };
        let level3 = AvalancheReading::new(DangerLevel::CONSIDERABLE);

        assert_eq!(avalanche_score(Some(&level3), &UserProfile::default()), Some(50.0));
        assert_eq!(avalanche_score(Some(&level3), &conservative), Some(25.0));
        assert_eq!(avalanche_score(Some(&level3), &aggressive), Some(65.0));

        let level5 = AvalancheReading::new(DangerLevel::VERY_HIGH);
        assert_eq!(avalanche_score(Some(&level5), &conservative), Some(0.0));
    }

    #[test]
    fn test_avalanche_problem_penalties() {
        let reading = AvalancheReading::new(DangerLevel::MODERATE)
            .with_problem(AvalancheProblem::PersistentWeakLayer)
            .with_problem(AvalancheProblem::WindSlab)
            .with_problem(AvalancheProblem::GlidingSnow);
        assert_eq!(avalanche_score(Some(&reading), &UserProfile::default()), Some(57.0));

        let conservative = UserProfile {
            risk_tolerance: RiskTolerance::Conservative,
            ..UserProfile::default()
        };
        // 80 - (15 + 8) * 1.5
        assert_eq!(avalanche_score(Some(&reading), &conservative), Some(45.5));
    }

    #[test]
    fn test_view_terrain_match_and_access() {
        let tables = ScoringTables::default();
        let mut dest = destination("Lyngen", TerrainType::HighAlpine, 0.0, 1500.0);
        dest.view_score = 90.0;
        dest.access_type = AccessType::LiftAccess;

        let profile = UserProfile {
            terrain_preference: TerrainType::HighAlpine,
            ..UserProfile::default()
        };
        // (90 * 1.1 + 15) * 0.65
        let score = view_terrain_score(&dest, &profile, &tables);
        assert!((score - 74.1).abs() < 1e-9);

        dest.access_type = AccessType::BoatOrSnowmobile;
        let adventurer = UserProfile {
            adventure_seeking: 10,
            ..profile
        };
        assert!((view_terrain_score(&dest, &adventurer, &tables) - 84.1).abs() < 1e-9);
    }

    #[test]
    fn test_view_terrain_is_clamped() {
        let tables = ScoringTables::default();
        let mut dest = destination("Cliffs", TerrainType::CoastalAlpine, 0.0, 1200.0);
        dest.view_score = 100.0;
        let profile = UserProfile {
            view_priority: 10,
            terrain_preference: TerrainType::CoastalAlpine,
            ..UserProfile::default()
        };
        assert_eq!(view_terrain_score(&dest, &profile, &tables), 100.0);
    }

    #[test]
    fn test_distance_score_endpoints() {
        assert_eq!(distance_score(0.0, 225.0), 100.0);
        assert_eq!(distance_score(225.0, 225.0), 0.0);
        assert!((distance_score(112.5, 225.0) - 50.0).abs() < 1e-9);
        assert_eq!(distance_score(300.0, 225.0), 0.0);
    }
}
