//! Regional recommendations
//!
//! Groups scored destinations by catalog region, summarizes the weather
//! across each region and ranks the regions in reach by their weather,
//! their best tour and how many good tours they offer.

use crate::error::SkiTourError;
use crate::models::{Destination, Location, UserProfile};
use crate::scoring::{RankedDestination, RankingPolicy, ScoringResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

const WEATHER_SHARE: f64 = 0.5;
const BEST_TOUR_SHARE: f64 = 0.3;
const VARIETY_SHARE: f64 = 0.2;
/// Variety points per recommended tour, capped at 100
const VARIETY_POINTS_PER_TOUR: f64 = 20.0;

/// How many regions, and tours per region, a regional run returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionalOptions {
    pub top_regions: usize,
    pub tours_per_region: usize,
}

impl Default for RegionalOptions {
    fn default() -> Self {
        Self {
            top_regions: 3,
            tours_per_region: 3,
        }
    }
}

impl RegionalOptions {
    pub fn validate(&self) -> crate::Result<()> {
        if self.top_regions == 0 || self.tours_per_region == 0 {
            return Err(SkiTourError::validation(
                "regional search needs at least one region and one tour per region",
            ));
        }
        Ok(())
    }
}

/// Weather across the destinations of one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalWeather {
    /// Mean weather component score, 0-100
    pub avg_score: f64,
    pub point_count: usize,
    /// Destination with the best weather score
    pub best_point: String,
}

impl RegionalWeather {
    fn summarize(tours: &[(Destination, ScoringResult)]) -> Self {
        let point_count = tours.len();
        let avg_score = if point_count == 0 {
            0.0
        } else {
            tours.iter().map(|(_, r)| r.weather_score).sum::<f64>() / point_count as f64
        };
        let best_point = tours
            .iter()
            .max_by(|(_, a), (_, b)| a.weather_score.total_cmp(&b.weather_score))
            .map(|(d, _)| d.name.clone())
            .unwrap_or_default();
        Self {
            avg_score,
            point_count,
            best_point,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self.avg_score {
            s if s >= 80.0 => "Excellent conditions",
            s if s >= 65.0 => "Good conditions",
            s if s >= 50.0 => "Fair conditions",
            s if s >= 35.0 => "Marginal conditions",
            _ => "Poor conditions",
        }
    }
}

/// One region and its best tours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalRecommendation {
    pub region: String,
    pub weather: RegionalWeather,
    pub recommended_tours: Vec<RankedDestination>,
    pub region_score: f64,
    /// Distance to the nearest tour of the region
    pub nearest_km: f64,
    pub drive_hours: f64,
    pub why_recommended: String,
}

/// Everything produced by one regional run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalReport {
    pub generated_at: DateTime<Utc>,
    pub profile: UserProfile,
    pub start: Location,
    pub date: NaiveDate,
    pub max_driving_hours: f64,
    pub max_distance_km: f64,
    /// Regions with at least one tour in reach
    pub regions_analyzed: usize,
    pub tours_considered: usize,
    pub regions: Vec<RegionalRecommendation>,
}

/// `weather * 0.5 + best tour * 0.3 + variety * 0.2`, where variety gives
/// 20 points per recommended tour up to 100
#[must_use]
pub fn region_score(weather: &RegionalWeather, tours: &[RankedDestination]) -> f64 {
    let best_tour = tours.first().map_or(0.0, |t| t.result.total_score);
    let variety = (tours.len() as f64 * VARIETY_POINTS_PER_TOUR).min(100.0);
    weather.avg_score * WEATHER_SHARE + best_tour * BEST_TOUR_SHARE + variety * VARIETY_SHARE
}

fn rationale(weather: &RegionalWeather, tours: &[RankedDestination], profile: &UserProfile) -> String {
    let mut reasons = Vec::new();
    if weather.avg_score >= 80.0 {
        reasons.push("excellent weather conditions".to_string());
    } else if weather.avg_score >= 65.0 {
        reasons.push("good weather outlook".to_string());
    }
    if tours
        .iter()
        .any(|t| t.destination.terrain_type == profile.terrain_preference)
    {
        reasons.push("matches your terrain preference".to_string());
    }
    if let Some(feature) = tours.first().and_then(|t| t.destination.features.first()) {
        reasons.push(feature.clone());
    }
    if reasons.is_empty() {
        reasons.push("good overall conditions".to_string());
    }
    format!("Recommended for {}", reasons.join(", "))
}

/// Rank the regions whose nearest tour lies within `max_distance_km`.
///
/// Destinations without a region are left out. Every region in reach is
/// returned, best first; callers truncate to the number they want.
#[must_use]
pub fn rank_regions(
    scored: Vec<(Destination, ScoringResult)>,
    profile: &UserProfile,
    max_distance_km: f64,
    average_speed_kmh: f64,
    tours_per_region: usize,
) -> Vec<RegionalRecommendation> {
    let mut by_region: BTreeMap<String, Vec<(Destination, ScoringResult)>> = BTreeMap::new();
    for (destination, result) in scored {
        match destination.region.as_deref().map(str::trim) {
            Some(region) if !region.is_empty() => by_region
                .entry(region.to_string())
                .or_default()
                .push((destination, result)),
            _ => debug!("{} has no region, skipping", destination.name),
        }
    }

    let mut recommendations: Vec<RegionalRecommendation> = by_region
        .into_iter()
        .filter_map(|(region, tours)| {
            let nearest_km = tours
                .iter()
                .map(|(_, r)| r.distance_km)
                .fold(f64::INFINITY, f64::min);
            if nearest_km > max_distance_km {
                debug!("{} is {:.0} km away, too far", region, nearest_km);
                return None;
            }

            let weather = RegionalWeather::summarize(&tours);
            let mut recommended_tours = RankingPolicy::unbounded().rank(tours);
            recommended_tours.truncate(tours_per_region);

            let region_score = region_score(&weather, &recommended_tours);
            let why_recommended = rationale(&weather, &recommended_tours, profile);
            Some(RegionalRecommendation {
                region,
                weather,
                recommended_tours,
                region_score,
                nearest_km,
                drive_hours: nearest_km / average_speed_kmh,
                why_recommended,
            })
        })
        .collect();

    recommendations.sort_by(|a, b| b.region_score.total_cmp(&a.region_score));
    recommendations
}

impl fmt::Display for RegionalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "🗺️ Regional ski touring recommendations from {} for {}",
            self.start.name, self.date
        )?;
        writeln!(
            f,
            "   Max {:.1}h drive ({:.0} km) • {} regions in reach • {} tours considered",
            self.max_driving_hours, self.max_distance_km, self.regions_analyzed, self.tours_considered
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.profile.personality_type())?;
        writeln!(f)?;

        if self.regions.is_empty() {
            return writeln!(f, "No ski regions found within driving distance.");
        }

        for (rank, region) in self.regions.iter().enumerate() {
            writeln!(
                f,
                "{:>2}. {} - {:.0}/100 • {} ({:.0}/100 over {} tours)",
                rank + 1,
                region.region,
                region.region_score,
                region.weather.label(),
                region.weather.avg_score,
                region.weather.point_count
            )?;
            writeln!(
                f,
                "    🚗 {:.0}km ({:.1}h drive) to the nearest tour",
                region.nearest_km, region.drive_hours
            )?;
            writeln!(f, "    {}", region.why_recommended)?;
            for tour in &region.recommended_tours {
                writeln!(
                    f,
                    "      {} {} - {:.0}/100",
                    crate::report::standing_marker(tour.standing),
                    tour.destination.name,
                    tour.result.total_score
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TerrainType;
    use crate::models::destination::test_support::destination;
    use crate::scoring::{BASE_WEIGHTS, Standing};

    fn scored(
        name: &str,
        region: Option<&str>,
        distance_km: f64,
        weather_score: f64,
        total_score: f64,
    ) -> (Destination, ScoringResult) {
        let mut dest = destination(name, TerrainType::CoastalAlpine, 0.0, 1200.0);
        dest.region = region.map(str::to_string);
        dest.features = vec![format!("{name} couloir")];
        let result = ScoringResult {
            destination_name: name.to_string(),
            total_score,
            weather_score,
            snow_score: 70.0,
            avalanche_score: None,
            view_terrain_score: 70.0,
            distance_score: 50.0,
            distance_km,
            weights: BASE_WEIGHTS,
            within_range: distance_km <= 225.0,
            avalanche_data_available: false,
            snow_depth_analysis: None,
            personalized_summary: String::new(),
        };
        (dest, result)
    }

    #[test]
    fn test_region_score_formula() {
        let weather = RegionalWeather {
            avg_score: 80.0,
            point_count: 2,
            best_point: "A".to_string(),
        };
        let tours = RankingPolicy::unbounded().rank(vec![
            scored("A", Some("Lyngen"), 60.0, 90.0, 90.0),
            scored("B", Some("Lyngen"), 70.0, 70.0, 60.0),
        ]);
        // 80 * 0.5 + 90 * 0.3 + 40 * 0.2
        assert!((region_score(&weather, &tours) - 75.0).abs() < 1e-9);
        assert!((region_score(&weather, &[]) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_rank_regions_groups_filters_and_orders() {
        let profile = UserProfile {
            terrain_preference: TerrainType::CoastalAlpine,
            ..UserProfile::default()
        };
        let ranked = rank_regions(
            vec![
                scored("Store Lenangstind", Some("Lyngen"), 70.0, 85.0, 82.0),
                scored("Kjosen", Some("Lyngen"), 60.0, 75.0, 78.0),
                scored("Sofiatinden", Some("Lyngen"), 65.0, 80.0, 70.0),
                scored("Tromsdalstinden", Some("Tromsø"), 5.0, 40.0, 55.0),
                scored("Slogen", Some("Sunnmøre"), 900.0, 95.0, 60.0),
                scored("Loose", None, 10.0, 100.0, 99.0),
            ],
            &profile,
            225.0,
            70.0,
            2,
        );

        let names: Vec<&str> = ranked.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(names, vec!["Lyngen", "Tromsø"]);

        let lyngen = &ranked[0];
        assert_eq!(lyngen.weather.point_count, 3);
        assert!((lyngen.weather.avg_score - 80.0).abs() < 1e-9);
        assert_eq!(lyngen.weather.best_point, "Store Lenangstind");
        assert_eq!(lyngen.weather.label(), "Excellent conditions");
        assert_eq!(lyngen.recommended_tours.len(), 2);
        assert_eq!(lyngen.recommended_tours[0].destination.name, "Store Lenangstind");
        assert_eq!(lyngen.recommended_tours[0].standing, Standing::InRange);
        assert_eq!(lyngen.nearest_km, 60.0);
        assert!((lyngen.drive_hours - 60.0 / 70.0).abs() < 1e-9);
        assert_eq!(
            lyngen.why_recommended,
            "Recommended for excellent weather conditions, matches your terrain preference, Store Lenangstind couloir"
        );

        assert_eq!(ranked[1].weather.label(), "Marginal conditions");
    }

    #[test]
    fn test_options_validation() {
        assert!(RegionalOptions::default().validate().is_ok());
        let none = RegionalOptions {
            top_regions: 0,
            ..RegionalOptions::default()
        };
        assert!(matches!(none.validate(), Err(SkiTourError::Validation { .. })));
    }
}
