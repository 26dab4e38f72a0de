//! Recommendation service
//!
//! Fetches conditions for every catalog destination through the provider
//! gates, scores them against the user's profile and ranks the result,
//! either per destination or per region.

use crate::cache::PersistentCache;
use crate::catalog::Catalog;
use crate::config::{SearchConfig, SkiTourConfig};
use crate::distance::{distance_km, max_distance_for_hours};
use crate::error::SkiTourError;
use crate::models::{
    AvalancheOutlook, Destination, Location, SnowReading, UserProfile, WeatherReading,
};
use crate::providers::{
    AvalancheProvider, CoordinateKey, ProviderGate, SnowProvider, WeatherProvider,
};
use crate::regional::{RegionalOptions, RegionalReport, rank_regions};
use crate::report::{RecommendationReport, SearchInfo};
use crate::scoring::{
    Conditions, RankingPolicy, ScoringEngine, ScoringResult, ScoringWeights, TripContext,
};
use chrono::{NaiveDate, Utc};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// What the user asked for
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParameters {
    pub start: Location,
    pub max_driving_hours: f64,
    /// Hours the user accepts carrying skis to reach skiable snow
    pub max_walking_hours: f64,
    pub top_n: usize,
    /// Tolerance to retry with when nothing is skiable from the parking
    pub walking_fallback_hours: Option<f64>,
}

impl SearchParameters {
    /// Parameters with the configured defaults
    #[must_use]
    pub fn new(start: Location, search: &SearchConfig) -> Self {
        Self {
            start,
            max_driving_hours: search.default_max_driving_hours,
            max_walking_hours: search.default_max_walking_hours,
            top_n: search.top_n,
            walking_fallback_hours: None,
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !(self.max_driving_hours.is_finite() && self.max_driving_hours > 0.0) {
            return Err(SkiTourError::validation(format!(
                "max driving hours must be a positive number, got {}",
                self.max_driving_hours
            )));
        }
        if !(self.max_walking_hours.is_finite() && self.max_walking_hours >= 0.0) {
            return Err(SkiTourError::validation(format!(
                "max walking hours must be zero or more, got {}",
                self.max_walking_hours
            )));
        }
        if let Some(fallback) = self
            .walking_fallback_hours
            .filter(|h| !(h.is_finite() && *h >= 0.0))
        {
            return Err(SkiTourError::validation(format!(
                "walking fallback hours must be zero or more, got {fallback}"
            )));
        }
        if self.top_n == 0 {
            return Err(SkiTourError::validation("top_n must be at least 1"));
        }
        if !(self.start.latitude.is_finite() && self.start.longitude.is_finite()) {
            return Err(SkiTourError::validation("start location has invalid coordinates"));
        }
        Ok(())
    }
}

/// The three condition sources the planner reads from
#[derive(Clone)]
pub struct Providers {
    pub weather: Arc<dyn WeatherProvider>,
    pub snow: Arc<dyn SnowProvider>,
    pub avalanche: Arc<dyn AvalancheProvider>,
}

impl Providers {
    /// One value serving all three kinds of reading
    pub fn from_single<P>(provider: Arc<P>) -> Self
    where
        P: WeatherProvider + SnowProvider + AvalancheProvider + 'static,
    {
        Self {
            weather: provider.clone(),
            snow: provider.clone(),
            avalanche: provider,
        }
    }
}

/// Readings fetched for one destination
#[derive(Debug, Clone)]
struct Gathered {
    destination: Destination,
    weather: Option<WeatherReading>,
    snow: Option<SnowReading>,
    avalanche: Option<AvalancheOutlook>,
}

/// Scores for the whole catalog and the walking tolerance they used
struct ScoredRun {
    scored: Vec<(Destination, ScoringResult)>,
    walking_hours: f64,
    walking_fallback_used: bool,
}

pub struct Planner {
    engine: ScoringEngine,
    search: SearchConfig,
    max_concurrency: usize,
    precision: u32,
    providers: Providers,
    weather_gate: ProviderGate<WeatherReading>,
    snow_gate: ProviderGate<SnowReading>,
    avalanche_gate: ProviderGate<AvalancheOutlook>,
}

impl Planner {
    /// Readings are cached in `cache` and survive between runs
    #[must_use]
    pub fn new(config: &SkiTourConfig, providers: Providers, cache: Arc<PersistentCache>) -> Self {
        let gate_config = &config.providers;
        Self {
            engine: ScoringEngine::new(config.scoring.clone()),
            search: config.search.clone(),
            max_concurrency: gate_config.max_concurrency.max(1),
            precision: gate_config.coordinate_precision,
            weather_gate: ProviderGate::from_config(
                "weather",
                providers.weather.name(),
                cache.clone(),
                gate_config,
            ),
            snow_gate: ProviderGate::from_config(
                "snow",
                providers.snow.name(),
                cache.clone(),
                gate_config,
            ),
            avalanche_gate: ProviderGate::from_config(
                "avalanche",
                providers.avalanche.name(),
                cache,
                gate_config,
            ),
            providers,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Rank the catalog for a user and trip
    #[instrument(skip_all, fields(start = %params.start.name, hours = params.max_driving_hours))]
    pub async fn recommend(
        &self,
        catalog: &Catalog,
        profile: &UserProfile,
        params: &SearchParameters,
        date: NaiveDate,
    ) -> crate::Result<RecommendationReport> {
        profile.validate()?;
        params.validate()?;

        let max_distance_km = max_distance_for_hours(params.max_driving_hours, &self.search);
        info!(
            "Analyzing {} destinations within {:.0} km of {}",
            catalog.len(),
            max_distance_km,
            params.start.name
        );

        let ScoredRun {
            scored,
            walking_hours,
            walking_fallback_used,
        } = self
            .gather_and_score(catalog, profile, params, max_distance_km, date)
            .await?;

        let within_range_count = scored.iter().filter(|(_, r)| r.within_range).count();
        let skiable_count = scored.iter().filter(|(_, r)| r.is_skiable()).count();
        let avalanche_data_available = scored.iter().any(|(_, r)| r.avalanche_data_available);
        let total_analyzed = scored.len();

        let mut recommendations = RankingPolicy::presentation().rank(scored);
        recommendations.truncate(params.top_n);

        info!(
            "{} in range, {} skiable, returning {}",
            within_range_count,
            skiable_count,
            recommendations.len()
        );

        let scoring_explanation = ScoringWeights::for_profile(profile, avalanche_data_available)
            .explanation(avalanche_data_available);

        Ok(RecommendationReport {
            generated_at: Utc::now(),
            profile: profile.clone(),
            search: SearchInfo {
                start: params.start.clone(),
                date,
                max_driving_hours: params.max_driving_hours,
                max_distance_km,
                max_walking_hours: walking_hours,
                walking_fallback_used,
                total_analyzed,
                within_range_count,
                skiable_count,
                avalanche_data_available,
            },
            recommendations,
            scoring_explanation,
        })
    }

    /// Rank the regions in reach and their best tours.
    ///
    /// Destinations are scored exactly as in [`Planner::recommend`], then
    /// grouped by their catalog region.
    #[instrument(skip_all, fields(start = %params.start.name, hours = params.max_driving_hours))]
    pub async fn recommend_by_region(
        &self,
        catalog: &Catalog,
        profile: &UserProfile,
        params: &SearchParameters,
        options: RegionalOptions,
        date: NaiveDate,
    ) -> crate::Result<RegionalReport> {
        profile.validate()?;
        params.validate()?;
        options.validate()?;

        let max_distance_km = max_distance_for_hours(params.max_driving_hours, &self.search);
        info!(
            "Analyzing regions within {:.0} km of {}",
            max_distance_km, params.start.name
        );

        let run = self
            .gather_and_score(catalog, profile, params, max_distance_km, date)
            .await?;
        let mut regions = rank_regions(
            run.scored,
            profile,
            max_distance_km,
            self.search.average_driving_speed_kmh,
            options.tours_per_region,
        );
        let regions_analyzed = regions.len();
        let tours_considered = regions.iter().map(|r| r.weather.point_count).sum();
        regions.truncate(options.top_regions);

        info!(
            "{} regions in reach, returning {}",
            regions_analyzed,
            regions.len()
        );

        Ok(RegionalReport {
            generated_at: Utc::now(),
            profile: profile.clone(),
            start: params.start.clone(),
            date,
            max_driving_hours: params.max_driving_hours,
            max_distance_km,
            regions_analyzed,
            tours_considered,
            regions,
        })
    }

    /// Gather every destination's readings and score them, widening the
    /// walking tolerance once when nothing is skiable from the parking
    async fn gather_and_score(
        &self,
        catalog: &Catalog,
        profile: &UserProfile,
        params: &SearchParameters,
        max_distance_km: f64,
        date: NaiveDate,
    ) -> crate::Result<ScoredRun> {
        let gathered = futures::stream::iter(catalog.iter().map(|d| self.gather(d, date)))
            .buffered(self.max_concurrency)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<crate::Result<Vec<_>>>()?;

        let mut walking_hours = params.max_walking_hours;
        let mut scored = self.score_all(&gathered, profile, params, max_distance_km, walking_hours)?;

        let mut walking_fallback_used = false;
        let nothing_skiable = !scored.iter().any(|(_, r)| r.is_skiable());
        if let Some(fallback) = params.walking_fallback_hours {
            if nothing_skiable && walking_hours == 0.0 && fallback > 0.0 && !scored.is_empty() {
                info!(
                    "No destination is skiable from the parking, retrying with {:.1}h walking",
                    fallback
                );
                walking_hours = fallback;
                walking_fallback_used = true;
                scored =
                    self.score_all(&gathered, profile, params, max_distance_km, walking_hours)?;
            }
        }

        Ok(ScoredRun {
            scored,
            walking_hours,
            walking_fallback_used,
        })
    }

    fn score_all(
        &self,
        gathered: &[Gathered],
        profile: &UserProfile,
        params: &SearchParameters,
        max_distance_km: f64,
        max_walking_hours: f64,
    ) -> crate::Result<Vec<(Destination, ScoringResult)>> {
        gathered
            .iter()
            .map(|g| {
                let trip = TripContext {
                    distance_km: distance_km(&params.start, &g.destination),
                    max_distance_km,
                    max_walking_hours,
                    average_speed_kmh: self.search.average_driving_speed_kmh,
                };
                let conditions = Conditions {
                    weather: g.weather.as_ref(),
                    snow: g.snow.as_ref(),
                    avalanche: g.avalanche.as_ref().and_then(AvalancheOutlook::reading),
                };
                let result = self.engine.score(&g.destination, conditions, trip, profile)?;
                Ok((g.destination.clone(), result))
            })
            .collect()
    }

    /// Fetch all three readings for one destination.
    ///
    /// Transient provider failures degrade to "no data"; anything else aborts
    /// the run.
    async fn gather(&self, destination: &Destination, date: NaiveDate) -> crate::Result<Gathered> {
        let point = Location::new(
            destination.latitude,
            destination.longitude,
            destination.name.clone(),
        );
        let key = CoordinateKey::for_location(&point, self.precision).to_string();
        let dated_key = format!("{key}@{date}");

        let (weather, snow, avalanche) = tokio::join!(
            self.weather_gate
                .fetch(&key, || self.providers.weather.weather(&point)),
            self.snow_gate.fetch(&key, || self.providers.snow.snow(&point)),
            self.avalanche_gate
                .fetch(&dated_key, || self.providers.avalanche.avalanche(&point, date)),
        );

        let gathered = Gathered {
            destination: destination.clone(),
            weather: degrade(weather, self.weather_gate.name(), &destination.name)?,
            snow: degrade(snow, self.snow_gate.name(), &destination.name)?,
            avalanche: degrade(avalanche, self.avalanche_gate.name(), &destination.name)?,
        };
        debug!(
            destination = %destination.name,
            weather = gathered.weather.is_some(),
            snow = gathered.snow.is_some(),
            avalanche = gathered.avalanche.is_some(),
            "gathered conditions"
        );
        Ok(gathered)
    }
}

fn degrade<T>(
    result: crate::Result<Option<T>>,
    provider: &str,
    destination: &str,
) -> crate::Result<Option<T>> {
    match result {
        Err(e) if e.is_transient() => {
            warn!("{} unavailable for {}: {}", provider, destination, e);
            Ok(None)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::destination::test_support::destination;
    use crate::models::{
        AvalancheReading, DangerLevel, TemperatureTrend, TerrainType, WindEffect,
    };
    use crate::providers::Fetch;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Same readings everywhere; optionally fails every weather call
    struct Uniform {
        snow_depth_cm: f64,
        fail_weather: bool,
        calls: AtomicUsize,
    }

    impl Uniform {
        fn new(snow_depth_cm: f64) -> Self {
            Self {
                snow_depth_cm,
                fail_weather: false,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WeatherProvider for Uniform {
        fn name(&self) -> &str {
            "uniform weather"
        }

        async fn weather(&self, _point: &Location) -> crate::Result<Fetch<WeatherReading>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_weather {
                return Err(SkiTourError::provider("uniform weather", "timed out"));
            }
            Ok(Fetch::Fresh(WeatherReading::steady(-6.0, 0.0, 3.0).with_humidity(65.0)))
        }
    }

    #[async_trait]
    impl SnowProvider for Uniform {
        fn name(&self) -> &str {
            "uniform snow"
        }

        async fn snow(&self, _point: &Location) -> crate::Result<Fetch<SnowReading>> {
            Ok(Fetch::Fresh(SnowReading {
                snow_depth_cm: self.snow_depth_cm,
                snowfall_3days_cm: 10.0,
                temperature_trend: TemperatureTrend::Stable,
                wind_effect: WindEffect::Minimal,
                reference_elevation_m: 500.0,
            }))
        }
    }

    #[async_trait]
    impl AvalancheProvider for Uniform {
        fn name(&self) -> &str {
            "uniform avalanche"
        }

        async fn avalanche(
            &self,
            _point: &Location,
            _date: NaiveDate,
        ) -> crate::Result<Fetch<AvalancheOutlook>> {
            Ok(Fetch::Fresh(AvalancheOutlook::Warning(AvalancheReading::new(
                DangerLevel::MODERATE,
            ))))
        }
    }

    fn config() -> SkiTourConfig {
        let mut config = SkiTourConfig::default();
        config.providers.min_call_interval_ms = 0;
        config
    }

    fn planner_with(config: &SkiTourConfig, provider: Arc<Uniform>) -> (Planner, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let cache = PersistentCache::open(dir.path(), Duration::from_secs(3600)).unwrap();
        let planner = Planner::new(config, Providers::from_single(provider), Arc::new(cache));
        (planner, dir)
    }

    fn planner(provider: Arc<Uniform>) -> (Planner, TempDir) {
        planner_with(&config(), provider)
    }

    fn catalog() -> Catalog {
        let mut near = destination("Near", TerrainType::CoastalAlpine, 500.0, 1300.0);
        near.latitude = 69.70;
        near.longitude = 19.40;
        let mut far = destination("Far", TerrainType::HighAlpine, 500.0, 1300.0);
        far.latitude = 61.60;
        far.longitude = 8.30;
        Catalog::new(vec![near, far]).unwrap()
    }

    fn params() -> SearchParameters {
        SearchParameters::new(
            Location::new(69.6492, 18.9553, "Tromsø"),
            &SkiTourConfig::default().search,
        )
    }

    fn march() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[tokio::test]
    async fn test_recommend_ranks_in_range_first() {
        let (planner, _cache) = planner(Arc::new(Uniform::new(120.0)));
        let report = planner
            .recommend(&catalog(), &UserProfile::default(), &params(), march())
            .await
            .unwrap();

        assert_eq!(report.search.total_analyzed, 2);
        assert_eq!(report.search.within_range_count, 1);
        assert!(report.search.avalanche_data_available);
        assert_eq!(report.recommendations[0].destination.name, "Near");
        assert_eq!(report.recommendations[1].destination.name, "Far");
        assert!(!report.recommendations[1].result.within_range);
    }

    #[tokio::test]
    async fn test_transient_failure_degrades_to_no_data() {
        let provider = Arc::new(Uniform {
            fail_weather: true,
            ..Uniform::new(120.0)
        });
        let (planner, _cache) = planner(provider.clone());
        let report = planner
            .recommend(&catalog(), &UserProfile::default(), &params(), march())
            .await
            .unwrap();
        assert_eq!(report.recommendations.len(), 2);
        assert_eq!(report.recommendations[0].result.weather_score, 50.0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_walking_fallback_reruns_once() {
        // 5 cm at 500 m: nothing skiable from the parking
        let (planner, _cache) = planner(Arc::new(Uniform::new(5.0)));
        let mut params = params();
        params.walking_fallback_hours = Some(2.0);

        let report = planner
            .recommend(&catalog(), &UserProfile::default(), &params, march())
            .await
            .unwrap();
        assert!(report.search.walking_fallback_used);
        assert_eq!(report.search.max_walking_hours, 2.0);
        assert!(report.search.skiable_count > 0);
    }

    #[tokio::test]
    async fn test_invalid_parameters_rejected() {
        let (planner, _cache) = planner(Arc::new(Uniform::new(120.0)));
        let mut params = params();
        params.max_driving_hours = 0.0;
        let err = planner
            .recommend(&catalog(), &UserProfile::default(), &params, march())
            .await
            .unwrap_err();
        assert!(matches!(err, SkiTourError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_top_n_truncates() {
        let (planner, _cache) = planner(Arc::new(Uniform::new(120.0)));
        let mut params = params();
        params.top_n = 1;
        let report = planner
            .recommend(&catalog(), &UserProfile::default(), &params, march())
            .await
            .unwrap();
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.search.total_analyzed, 2);
    }

    #[tokio::test]
    async fn test_summary_uses_configured_driving_speed() {
        let mut config = config();
        config.search.average_driving_speed_kmh = 35.0;
        let (planner, _cache) = planner_with(&config, Arc::new(Uniform::new(120.0)));
        let report = planner
            .recommend(&catalog(), &UserProfile::default(), &params(), march())
            .await
            .unwrap();

        let near = &report.recommendations[0].result;
        let expected = format!("({:.1}h drive)", near.distance_km / 35.0);
        assert!(near.personalized_summary.contains(&expected));
    }

    #[tokio::test]
    async fn test_cached_readings_are_reused_by_a_new_planner() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(PersistentCache::open(dir.path(), Duration::from_secs(3600)).unwrap());

        let first = Arc::new(Uniform::new(120.0));
        Planner::new(&config(), Providers::from_single(first.clone()), cache.clone())
            .recommend(&catalog(), &UserProfile::default(), &params(), march())
            .await
            .unwrap();
        assert_eq!(first.calls.load(Ordering::SeqCst), 2);

        let second = Arc::new(Uniform::new(120.0));
        let report = Planner::new(&config(), Providers::from_single(second.clone()), cache)
            .recommend(&catalog(), &UserProfile::default(), &params(), march())
            .await
            .unwrap();
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.recommendations.len(), 2);
    }

    #[tokio::test]
    async fn test_recommend_by_region() {
        let mut tours = catalog().into_iter().collect::<Vec<_>>();
        tours[0].region = Some("Lyngen".to_string());
        tours[1].region = Some("Jotunheimen".to_string());
        let mut second = tours[0].clone();
        second.name = "Near Two".to_string();
        second.latitude = 69.75;
        tours.push(second);
        let catalog = Catalog::new(tours).unwrap();

        let (planner, _cache) = planner(Arc::new(Uniform::new(120.0)));
        let options = RegionalOptions {
            top_regions: 3,
            tours_per_region: 1,
        };
        let report = planner
            .recommend_by_region(&catalog, &UserProfile::default(), &params(), options, march())
            .await
            .unwrap();

        assert_eq!(report.regions_analyzed, 1);
        assert_eq!(report.tours_considered, 2);
        let lyngen = &report.regions[0];
        assert_eq!(lyngen.region, "Lyngen");
        assert_eq!(lyngen.weather.point_count, 2);
        assert_eq!(lyngen.recommended_tours.len(), 1);
        assert!(lyngen.region_score > 0.0);
        assert!(report.to_string().contains("1. Lyngen"));

        let err = planner
            .recommend_by_region(
                &catalog,
                &UserProfile::default(),
                &params(),
                RegionalOptions {
                    tours_per_region: 0,
                    ..options
                },
                march(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SkiTourError::Validation { .. }));
    }

    #[test]
    fn test_search_parameters_validation() {
        let mut params = params();
        assert!(params.validate().is_ok());
        params.max_walking_hours = -1.0;
        assert!(params.validate().is_err());
        params.max_walking_hours = 0.0;
        params.walking_fallback_hours = Some(f64::NAN);
        assert!(params.validate().is_err());
        params.walking_fallback_hours = None;
        params.top_n = 0;
        assert!(params.validate().is_err());
    }
}
