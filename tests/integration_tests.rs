//! Integration tests for the bundled data files, the planner and what it persists

use chrono::NaiveDate;
use skitour::config::SkiTourConfig;
use skitour::planner::{Planner, Providers, SearchParameters};
use skitour::profiles::{list_profiles, load_profile, save_profile};
use skitour::providers::{Gazetteer, SnapshotProvider};
use skitour::quiz::profile_from_answers;
use skitour::report::{list_reports, load_report, save_report};
use skitour::scoring::Standing;
use skitour::{Catalog, PersistentCache, RegionalOptions, SkiTourError, UserProfile};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn data_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

fn march_14() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

/// Planner over the bundled snapshot with a cache in a fresh temp directory
fn planner(config: &SkiTourConfig) -> (Planner, TempDir) {
    let snapshot = SnapshotProvider::load(&data_file("conditions.json")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut config = config.clone();
    config.providers.min_call_interval_ms = 0;
    config.data.cache_dir = dir.path().join("cache");
    let cache = PersistentCache::from_config(&config).unwrap();
    let planner = Planner::new(
        &config,
        Providers::from_single(Arc::new(snapshot)),
        Arc::new(cache),
    );
    (planner, dir)
}

#[test]
fn test_bundled_catalog_is_valid() {
    let catalog = Catalog::load(&data_file("destinations.json")).unwrap();
    assert!(catalog.len() >= 12);
    assert!(catalog.find("store lenangstind").is_some());
    assert!(catalog.find("Galdhøpiggen").is_some());
}

#[test]
fn test_snapshot_covers_catalog_points() {
    let catalog = Catalog::load(&data_file("destinations.json")).unwrap();
    let snapshot = SnapshotProvider::load(&data_file("conditions.json")).unwrap();
    let covered = catalog
        .iter()
        .filter(|d| {
            snapshot
                .snapshot()
                .points
                .iter()
                .any(|p| p.name == d.name)
        })
        .count();
    assert!(covered >= catalog.len() - 1);
}

#[test]
fn test_example_config_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/skitour.example.toml");
    let config = SkiTourConfig::load_from_path(Some(path)).unwrap();
    assert_eq!(config.search.top_n, 8);
    assert_eq!(config.search.driving_distances.len(), 3);
    assert!(config.validate().is_ok());
}

#[tokio::test]
async fn test_recommend_from_tromso() {
    let config = SkiTourConfig::default();
    let catalog = Catalog::load(&data_file("destinations.json")).unwrap();
    let start = Gazetteer::default().resolve("Tromsø").unwrap();
    let params = SearchParameters::new(start, &config.search);

    let (planner, _cache_dir) = planner(&config);
    let report = planner
        .recommend(&catalog, &UserProfile::default(), &params, march_14())
        .await
        .unwrap();

    assert_eq!(report.search.total_analyzed, catalog.len());
    assert_eq!(report.search.max_distance_km, 225.0);
    assert!(report.search.avalanche_data_available);
    assert!(report.recommendations.len() <= config.search.top_n);

    let first = &report.recommendations[0];
    assert_eq!(first.standing, Standing::InRange);
    assert!(first.result.distance_km <= 225.0);
    assert!(report.in_range().all(|r| r.result.within_range));
    assert!(
        report
            .recommendations
            .iter()
            .all(|r| r.destination.name != "Nordmarka Skiing" || r.standing != Standing::InRange)
    );
}

#[tokio::test]
async fn test_quiz_profile_changes_scoring() {
    let config = SkiTourConfig::default();
    let catalog = Catalog::load(&data_file("destinations.json")).unwrap();
    let start = Gazetteer::default().resolve("69.6492,18.9553").unwrap();
    let params = SearchParameters::new(start, &config.search);
    let (planner, _cache_dir) = planner(&config);

    let neutral = planner
        .recommend(&catalog, &UserProfile::default(), &params, march_14())
        .await
        .unwrap();
    let powder = profile_from_answers(&[1, 1, 2, 1, 0, 2, 1]).unwrap();
    let hunter = planner
        .recommend(&catalog, &powder, &params, march_14())
        .await
        .unwrap();

    assert_eq!(hunter.profile.powder_priority, 10);
    let totals = |report: &skitour::RecommendationReport| {
        report
            .recommendations
            .iter()
            .map(|r| (r.destination.name.clone(), r.result.total_score))
            .collect::<Vec<_>>()
    };
    assert_ne!(totals(&neutral), totals(&hunter));
}

#[tokio::test]
async fn test_save_and_reload_report() {
    let config = SkiTourConfig::default();
    let catalog = Catalog::load(&data_file("destinations.json")).unwrap();
    let start = Gazetteer::default().resolve("Narvik").unwrap();
    let params = SearchParameters::new(start, &config.search);
    let (planner, _cache_dir) = planner(&config);
    let report = planner
        .recommend(&catalog, &UserProfile::default(), &params, march_14())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = save_report(dir.path(), &report).unwrap();
    assert!(path.file_name().unwrap().to_string_lossy().starts_with("ski_touring_Narvik_"));
    assert_eq!(list_reports(dir.path()).unwrap(), vec![path.clone()]);

    let loaded = load_report(&path).unwrap();
    assert_eq!(loaded.search.start.name, "Narvik");
    assert_eq!(loaded.profile, report.profile);
    let names = |r: &skitour::RecommendationReport| {
        r.recommendations
            .iter()
            .map(|entry| entry.destination.name.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&loaded), names(&report));
}

#[tokio::test]
async fn test_invalid_parameters_are_rejected_before_scoring() {
    let config = SkiTourConfig::default();
    let catalog = Catalog::load(&data_file("destinations.json")).unwrap();
    let start = Gazetteer::default().resolve("Bodø").unwrap();
    let mut params = SearchParameters::new(start, &config.search);
    params.max_driving_hours = 0.0;

    let (planner, _cache_dir) = planner(&config);
    let err = planner
        .recommend(&catalog, &UserProfile::default(), &params, march_14())
        .await
        .unwrap_err();
    assert!(matches!(err, SkiTourError::Validation { .. }));
}

#[test]
fn test_every_bundled_destination_has_a_region() {
    let catalog = Catalog::load(&data_file("destinations.json")).unwrap();
    let missing: Vec<_> = catalog
        .iter()
        .filter(|d| d.region.as_deref().is_none_or(|r| r.trim().is_empty()))
        .map(|d| d.name.clone())
        .collect();
    assert!(missing.is_empty(), "no region for {missing:?}");
}

#[tokio::test]
async fn test_recommend_by_region_from_tromso() {
    let config = SkiTourConfig::default();
    let catalog = Catalog::load(&data_file("destinations.json")).unwrap();
    let start = Gazetteer::default().resolve("Tromsø").unwrap();
    let params = SearchParameters::new(start, &config.search);
    let (planner, _cache_dir) = planner(&config);

    let report = planner
        .recommend_by_region(
            &catalog,
            &UserProfile::default(),
            &params,
            RegionalOptions::default(),
            march_14(),
        )
        .await
        .unwrap();

    assert_eq!(report.max_distance_km, 225.0);
    assert!(!report.regions.is_empty());
    assert!(report.regions.len() <= 3);
    assert!(report.regions_analyzed >= report.regions.len());
    assert!(
        report
            .regions
            .windows(2)
            .all(|pair| pair[0].region_score >= pair[1].region_score)
    );
    for region in &report.regions {
        assert!(region.nearest_km <= 225.0);
        assert!(!["Sunnmøre", "Jotunheimen", "Oslo"].contains(&region.region.as_str()));
        assert!(region.recommended_tours.len() <= 3);
        assert!(
            region
                .recommended_tours
                .iter()
                .all(|t| t.destination.region.as_deref() == Some(region.region.as_str()))
        );
    }
    assert!(report.to_string().contains("Regional ski touring recommendations from Tromsø"));
}

#[tokio::test]
async fn test_saved_quiz_profile_drives_a_later_run() {
    let config = SkiTourConfig::default();
    let catalog = Catalog::load(&data_file("destinations.json")).unwrap();
    let start = Gazetteer::default().resolve("Tromsø").unwrap();
    let params = SearchParameters::new(start, &config.search);
    let results = tempfile::tempdir().unwrap();

    let powder = profile_from_answers(&[1, 1, 2, 1, 0, 2, 1]).unwrap();
    save_profile(results.path(), "powder", &powder).unwrap();
    assert_eq!(list_profiles(results.path()).unwrap(), vec!["powder"]);

    let loaded = load_profile(results.path(), "powder").unwrap();
    assert_eq!(loaded, powder);
    let (planner, _cache_dir) = planner(&config);
    let report = planner
        .recommend(&catalog, &loaded, &params, march_14())
        .await
        .unwrap();
    assert_eq!(report.profile.powder_priority, 10);
}

#[test]
fn test_unknown_start_is_not_found() {
    let err = Gazetteer::default().resolve("Atlantis").unwrap_err();
    assert!(matches!(err, SkiTourError::NotFound { .. }));
}
