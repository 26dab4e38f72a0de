//! Configuration management for the ski touring planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SkiTourError;
use crate::scoring::ScoringTables;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the planner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkiTourConfig {
    /// Provider throttling and caching
    pub providers: ProvidersConfig,
    /// Search defaults and driving-range table
    pub search: SearchConfig,
    /// Data file locations
    pub data: DataConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Terrain and access lookup tables
    pub scoring: ScoringTables,
}

/// Provider throttling and caching settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Minimum spacing between calls to the same provider
    #[serde(default = "default_min_call_interval")]
    pub min_call_interval_ms: u64,
    /// How long a cached reading stays fresh
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_minutes: u64,
    /// How long an expired reading is kept for "not modified" replies
    #[serde(default = "default_stale_retention")]
    pub stale_retention_hours: u64,
    /// Decimal places used for cache keys
    #[serde(default = "default_coordinate_precision")]
    pub coordinate_precision: u32,
    /// Destinations evaluated concurrently
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

/// One row of the curated driving-range table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrivingDistance {
    pub hours: u32,
    pub distance_km: f64,
}

/// Search defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_max_driving_hours")]
    pub default_max_driving_hours: f64,
    #[serde(default)]
    pub default_max_walking_hours: f64,
    /// Number of recommendations kept in a report
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_average_speed")]
    pub average_driving_speed_kmh: f64,
    /// Road distances for whole-hour budgets
    #[serde(default = "default_driving_distances")]
    pub driving_distances: Vec<DrivingDistance>,
}

/// Data file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_destinations_file")]
    pub destinations_file: PathBuf,
    /// Conditions snapshot used by the offline providers
    #[serde(default = "default_conditions_file")]
    pub conditions_file: PathBuf,
    /// Where saved reports are written
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    /// Provider reading cache, kept between runs
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_min_call_interval() -> u64 {
    700
}

fn default_cache_ttl() -> u64 {
    60
}

fn default_stale_retention() -> u64 {
    24
}

fn default_coordinate_precision() -> u32 {
    4
}

fn default_max_concurrency() -> usize {
    4
}

fn default_max_driving_hours() -> f64 {
    3.0
}

fn default_top_n() -> usize {
    8
}

fn default_average_speed() -> f64 {
    crate::distance::AVERAGE_DRIVING_SPEED_KMH
}

fn default_driving_distances() -> Vec<DrivingDistance> {
    vec![
        DrivingDistance {
            hours: 1,
            distance_km: 90.0,
        },
        DrivingDistance {
            hours: 3,
            distance_km: 225.0,
        },
        DrivingDistance {
            hours: 5,
            distance_km: 350.0,
        },
    ]
}

fn default_destinations_file() -> PathBuf {
    PathBuf::from("data/destinations.json")
}

fn default_conditions_file() -> PathBuf {
    PathBuf::from("data/conditions.json")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("data/results")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data/cache")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            min_call_interval_ms: default_min_call_interval(),
            cache_ttl_minutes: default_cache_ttl(),
            stale_retention_hours: default_stale_retention(),
            coordinate_precision: default_coordinate_precision(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_max_driving_hours: default_max_driving_hours(),
            default_max_walking_hours: 0.0,
            top_n: default_top_n(),
            average_driving_speed_kmh: default_average_speed(),
            driving_distances: default_driving_distances(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            destinations_file: default_destinations_file(),
            conditions_file: default_conditions_file(),
            results_dir: default_results_dir(),
            cache_dir: default_cache_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SkiTourConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    ///
    /// Environment overrides use the `SKITOUR_` prefix with `__` between
    /// nested keys, e.g. `SKITOUR_SEARCH__TOP_N=5`.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("SKITOUR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SkiTourConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration from {}", config_file.display()))?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skitour").join("config.toml"))
    }

    /// Apply default values to empty or zeroed configuration fields
    pub fn apply_defaults(&mut self) {
        if self.providers.coordinate_precision == 0 {
            self.providers.coordinate_precision = default_coordinate_precision();
        }
        if self.providers.max_concurrency == 0 {
            self.providers.max_concurrency = default_max_concurrency();
        }
        if self.search.top_n == 0 {
            self.search.top_n = default_top_n();
        }
        if self.search.average_driving_speed_kmh == 0.0 {
            self.search.average_driving_speed_kmh = default_average_speed();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        self.scoring.fill_missing();
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.scoring.validate()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.providers.coordinate_precision > 8 {
            return Err(SkiTourError::config("Coordinate precision cannot exceed 8 decimals").into());
        }

        if self.providers.cache_ttl_minutes > 24 * 60 {
            return Err(SkiTourError::config("Cache TTL cannot exceed 1440 minutes (1 day)").into());
        }

        if self.providers.stale_retention_hours > 24 * 30 {
            return Err(SkiTourError::config("Stale retention cannot exceed 720 hours (30 days)").into());
        }

        if self.providers.max_concurrency > 64 {
            return Err(SkiTourError::config("Provider concurrency cannot exceed 64").into());
        }

        if !(self.search.default_max_driving_hours > 0.0
            && self.search.default_max_driving_hours <= 24.0)
        {
            return Err(SkiTourError::config(
                "Default driving hours must be greater than 0 and at most 24",
            )
            .into());
        }

        if !(0.0..=12.0).contains(&self.search.default_max_walking_hours) {
            return Err(SkiTourError::config("Default walking hours must be between 0 and 12").into());
        }

        if self.search.top_n > 100 {
            return Err(SkiTourError::config("Top N cannot exceed 100").into());
        }

        if !(self.search.average_driving_speed_kmh > 0.0
            && self.search.average_driving_speed_kmh <= 130.0)
        {
            return Err(SkiTourError::config(
                "Average driving speed must be greater than 0 and at most 130 km/h",
            )
            .into());
        }

        if let Some(band) = self
            .search
            .driving_distances
            .iter()
            .find(|band| band.hours == 0 || !(band.distance_km > 0.0))
        {
            return Err(SkiTourError::config(format!(
                "Invalid driving distance entry: {} h -> {} km",
                band.hours, band.distance_km
            ))
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkiTourError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "compact"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SkiTourError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TerrainType;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SkiTourConfig::default();
        assert_eq!(config.providers.min_call_interval_ms, 700);
        assert_eq!(config.providers.coordinate_precision, 4);
        assert_eq!(config.search.top_n, 8);
        assert_eq!(config.search.default_max_driving_hours, 3.0);
        assert_eq!(config.search.driving_distances.len(), 3);
        assert_eq!(config.providers.stale_retention_hours, 24);
        assert_eq!(config.data.cache_dir, PathBuf::from("data/cache"));
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = SkiTourConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_invalid_log_format() {
        let mut config = SkiTourConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = SkiTourConfig::default();
        config.search.default_max_driving_hours = 0.0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("driving hours"));
    }

    #[test]
    fn test_config_validation_bad_driving_band() {
        let mut config = SkiTourConfig::default();
        config.search.driving_distances.push(DrivingDistance {
            hours: 2,
            distance_km: -1.0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_zeroes() {
        let mut config = SkiTourConfig::default();
        config.search.top_n = 0;
        config.logging.level = String::new();
        config.apply_defaults();
        assert_eq!(config.search.top_n, 8);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[search]
top_n = 5
default_max_driving_hours = 2.0

[logging]
level = "debug"

[scoring.terrain.forest_valley]
view_multiplier = 0.5
difficulty_modifier = 0.6
"#
        )
        .unwrap();

        let config = SkiTourConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.search.top_n, 5);
        assert_eq!(config.search.default_max_driving_hours, 2.0);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.scoring.view_multiplier(TerrainType::ForestValley), 0.5);
        // Untouched sections and table entries keep their defaults
        assert_eq!(config.providers.max_concurrency, 4);
        assert_eq!(config.scoring.view_multiplier(TerrainType::CoastalAlpine), 1.2);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            SkiTourConfig::load_from_path(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.search.top_n, 8);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = SkiTourConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("skitour"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
