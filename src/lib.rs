//! `skitour` - Personalized Norwegian ski touring destination planner
//!
//! This library provides snow feasibility analysis, profile-driven
//! destination scoring and ranking, and the services around them.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod distance;
pub mod error;
pub mod logging;
pub mod models;
pub mod planner;
pub mod profiles;
pub mod providers;
pub mod quiz;
pub mod regional;
pub mod report;
pub mod scoring;
pub mod snow_depth;

// Re-export core types for public API
pub use cache::PersistentCache;
pub use catalog::Catalog;
pub use config::SkiTourConfig;
pub use error::SkiTourError;
pub use models::{Destination, Location, UserProfile};
pub use planner::{Planner, Providers, SearchParameters};
pub use providers::{Gazetteer, SnapshotProvider};
pub use regional::{RegionalOptions, RegionalReport};
pub use report::RecommendationReport;
pub use scoring::{RankedDestination, RankingPolicy, ScoringEngine, ScoringResult};
pub use snow_depth::SnowDepthAnalysis;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkiTourError>;
