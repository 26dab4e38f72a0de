//! Data models for the ski touring planner
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and metadata
//! - Destination: Catalog entries and their enumerations
//! - Conditions: Weather, snow and avalanche provider readings
//! - Profile: The user's quiz-derived preferences

pub mod conditions;
pub mod destination;
pub mod location;
pub mod profile;

// Re-export all public types for convenient access
pub use conditions::{
    AvalancheOutlook, AvalancheProblem, AvalancheReading, DangerLevel, SnowReading,
    TemperatureTrend, WeatherReading, WindEffect,
};
pub use destination::{
    AccessType, AvalancheExposure, DEFAULT_TRIP_DISTANCE_KM, Destination, ElevationRange,
    TerrainType,
};
pub use location::Location;
pub use profile::{ExperienceLevel, ProfileUpdate, RiskTolerance, UserProfile};
