//! Personalized destination scoring
//!
//! - `components`: independent weather, snow, avalanche, view/terrain and distance scorers
//! - `weights`: profile-driven component weights with avalanche redistribution
//! - `engine`: composite score, penalties and the human-readable summary
//! - `ranking`: presentation order and in-range / out-of-range / unskiable grouping
//! - `tables`: terrain and access lookup tables

pub mod components;
pub mod engine;
pub mod ranking;
pub mod tables;
pub mod weights;

pub use engine::{Conditions, ScoringEngine, ScoringResult, TripContext};
pub use ranking::{RankedDestination, RankingPolicy, Standing};
pub use tables::{ScoringTables, TerrainTraits};
pub use weights::{BASE_WEIGHTS, ScoringWeights};
