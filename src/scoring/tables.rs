//! Terrain and access lookup tables used by the view/terrain scorer

use crate::error::SkiTourError;
use crate::models::{AccessType, TerrainType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-terrain scoring traits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainTraits {
    /// Multiplier applied to a destination's base view score
    pub view_multiplier: f64,
    /// Relative technical demand of the terrain
    pub difficulty_modifier: f64,
}

/// Immutable scoring configuration shared read-only by every evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTables {
    pub terrain: BTreeMap<TerrainType, TerrainTraits>,
    /// Adjustment granted to a fully adventure-seeking user (trait 10);
    /// scaled linearly down to zero for trait 0
    pub access_adjustments: BTreeMap<AccessType, f64>,
}

impl Default for ScoringTables {
    fn default() -> Self {
        let terrain = [
            (TerrainType::CoastalAlpine, 1.2, 0.8),
            (TerrainType::HighAlpine, 1.1, 1.2),
            (TerrainType::ForestValley, 0.8, 0.6),
            (TerrainType::PlateauRidge, 0.9, 0.7),
            (TerrainType::FjordValley, 1.0, 0.9),
        ]
        .into_iter()
        .map(|(terrain, view_multiplier, difficulty_modifier)| {
            (
                terrain,
                TerrainTraits {
                    view_multiplier,
                    difficulty_modifier,
                },
            )
        })
        .collect();

        let access_adjustments = [
            (AccessType::RoadAccess, -5.0),
            (AccessType::LiftAccess, 0.0),
            (AccessType::HutAccess, 5.0),
            (AccessType::BoatOrSnowmobile, 10.0),
            (AccessType::RoadClosedWinter, 8.0),
        ]
        .into_iter()
        .collect();

        Self {
            terrain,
            access_adjustments,
        }
    }
}

impl ScoringTables {
    /// View multiplier for a terrain type, 1.0 when not configured
    #[must_use]
    pub fn view_multiplier(&self, terrain: TerrainType) -> f64 {
        self.terrain
            .get(&terrain)
            .map_or(1.0, |traits| traits.view_multiplier)
    }

    /// Difficulty modifier for a terrain type, 1.0 when not configured
    #[must_use]
    pub fn difficulty_modifier(&self, terrain: TerrainType) -> f64 {
        self.terrain
            .get(&terrain)
            .map_or(1.0, |traits| traits.difficulty_modifier)
    }

    /// Access adjustment for a user with the given adventure factor (0.0-1.0)
    #[must_use]
    pub fn access_adjustment(&self, access: AccessType, adventure_factor: f64) -> f64 {
        self.access_adjustments
            .get(&access)
            .map_or(0.0, |full| full * adventure_factor)
    }

    /// Fill entries a partial config override left out with the defaults
    pub fn fill_missing(&mut self) {
        let defaults = Self::default();
        for (terrain, traits) in defaults.terrain {
            self.terrain.entry(terrain).or_insert(traits);
        }
        for (access, adjustment) in defaults.access_adjustments {
            self.access_adjustments.entry(access).or_insert(adjustment);
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        for (terrain, traits) in &self.terrain {
            if !traits.view_multiplier.is_finite() || traits.view_multiplier < 0.0 {
                return Err(SkiTourError::config(format!(
                    "view multiplier for {} must be a non-negative number",
                    terrain.key()
                )));
            }
            if !traits.difficulty_modifier.is_finite() || traits.difficulty_modifier < 0.0 {
                return Err(SkiTourError::config(format!(
                    "difficulty modifier for {} must be a non-negative number",
                    terrain.key()
                )));
            }
        }
        for (access, adjustment) in &self.access_adjustments {
            if !adjustment.is_finite() || adjustment.abs() > 100.0 {
                return Err(SkiTourError::config(format!(
                    "access adjustment for {} must be within -100..100",
                    access.key()
                )));
            }
        }
        Ok(())
    }
}
