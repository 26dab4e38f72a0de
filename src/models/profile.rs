//! User preference profile produced by the personality quiz

use crate::error::SkiTourError;
use crate::models::TerrainType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Upper bound of every trait score
pub const MAX_TRAIT: u8 = 10;
/// Trait value of a profile with no stated preference
pub const NEUTRAL_TRAIT: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskTolerance {
    /// Scale applied to avalanche shortfalls and problem penalties
    #[must_use]
    pub fn hazard_multiplier(self) -> f64 {
        match self {
            RiskTolerance::Conservative => 1.5,
            RiskTolerance::Moderate => 1.0,
            RiskTolerance::Aggressive => 0.7,
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTolerance::Conservative => write!(f, "conservative"),
            RiskTolerance::Moderate => write!(f, "moderate"),
            RiskTolerance::Aggressive => write!(f, "aggressive"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceLevel::Beginner => write!(f, "Beginner"),
            ExperienceLevel::Intermediate => write!(f, "Intermediate"),
            ExperienceLevel::Advanced => write!(f, "Advanced"),
        }
    }
}

/// Accumulated personality scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// How much fresh snow matters (0-10)
    pub powder_priority: u8,
    /// How much scenery and visibility matter (0-10)
    pub view_priority: u8,
    /// How safety-conscious the user is (0-10)
    pub safety_priority: u8,
    /// Appetite for remote, committing tours (0-10)
    pub adventure_seeking: u8,
    /// Solo (0) to social (10)
    pub social_preference: u8,
    pub terrain_preference: TerrainType,
    pub risk_tolerance: RiskTolerance,
    pub experience_level: ExperienceLevel,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            powder_priority: NEUTRAL_TRAIT,
            view_priority: NEUTRAL_TRAIT,
            safety_priority: NEUTRAL_TRAIT,
            adventure_seeking: NEUTRAL_TRAIT,
            social_preference: NEUTRAL_TRAIT,
            terrain_preference: TerrainType::Balanced,
            risk_tolerance: RiskTolerance::Moderate,
            experience_level: ExperienceLevel::Intermediate,
        }
    }
}

/// Explicit edits to a finalized profile; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    pub powder_priority: Option<u8>,
    pub view_priority: Option<u8>,
    pub safety_priority: Option<u8>,
    pub adventure_seeking: Option<u8>,
    pub social_preference: Option<u8>,
    pub terrain_preference: Option<TerrainType>,
    pub risk_tolerance: Option<RiskTolerance>,
    pub experience_level: Option<ExperienceLevel>,
}

impl ProfileUpdate {
    /// Parse `field=value` edits such as `powder_priority=9` or
    /// `terrain_preference=high_alpine`, using the profile's JSON field names
    pub fn from_assignments<S: AsRef<str>>(assignments: &[S]) -> crate::Result<Self> {
        let mut fields = serde_json::Map::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (field, value) = assignment.split_once('=').ok_or_else(|| {
                SkiTourError::validation(format!("expected field=value, got '{assignment}'"))
            })?;
            let value = value.trim();
            let value = value
                .parse::<u64>()
                .map_or_else(|_| Value::String(value.to_string()), Value::from);
            fields.insert(field.trim().to_string(), value);
        }
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| SkiTourError::validation(format!("invalid profile edit: {e}")))
    }
}

impl UserProfile {
    /// Trait values keyed by name, in declaration order
    #[must_use]
    pub fn traits(&self) -> [(&'static str, u8); 5] {
        [
            ("powder_priority", self.powder_priority),
            ("view_priority", self.view_priority),
            ("safety_priority", self.safety_priority),
            ("adventure_seeking", self.adventure_seeking),
            ("social_preference", self.social_preference),
        ]
    }

    /// Reject trait values outside 0-10
    pub fn validate(&self) -> crate::Result<()> {
        for (name, value) in self.traits() {
            if value > MAX_TRAIT {
                return Err(SkiTourError::validation(format!(
                    "{name} must be between 0 and {MAX_TRAIT}, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Apply explicit field edits; the profile is left unchanged if the result is invalid
    pub fn apply(&mut self, update: ProfileUpdate) -> crate::Result<()> {
        let mut next = self.clone();
        if let Some(v) = update.powder_priority {
            next.powder_priority = v;
        }
        if let Some(v) = update.view_priority {
            next.view_priority = v;
        }
        if let Some(v) = update.safety_priority {
            next.safety_priority = v;
        }
        if let Some(v) = update.adventure_seeking {
            next.adventure_seeking = v;
        }
        if let Some(v) = update.social_preference {
            next.social_preference = v;
        }
        if let Some(v) = update.terrain_preference {
            next.terrain_preference = v;
        }
        if let Some(v) = update.risk_tolerance {
            next.risk_tolerance = v;
        }
        if let Some(v) = update.experience_level {
            next.experience_level = v;
        }

        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Headline personality label
    #[must_use]
    pub fn personality_type(&self) -> &'static str {
        if self.powder_priority >= 7 {
            if self.adventure_seeking >= 7 {
                "Hardcore Powder Hunter"
            } else {
                "Snow Quality Enthusiast"
            }
        } else if self.view_priority >= 7 {
            if self.adventure_seeking >= 7 {
                "Adventure Photographer"
            } else {
                "Scenic Tourer"
            }
        } else if self.safety_priority >= 8 {
            "Safety-First Tourer"
        } else if self.adventure_seeking >= 8 {
            "Extreme Adventurer"
        } else {
            "Balanced Ski Tourer"
        }
    }

    /// Multi-line description shown after the quiz
    #[must_use]
    pub fn summary(&self) -> String {
        let terrain = match self.terrain_preference {
            TerrainType::CoastalAlpine => "dramatic summit-to-sea adventures",
            TerrainType::HighAlpine => "challenging high-altitude glacier terrain",
            TerrainType::ForestValley => "peaceful forest and valley skiing",
            TerrainType::PlateauRidge => "wide-open plateau exploration",
            TerrainType::FjordValley => "scenic fjord valley touring",
            TerrainType::Balanced => "varied terrain",
        };
        let leaning = if self.powder_priority >= 6 {
            "fresh powder"
        } else if self.view_priority >= 6 {
            "scenic views"
        } else {
            "balanced conditions"
        };

        format!(
            "🎿 Your Ski Touring Personality: {}\n\n\
             You're drawn to {terrain} and prefer {} approaches to mountain risk.\n\
             Your skiing priorities lean toward {leaning}.\n\n\
             Experience Level: {}\n\
             Risk Tolerance: {}\n\
             Terrain Preference: {}",
            self.personality_type(),
            self.risk_tolerance,
            self.experience_level,
            self.risk_tolerance,
            self.terrain_preference,
        )
    }
}
