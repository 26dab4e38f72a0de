//! Profile-driven component weights

use crate::models::UserProfile;
use serde::{Deserialize, Serialize};

/// Relative importance of each scoring component; always sums to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub snow: f64,
    pub weather: f64,
    pub avalanche: f64,
    pub view_terrain: f64,
    pub distance: f64,
}

/// Starting point before any profile nudges
pub const BASE_WEIGHTS: ScoringWeights = ScoringWeights {
    snow: 0.35,
    weather: 0.25,
    avalanche: 0.25,
    view_terrain: 0.10,
    distance: 0.05,
};

/// How a missing avalanche share is spread over the remaining components
const REDISTRIBUTION_SPLIT: ScoringWeights = ScoringWeights {
    snow: 0.4,
    weather: 0.3,
    avalanche: 0.0,
    view_terrain: 0.2,
    distance: 0.1,
};

/// Deviation of a trait from neutral, times `step`
fn nudge(value: u8, step: f64) -> f64 {
    (f64::from(value) - 5.0) * step
}

impl ScoringWeights {
    /// Derive weights for a profile.
    ///
    /// Profile nudges are applied first, each weight is floored at zero, the
    /// avalanche share is redistributed when there is no bulletin, and the
    /// result is renormalized from scratch.
    #[must_use]
    pub fn for_profile(profile: &UserProfile, avalanche_data_available: bool) -> Self {
        let mut w = BASE_WEIGHTS;

        let powder = nudge(profile.powder_priority, 0.02);
        w.snow += powder;
        w.weather -= powder * 0.5;

        let view = nudge(profile.view_priority, 0.02);
        w.weather += view * 0.75;
        w.view_terrain += view * 0.5;
        w.snow -= view * 0.5;

        let safety = nudge(profile.safety_priority, 0.02);
        w.avalanche += safety;
        w.distance += safety * 0.3;
        w.snow -= safety * 0.3;

        let adventure = nudge(profile.adventure_seeking, 0.01);
        w.view_terrain += adventure;
        w.distance -= adventure * 0.5;

        w = w.map(|v| v.max(0.0));

        if !avalanche_data_available {
            let freed = w.avalanche;
            w.avalanche = 0.0;
            let factor = freed / (1.0 - freed);
            w.snow += w.snow * factor * REDISTRIBUTION_SPLIT.snow;
            w.weather += w.weather * factor * REDISTRIBUTION_SPLIT.weather;
            w.view_terrain += w.view_terrain * factor * REDISTRIBUTION_SPLIT.view_terrain;
            w.distance += w.distance * factor * REDISTRIBUTION_SPLIT.distance;
        }

        w.normalized()
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.snow + self.weather + self.avalanche + self.view_terrain + self.distance
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            snow: f(self.snow),
            weather: f(self.weather),
            avalanche: f(self.avalanche),
            view_terrain: f(self.view_terrain),
            distance: f(self.distance),
        }
    }

    fn normalized(self) -> Self {
        let total = self.sum();
        if total <= 0.0 {
            return BASE_WEIGHTS;
        }
        self.map(|v| v / total)
    }

    /// One-line description of what this profile's weights emphasise
    #[must_use]
    pub fn explanation(&self, avalanche_data_available: bool) -> String {
        let mut parts = Vec::new();

        if self.snow > 0.40 {
            parts.push(format!(
                "❄️ Snow conditions heavily weighted ({:.1}%) - you prioritize powder!",
                self.snow * 100.0
            ));
        } else if self.snow < 0.30 {
            parts.push(format!(
                "❄️ Snow conditions moderately weighted ({:.1}%) - other factors matter more",
                self.snow * 100.0
            ));
        }

        if self.weather > 0.30 {
            parts.push(format!(
                "🌤️ Weather/visibility strongly weighted ({:.1}%) - you want clear views!",
                self.weather * 100.0
            ));
        }

        if avalanche_data_available {
            if self.avalanche > 0.30 {
                parts.push(format!(
                    "⚠️ Safety heavily emphasized ({:.1}%) - conservative approach",
                    self.avalanche * 100.0
                ));
            } else if self.avalanche < 0.20 {
                parts.push(format!(
                    "⚠️ Moderate safety weighting ({:.1}%) - calculated risks accepted",
                    self.avalanche * 100.0
                ));
            }
        } else {
            parts.push(
                "📅 Avalanche data not available - weights redistributed to other factors"
                    .to_string(),
            );
        }

        if self.view_terrain > 0.15 {
            parts.push(format!(
                "⛰️ Terrain/views important ({:.1}%) - scenery matters!",
                self.view_terrain * 100.0
            ));
        }

        parts.push("🎿 Includes walking requirements and snow depth analysis".to_string());

        format!("🎯 Your personalized scoring: {}", parts.join(" • "))
    }
}
