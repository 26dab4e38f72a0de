//! Snow Feasibility Analysis
//!
//! Estimates snow cover along a tour's elevation profile from a single snow
//! observation, and decides whether the tour can be skied from the car or
//! needs an approach on foot first.

use crate::models::{Destination, SnowReading};
use serde::{Deserialize, Serialize};

/// Minimum depth in the skiing portion of the route (cm)
pub const MIN_SKIABLE_DEPTH_CM: f64 = 25.0;
/// Minimum depth at the parking spot to put skis on there (cm)
pub const PARKING_MIN_DEPTH_CM: f64 = 10.0;
/// Depth at which rocks no longer threaten the bases (cm)
pub const SAFE_SKIING_DEPTH_CM: f64 = 50.0;

/// Depth gained per 100 m of elevation (cm)
const SNOW_GAIN_PER_100M_CM: f64 = 7.0;
const WALKING_SPEED_KMH: f64 = 3.5;
const CLIMB_RATE_M_PER_HOUR: f64 = 400.0;
const PACE_BUFFER: f64 = 1.2;
const APPROACH_GRADE: f64 = 0.12;
/// Share of the tour that can be spent walking to the snow line
const MAX_WALKING_SHARE: f64 = 0.4;
const BISECTION_ITERATIONS: usize = 10;
const BISECTION_PRECISION_M: f64 = 10.0;

/// Walking tolerance choices offered to users, in hours
pub const WALKING_TOLERANCE_OPTIONS: [(&str, f64); 6] = [
    ("No walking - ski from parking", 0.0),
    ("Up to 30 minutes walking", 0.5),
    ("Up to 1 hour walking", 1.0),
    ("Up to 2 hours walking", 2.0),
    ("Up to 3 hours walking", 3.0),
    ("I'll walk as long as needed", 24.0),
];

/// Elevation profile the analysis runs against.
///
/// Unlike [`Destination`], `base_m == summit_m` is allowed here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationProfile {
    pub base_m: f64,
    pub summit_m: f64,
    /// Nominal tour length in km, caps the approach distance
    pub trip_distance_km: f64,
}

impl ElevationProfile {
    #[must_use]
    pub fn new(base_m: f64, summit_m: f64, trip_distance_km: f64) -> Self {
        Self {
            base_m,
            summit_m,
            trip_distance_km,
        }
    }

    #[must_use]
    pub fn mid_m(&self) -> f64 {
        (self.base_m + self.summit_m) / 2.0
    }
}

impl From<&Destination> for ElevationProfile {
    fn from(destination: &Destination) -> Self {
        Self {
            base_m: destination.elevation_range.start_m,
            summit_m: destination.elevation_range.summit_m,
            trip_distance_km: destination.trip_distance(),
        }
    }
}

/// Result of the snow feasibility analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowDepthAnalysis {
    /// Estimated depth at the parking spot (cm)
    pub base_depth_cm: f64,
    /// Estimated depth halfway up (cm)
    pub mid_depth_cm: f64,
    /// Estimated depth at the summit (cm)
    pub summit_depth_cm: f64,
    /// Shallowest of the three estimates (cm)
    pub min_depth_cm: f64,
    pub is_skiable: bool,
    pub walking_required: bool,
    pub walking_distance_km: f64,
    pub walking_time_hours: f64,
    pub walking_elevation_gain_m: f64,
    /// Elevation where skis go on, if walking is required
    pub snow_start_elevation_m: Option<f64>,
    pub damage_risk: bool,
    pub warnings: Vec<String>,
    /// Short recommendation lines
    pub notes: Vec<String>,
}

impl SnowDepthAnalysis {
    /// Analyze a tour's snow cover against the user's walking tolerance
    #[must_use]
    pub fn analyze(
        profile: &ElevationProfile,
        reading: &SnowReading,
        max_walking_hours: f64,
    ) -> Self {
        let base_depth_cm = estimate_depth(reading, profile.base_m);
        let mid_depth_cm = estimate_depth(reading, profile.mid_m());
        let summit_depth_cm = estimate_depth(reading, profile.summit_m);
        let min_depth_cm = base_depth_cm.min(mid_depth_cm).min(summit_depth_cm);

        let walking_required = base_depth_cm < PARKING_MIN_DEPTH_CM;
        let mut walking_distance_km = 0.0;
        let mut walking_time_hours = 0.0;
        let mut walking_elevation_gain_m = 0.0;
        let mut snow_start_elevation_m = None;

        if walking_required {
            let start = find_snow_line(reading, profile.base_m, profile.summit_m);
            walking_elevation_gain_m = start - profile.base_m;
            walking_distance_km =
                walking_distance(walking_elevation_gain_m, profile.trip_distance_km);
            walking_time_hours = walking_time(walking_distance_km, walking_elevation_gain_m);
            snow_start_elevation_m = Some(start);
        }

        let skiing_depth = mid_depth_cm.max(summit_depth_cm);
        let is_skiable = skiing_depth >= MIN_SKIABLE_DEPTH_CM
            && (!walking_required || walking_time_hours <= max_walking_hours);
        let damage_risk = min_depth_cm < SAFE_SKIING_DEPTH_CM;

        let mut analysis = Self {
            base_depth_cm,
            mid_depth_cm,
            summit_depth_cm,
            min_depth_cm,
            is_skiable,
            walking_required,
            walking_distance_km,
            walking_time_hours,
            walking_elevation_gain_m,
            snow_start_elevation_m,
            damage_risk,
            warnings: Vec::new(),
            notes: Vec::new(),
        };
        analysis.warnings = analysis.build_warnings();
        analysis.notes = analysis.build_notes();
        analysis
    }

    /// Deepest of the three estimates (cm)
    #[must_use]
    pub fn max_depth_cm(&self) -> f64 {
        self.base_depth_cm
            .max(self.mid_depth_cm)
            .max(self.summit_depth_cm)
    }

    /// Notes joined into one line
    #[must_use]
    pub fn recommendation(&self) -> String {
        self.notes.join(" • ")
    }

    fn build_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.walking_required {
            warnings.push("⚠️ Walking required from parking to reach snow".to_string());
        }

        if self.damage_risk {
            match self.min_depth_cm {
                d if d < 25.0 => warnings.push(
                    "🪨 HIGH RISK: Very shallow snow - expect rocks and ski damage".to_string(),
                ),
                d if d < 40.0 => warnings.push(
                    "⚠️ MODERATE RISK: Shallow snow - careful route choice needed".to_string(),
                ),
                _ => {}
            }
        }

        if self.max_depth_cm() < 30.0 {
            warnings.push("❄️ Generally poor snow conditions throughout route".to_string());
        }

        if (self.base_depth_cm - self.summit_depth_cm).abs() > 100.0 {
            warnings.push("🏔️ Highly variable snow conditions by elevation".to_string());
        }

        warnings
    }

    fn build_notes(&self) -> Vec<String> {
        let mut notes = Vec::new();

        if self.base_depth_cm >= 50.0 && self.mid_depth_cm >= 50.0 {
            notes.push(format!(
                "❄️ Excellent snow: {:.0}cm base, {:.0}cm summit",
                self.base_depth_cm, self.summit_depth_cm
            ));
        } else if self.mid_depth_cm >= 30.0 {
            notes.push(format!(
                "❄️ Adequate snow: {:.0}cm mid-route, {:.0}cm summit",
                self.mid_depth_cm, self.summit_depth_cm
            ));
        } else {
            notes.push(format!(
                "❄️ Limited snow: {:.0}cm base, {:.0}cm summit",
                self.base_depth_cm, self.summit_depth_cm
            ));
        }

        if self.walking_required {
            let hours = self.walking_time_hours;
            notes.push(match hours {
                h if h < 0.5 => format!("🥾 Short walk required: {:.0} min to snow", h * 60.0),
                h if h < 1.5 => format!("🥾 Moderate approach: {h:.1}h walk to snow"),
                h => format!("🥾 Long approach: {h:.1}h walk required"),
            });
        } else {
            notes.push("🅿️ Ski from parking".to_string());
        }

        if self.damage_risk {
            notes.push("⚠️ Bring old skis - rock damage likely".to_string());
        } else {
            notes.push("✅ Safe for good skis".to_string());
        }

        notes
    }
}

/// Linear elevation model: 7 cm more snow per 100 m climbed, never negative
#[must_use]
pub fn estimate_depth(reading: &SnowReading, elevation_m: f64) -> f64 {
    let diff = elevation_m - reading.reference_elevation_m;
    (reading.snow_depth_cm + diff / 100.0 * SNOW_GAIN_PER_100M_CM).max(0.0)
}

/// Bisect for the lowest elevation with parking-grade snow
fn find_snow_line(reading: &SnowReading, base_m: f64, summit_m: f64) -> f64 {
    let mut low = base_m;
    let mut high = summit_m;

    for _ in 0..BISECTION_ITERATIONS {
        let mid = (low + high) / 2.0;
        if estimate_depth(reading, mid) >= PARKING_MIN_DEPTH_CM {
            high = mid;
        } else {
            low = mid;
        }
        if (high - low).abs() < BISECTION_PRECISION_M {
            break;
        }
    }

    high
}

fn walking_distance(elevation_gain_m: f64, trip_distance_km: f64) -> f64 {
    let distance = elevation_gain_m / APPROACH_GRADE / 1000.0;
    distance.min(trip_distance_km * MAX_WALKING_SHARE)
}

fn walking_time(distance_km: f64, elevation_gain_m: f64) -> f64 {
    let horizontal = distance_km / WALKING_SPEED_KMH;
    let vertical = elevation_gain_m / CLIMB_RATE_M_PER_HOUR;
    horizontal.max(vertical) * PACE_BUFFER
}
