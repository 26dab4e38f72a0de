//! Avalanche bulletin calendar for Norway

use crate::models::{AvalancheOutlook, DangerLevel};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which bulletins are published on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeason {
    /// December through May, daily bulletins at every level
    Main,
    /// June, October and November, only levels 4 and 5
    Semi,
    /// July through September, nothing published
    Off,
}

impl WarningSeason {
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        match date.month() {
            12 | 1..=5 => WarningSeason::Main,
            6 | 10 | 11 => WarningSeason::Semi,
            _ => WarningSeason::Off,
        }
    }

    /// Whether a bulletin at `level` would be issued in this season
    #[must_use]
    pub fn publishes(self, level: DangerLevel) -> bool {
        match self {
            WarningSeason::Main => true,
            WarningSeason::Semi => level >= DangerLevel::HIGH,
            WarningSeason::Off => false,
        }
    }

    /// Drop bulletins the season would not have published
    #[must_use]
    pub fn filter(self, outlook: AvalancheOutlook) -> AvalancheOutlook {
        match outlook {
            AvalancheOutlook::Warning(reading) if self.publishes(reading.danger_level) => {
                AvalancheOutlook::Warning(reading)
            }
            _ => AvalancheOutlook::NoWarningPeriod,
        }
    }
}

impl fmt::Display for WarningSeason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningSeason::Main => write!(f, "main avalanche season"),
            WarningSeason::Semi => write!(f, "semi-season (levels 4-5 only)"),
            WarningSeason::Off => write!(f, "no warning period"),
        }
    }
}
