//! Recommendation report: record, JSON persistence and terminal rendering

use crate::models::{Location, UserProfile};
use crate::scoring::{RankedDestination, Standing};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const REPORT_PREFIX: &str = "ski_touring_";

/// Search parameters and summary counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchInfo {
    pub start: Location,
    pub date: NaiveDate,
    pub max_driving_hours: f64,
    pub max_distance_km: f64,
    /// Walking tolerance the ranking was produced with
    pub max_walking_hours: f64,
    /// Set when nothing was skiable and the fallback tolerance was used
    #[serde(default)]
    pub walking_fallback_used: bool,
    pub total_analyzed: usize,
    pub within_range_count: usize,
    pub skiable_count: usize,
    pub avalanche_data_available: bool,
}

/// Everything produced by one recommendation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub generated_at: DateTime<Utc>,
    pub profile: UserProfile,
    pub search: SearchInfo,
    pub recommendations: Vec<RankedDestination>,
    pub scoring_explanation: String,
}

impl RecommendationReport {
    /// File name used by `save_report`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "{REPORT_PREFIX}{}_{}.json",
            self.search.start.slug(),
            self.generated_at.format("%Y%m%d_%H%M")
        )
    }

    /// Recommendations that are skiable and within driving range
    pub fn in_range(&self) -> impl Iterator<Item = &RankedDestination> {
        self.recommendations
            .iter()
            .filter(|r| r.standing == Standing::InRange)
    }
}

/// Write the report as pretty JSON into `dir`, creating it when needed
pub fn save_report(dir: &Path, report: &RecommendationReport) -> crate::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report.file_name());
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)?;
    info!("Results saved to {}", path.display());
    Ok(path)
}

pub fn load_report(path: &Path) -> crate::Result<RecommendationReport> {
    debug!("Loading report from {}", path.display());
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Saved report files in `dir`, oldest first; empty when the directory is missing
pub fn list_reports(dir: &Path) -> crate::Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut reports = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_report = path.extension().is_some_and(|ext| ext == "json")
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(REPORT_PREFIX));
        if is_report {
            reports.push(path);
        }
    }
    reports.sort();
    Ok(reports)
}

pub(crate) fn standing_marker(standing: Standing) -> &'static str {
    match standing {
        Standing::InRange => "✅",
        Standing::OutOfRange => "🚗",
        Standing::NotSkiable => "⛔",
    }
}

impl fmt::Display for RecommendationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let search = &self.search;
        writeln!(
            f,
            "🎿 Ski touring recommendations from {} for {}",
            search.start.name, search.date
        )?;
        writeln!(
            f,
            "   Max {:.1}h drive ({:.0} km) • walking tolerance {:.1}h{}",
            search.max_driving_hours,
            search.max_distance_km,
            search.max_walking_hours,
            if search.walking_fallback_used {
                " (widened, nothing was skiable from parking)"
            } else {
                ""
            }
        )?;
        writeln!(
            f,
            "   {} analyzed • {} in range • {} skiable",
            search.total_analyzed, search.within_range_count, search.skiable_count
        )?;
        if !search.avalanche_data_available {
            writeln!(f, "   📅 No avalanche bulletins for this date")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.profile.personality_type())?;
        writeln!(f, "{}", self.scoring_explanation)?;
        writeln!(f)?;

        if self.recommendations.is_empty() {
            return writeln!(f, "No destinations matched your search.");
        }

        for (rank, entry) in self.recommendations.iter().enumerate() {
            let destination = &entry.destination;
            writeln!(
                f,
                "{:>2}. {} {} - {:.0}/100 ({}, {})",
                rank + 1,
                standing_marker(entry.standing),
                destination.name,
                entry.result.total_score,
                destination.terrain_type,
                entry.standing
            )?;
            writeln!(f, "    {}", entry.result.personalized_summary)?;
            if let Some(analysis) = &entry.result.snow_depth_analysis {
                writeln!(f, "    {}", analysis.recommendation())?;
                for warning in &analysis.warnings {
                    writeln!(f, "    ⚠️ {warning}")?;
                }
            }
        }
        Ok(())
    }
}
