//! Ordering and grouping of scored destinations for presentation

use super::engine::ScoringResult;
use crate::models::Destination;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a ranked destination sits in the presentation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    /// Skiable and within driving range
    InRange,
    /// Skiable but reported out of range, shown for comparison
    OutOfRange,
    /// Snow analysis says it cannot be skied, shown for reference
    NotSkiable,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Standing::InRange => write!(f, "in range"),
            Standing::OutOfRange => write!(f, "outside driving range"),
            Standing::NotSkiable => write!(f, "not skiable"),
        }
    }
}

/// A destination paired with its score and standing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDestination {
    pub destination: Destination,
    pub result: ScoringResult,
    pub standing: Standing,
}

/// How many entries of each bucket survive into the final list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingPolicy {
    pub max_out_of_range: Option<usize>,
    pub max_not_skiable: Option<usize>,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self::presentation()
    }
}

impl RankingPolicy {
    /// All in-range entries, two out-of-range, one unskiable
    #[must_use]
    pub fn presentation() -> Self {
        Self {
            max_out_of_range: Some(2),
            max_not_skiable: Some(1),
        }
    }

    /// Same ordering, nothing dropped
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            max_out_of_range: None,
            max_not_skiable: None,
        }
    }

    /// Sort by total score (stable) and concatenate the buckets
    #[must_use]
    pub fn rank(&self, mut scored: Vec<(Destination, ScoringResult)>) -> Vec<RankedDestination> {
        scored.sort_by(|(_, a), (_, b)| b.total_score.total_cmp(&a.total_score));

        let mut in_range = Vec::new();
        let mut out_of_range = Vec::new();
        let mut not_skiable = Vec::new();

        for (destination, result) in scored {
            let standing = if !result.is_skiable() {
                Standing::NotSkiable
            } else if result.within_range {
                Standing::InRange
            } else {
                Standing::OutOfRange
            };
            let entry = RankedDestination {
                destination,
                result,
                standing,
            };
            match standing {
                Standing::InRange => in_range.push(entry),
                Standing::OutOfRange => out_of_range.push(entry),
                Standing::NotSkiable => not_skiable.push(entry),
            }
        }

        if let Some(limit) = self.max_out_of_range {
            out_of_range.truncate(limit);
        }
        if let Some(limit) = self.max_not_skiable {
            not_skiable.truncate(limit);
        }

        in_range.extend(out_of_range);
        in_range.extend(not_skiable);
        in_range
    }
}
