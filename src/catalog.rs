//! Destination catalog loading and lookup

use crate::error::SkiTourError;
use crate::models::Destination;
use crate::scoring::ScoringTables;
use serde_json::Value;
use std::fmt::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Validated, ordered list of candidate destinations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    destinations: Vec<Destination>,
}

impl Catalog {
    /// Build a catalog from already-typed entries, validating each one.
    ///
    /// Names are not required to be unique; `find` returns the first match.
    pub fn new(destinations: Vec<Destination>) -> crate::Result<Self> {
        for (index, destination) in destinations.iter().enumerate() {
            destination.validate()?;
            let clash = destinations[..index]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&destination.name));
            if clash {
                warn!(
                    "Destination name '{}' appears more than once, keeping every entry",
                    destination.name
                );
            }
        }
        Ok(Self { destinations })
    }

    /// Load a catalog from a JSON file holding an array of destinations
    pub fn load(path: &Path) -> crate::Result<Self> {
        debug!("Loading destination catalog from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&raw)?;
        info!(
            "Loaded {} destinations from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse a catalog from JSON text.
    ///
    /// Every malformed entry is reported against its name (or position when
    /// it has none) instead of as a bare serde error.
    pub fn from_json_str(raw: &str) -> crate::Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let entries = match value {
            Value::Array(entries) => entries,
            _ => {
                return Err(SkiTourError::catalog(
                    "<catalog>",
                    "expected a JSON array of destinations",
                ));
            }
        };

        let destinations = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let label = entry
                    .get("name")
                    .and_then(Value::as_str)
                    .map_or_else(|| format!("#{}", index + 1), str::to_string);
                serde_json::from_value::<Destination>(entry)
                    .map_err(|e| SkiTourError::catalog(label, e.to_string()))
            })
            .collect::<crate::Result<Vec<_>>>()?;

        Self::new(destinations)
    }

    /// Case-insensitive lookup by name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Destination> {
        let wanted = name.trim();
        self.destinations
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(wanted))
            .or_else(|| {
                let lowered = wanted.to_lowercase();
                self.destinations
                    .iter()
                    .find(|d| d.name.to_lowercase() == lowered)
            })
    }

    #[must_use]
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

/// Catalog details for one destination, with the terrain traits the
/// scoring tables assign to it
#[must_use]
pub fn describe(destination: &Destination, tables: &ScoringTables) -> String {
    let mut out = String::new();
    let range = destination.elevation_range;
    let _ = writeln!(out, "🏔️ {}", destination.name);
    if let Some(region) = &destination.region {
        let _ = writeln!(out, "   Region: {region}");
    }
    let _ = writeln!(
        out,
        "   {:.4}, {:.4} • {} • {:.0}-{:.0} m ({:.0} m vertical)",
        destination.latitude,
        destination.longitude,
        destination.terrain_type,
        range.start_m,
        range.summit_m,
        range.vertical_m()
    );
    let _ = writeln!(
        out,
        "   Views {:.0}/100 • technical {:.1}/10 • {} • avalanche exposure {}",
        destination.view_score,
        destination.technical_level,
        destination.access_type,
        destination.avalanche_exposure
    );
    let _ = writeln!(
        out,
        "   Terrain view multiplier ×{:.1} • difficulty modifier ×{:.1}",
        tables.view_multiplier(destination.terrain_type),
        tables.difficulty_modifier(destination.terrain_type)
    );
    let _ = writeln!(out, "   Tour length {:.1} km", destination.trip_distance());
    if let Some(difficulty) = &destination.difficulty {
        let _ = writeln!(out, "   Difficulty: {difficulty}");
    }
    if let Some(season) = &destination.season {
        let _ = writeln!(out, "   Season: {season}");
    }
    if !destination.features.is_empty() {
        let _ = writeln!(out, "   Features: {}", destination.features.join(", "));
    }
    if let Some(description) = &destination.description {
        let _ = writeln!(out);
        let _ = writeln!(out, "   {description}");
    }
    out
}

impl IntoIterator for Catalog {
    type Item = Destination;
    type IntoIter = std::vec::IntoIter<Destination>;

    fn into_iter(self) -> Self::IntoIter {
        self.destinations.into_iter()
    }
}
