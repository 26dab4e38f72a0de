//! Offline geocoding of Norwegian start locations

use super::Geocoder;
use crate::error::SkiTourError;
use crate::models::Location;
use async_trait::async_trait;
use tracing::debug;

/// Types of location input
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Coordinates (latitude, longitude)
    Coordinates(f64, f64),
    /// Place name
    Name(String),
}

/// Location parsing utilities
pub struct LocationParser;

impl LocationParser {
    /// Parse user input as coordinates when possible, otherwise as a place name
    pub fn parse(input: &str) -> crate::Result<LocationInput> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SkiTourError::validation("Location cannot be empty"));
        }

        if let Some(coords) = Self::parse_coordinates(input)? {
            return Ok(LocationInput::Coordinates(coords.0, coords.1));
        }

        Ok(LocationInput::Name(input.to_string()))
    }

    /// Parse coordinates from string like "69.6492,18.9553" or "69.6492 18.9553".
    ///
    /// Returns `Ok(None)` when the input does not look like two numbers and an
    /// error when it does but the values are out of range.
    fn parse_coordinates(input: &str) -> crate::Result<Option<(f64, f64)>> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        let [lat, lon] = parts.as_slice() else {
            return Ok(None);
        };
        let (Ok(lat), Ok(lon)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
            return Ok(None);
        };

        if !(-90.0..=90.0).contains(&lat) {
            return Err(SkiTourError::validation(format!(
                "Latitude must be between -90 and 90, got: {lat}"
            )));
        }

        if !(-180.0..=180.0).contains(&lon) {
            return Err(SkiTourError::validation(format!(
                "Longitude must be between -180 and 180, got: {lon}"
            )));
        }

        Ok(Some((lat, lon)))
    }
}

/// Fold Norwegian letters so "Tromso" finds "Tromsø"
fn fold(name: &str) -> String {
    let mut folded = String::with_capacity(name.len());
    for c in name.trim().to_lowercase().chars() {
        match c {
            'ø' | 'ö' => folded.push('o'),
            'å' | 'ä' => folded.push('a'),
            'æ' => folded.push_str("ae"),
            other => folded.push(other),
        }
    }
    folded
}

/// Built-in table of common start locations
const PLACES: &[(&str, f64, f64)] = &[
    ("Oslo", 59.9139, 10.7522),
    ("Bergen", 60.3913, 5.3221),
    ("Trondheim", 63.4305, 10.3951),
    ("Stavanger", 58.9700, 5.7331),
    ("Tromsø", 69.6492, 18.9553),
    ("Bodø", 67.2804, 14.4049),
    ("Narvik", 68.4385, 17.4272),
    ("Harstad", 68.7984, 16.5417),
    ("Alta", 69.9689, 23.2716),
    ("Lyngseidet", 69.5760, 20.2180),
    ("Svolvær", 68.2342, 14.5680),
    ("Ålesund", 62.4722, 6.1549),
    ("Stranda", 62.3090, 6.9404),
    ("Åndalsnes", 62.5675, 7.6870),
    ("Oppdal", 62.5940, 9.6912),
    ("Lillehammer", 61.1153, 10.4662),
    ("Lom", 61.8380, 8.5680),
    ("Geilo", 60.5339, 8.2060),
    ("Hemsedal", 60.8630, 8.5530),
    ("Sogndal", 61.2297, 7.1006),
];

/// Offline geocoder over a table of Norwegian places
#[derive(Debug, Clone)]
pub struct Gazetteer {
    places: Vec<Location>,
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self {
            places: PLACES
                .iter()
                .map(|&(name, lat, lon)| Location::with_country(lat, lon, name, "NO"))
                .collect(),
        }
    }
}

impl Gazetteer {
    /// Add or replace a place
    #[must_use]
    pub fn with_place(mut self, place: Location) -> Self {
        let key = fold(&place.name);
        self.places.retain(|p| fold(&p.name) != key);
        self.places.push(place);
        self
    }

    /// Resolve without the async trait; `Ok(None)` for unknown names
    pub fn lookup(&self, query: &str) -> crate::Result<Option<Location>> {
        let location = match LocationParser::parse(query)? {
            LocationInput::Coordinates(lat, lon) => Some(Location::with_country(
                lat,
                lon,
                format!("{lat:.4}, {lon:.4}"),
                "NO",
            )),
            LocationInput::Name(name) => {
                let key = fold(&name);
                self.places.iter().find(|p| fold(&p.name) == key).cloned()
            }
        };

        match location {
            Some(location) if !location.is_within_norway() => {
                Err(SkiTourError::validation(format!(
                    "{} ({}) is outside Norway",
                    location.name,
                    location.format_coordinates()
                )))
            }
            other => Ok(other),
        }
    }

    /// Like `lookup` but a miss is an error
    pub fn resolve(&self, query: &str) -> crate::Result<Location> {
        self.lookup(query)?.ok_or_else(|| {
            SkiTourError::not_found(format!(
                "Unknown location '{}'. Use a Norwegian town name or 'lat,lon'",
                query.trim()
            ))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.places.iter().map(|p| p.name.as_str())
    }
}

#[async_trait]
impl Geocoder for Gazetteer {
    async fn geocode(&self, query: &str) -> crate::Result<Option<Location>> {
        debug!("Geocoding '{}'", query);
        self.lookup(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parser_coordinates() {
        assert_eq!(
            LocationParser::parse("69.6492,18.9553").unwrap(),
            LocationInput::Coordinates(69.6492, 18.9553)
        );
        assert_eq!(
            LocationParser::parse("69.6492 18.9553").unwrap(),
            LocationInput::Coordinates(69.6492, 18.9553)
        );
        assert_eq!(
            LocationParser::parse(" 61.5, 8.3 ").unwrap(),
            LocationInput::Coordinates(61.5, 8.3)
        );
    }

    #[test]
    fn test_location_parser_names() {
        assert_eq!(
            LocationParser::parse("Tromsø").unwrap(),
            LocationInput::Name("Tromsø".to_string())
        );
        assert!(matches!(
            LocationParser::parse("Mo i Rana").unwrap(),
            LocationInput::Name(_)
        ));
    }

    #[test]
    fn test_location_parser_invalid_ranges() {
        assert!(LocationParser::parse("95.0,10.0").is_err());
        assert!(LocationParser::parse("60.0,190.0").is_err());
        assert!(LocationParser::parse("   ").is_err());
    }

    #[test]
    fn test_lookup_folds_norwegian_letters() {
        let gazetteer = Gazetteer::default();
        let tromso = gazetteer.lookup("tromso").unwrap().unwrap();
        assert_eq!(tromso.name, "Tromsø");
        assert!(gazetteer.lookup("ALESUND").unwrap().is_some());
        assert!(gazetteer.lookup("Atlantis").unwrap().is_none());
    }

    #[test]
    fn test_coordinates_outside_norway_rejected() {
        let gazetteer = Gazetteer::default();
        assert!(gazetteer.lookup("48.85,2.35").is_err());
        assert!(gazetteer.lookup("69.65,18.96").unwrap().is_some());
    }

    #[test]
    fn test_resolve_reports_unknown_place() {
        let err = Gazetteer::default().resolve("Atlantis").unwrap_err();
        assert!(matches!(err, SkiTourError::NotFound { .. }));
    }

    #[test]
    fn test_with_place_replaces_existing() {
        let gazetteer =
            Gazetteer::default().with_place(Location::new(69.7, 19.0, "tromsø"));
        let place = gazetteer.lookup("Tromsø").unwrap().unwrap();
        assert_eq!(place.latitude, 69.7);
    }

    #[tokio::test]
    async fn test_geocoder_trait() {
        let gazetteer = Gazetteer::default();
        let oslo = gazetteer.geocode("Oslo").await.unwrap().unwrap();
        assert!(oslo.is_within_norway());
    }
}
