//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};

/// Latitude band covered by the Norwegian mainland and Svalbard
pub const NORWAY_LATITUDE: (f64, f64) = (58.0, 81.0);
/// Longitude band covered by the Norwegian mainland and Svalbard
pub const NORWAY_LONGITUDE: (f64, f64) = (4.0, 32.0);

/// Location coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Location name (town, mountain, etc.)
    pub name: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: Option<String>,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            name: name.into(),
            country: None,
        }
    }

    /// Create location with country
    #[must_use]
    pub fn with_country(
        latitude: f64,
        longitude: f64,
        name: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            name: name.into(),
            country: Some(country.into()),
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Round coordinates to `precision` decimal places
    #[must_use]
    pub fn rounded_coordinates(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (self.latitude * multiplier).round() / multiplier;
        let lon = (self.longitude * multiplier).round() / multiplier;
        (lat, lon)
    }

    /// Sanity check that the point lies inside Norway's bounding box
    #[must_use]
    pub fn is_within_norway(&self) -> bool {
        (NORWAY_LATITUDE.0..=NORWAY_LATITUDE.1).contains(&self.latitude)
            && (NORWAY_LONGITUDE.0..=NORWAY_LONGITUDE.1).contains(&self.longitude)
    }

    /// File-name friendly version of the location name
    #[must_use]
    pub fn slug(&self) -> String {
        let slug: String = self
            .name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        let slug = slug.trim_matches('_').to_string();
        if slug.is_empty() {
            "unknown".to_string()
        } else {
            slug
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_rounded_coordinates() {
        let location = Location::new(69.856_734, 20.383_349, "Lyngen");
        let (lat, lon) = location.rounded_coordinates(4);
        assert_eq!(lat, 69.8567);
        assert_eq!(lon, 20.3833);
    }

    #[test]
    fn test_norway_bounding_box() {
        assert!(Location::new(59.9139, 10.7522, "Oslo").is_within_norway());
        assert!(Location::new(78.2232, 15.6267, "Longyearbyen").is_within_norway());
        assert!(!Location::new(46.8182, 8.2275, "Interlaken").is_within_norway());
        assert!(!Location::new(55.6761, 12.5683, "København").is_within_norway());
    }

    #[test]
    fn test_slug() {
        assert_eq!(Location::new(0.0, 0.0, "Tromsø, Norway").slug(), "Tromsø__Norway");
        assert_eq!(Location::new(0.0, 0.0, " - ").slug(), "unknown");
    }
}
