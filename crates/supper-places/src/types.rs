use serde::{Deserialize, Serialize};

pub use supper_core::{GeolocationError, RecommendationError};

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build a position, rejecting values outside [-90, 90] x [-180, 180].
    /// Accepted values are stored unmodified.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, PlacesError> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if !lat_ok || !lon_ok {
            return Err(PlacesError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A recommended place, ready to render as a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub display_name: String,
    pub reference_uri: String,
    pub image_url: String,
}

/// Errors surfaced by the places crate
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacesError {
    /// Required provider credential is missing
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Fetch(#[from] RecommendationError),

    #[error("Coordinates out of range: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

impl PlacesError {
    /// Error for an absent API key.
    pub fn missing_api_key() -> Self {
        PlacesError::Configuration(format!(
            "{} environment variable not set",
            supper_core::API_KEY_ENV_VARS[0]
        ))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_coordinates_accept_bounds() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_coordinates_keep_values_unmodified() {
        let c = Coordinates::new(25.033_964_123, 121.564_468_987).unwrap();
        assert_eq!(c.latitude, 25.033_964_123);
        assert_eq!(c.longitude, 121.564_468_987);
    }

    #[test]
    fn test_coordinates_reject_out_of_range() {
        assert!(matches!(
            Coordinates::new(90.5, 0.0),
            Err(PlacesError::InvalidCoordinates { .. })
        ));
        assert!(Coordinates::new(0.0, -180.01).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_missing_api_key_message() {
        let err = PlacesError::missing_api_key();
        assert_eq!(err.to_string(), "GEMINI_API_KEY environment variable not set");
    }

    #[test]
    fn test_fetch_error_display_is_verbatim() {
        let err: PlacesError = RecommendationError::from_message("rate limited").into();
        assert_eq!(err.to_string(), "Failed to get recommendations: rate limited");
    }

    #[test]
    fn test_geolocation_errors_stay_out_of_places_errors() {
        // Position failures are handled by the caller before any fetch.
        let err = PlacesError::missing_api_key();
        assert!(matches!(err, PlacesError::Configuration(_)));
        let err: PlacesError = RecommendationError::Unknown.into();
        assert!(matches!(err, PlacesError::Fetch(RecommendationError::Unknown)));
    }
}
