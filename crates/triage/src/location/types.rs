//! Location types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::LocationError;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    /// Validate and build a position.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::PositionUnavailable);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Formats as `"<lat>, <lon>"`, the coordinate string sent to the webhook.
impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// The location a session was started from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFix {
    /// `"<lat>, <lon>"`.
    pub coordinates: String,
    /// Place name, or the coordinates when none could be resolved.
    pub location_string: String,
}

/// Options for a one-shot position request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix that may be reused; zero forces a fresh fix.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_string() {
        let position = Position::new(18.5204, 73.8567).unwrap();
        assert_eq!(position.to_string(), "18.5204, 73.8567");
        assert_eq!(Position::new(12.0, -3.5).unwrap().to_string(), "12, -3.5");
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            Position::new(91.0, 0.0),
            Err(LocationError::PositionUnavailable)
        );
        assert!(Position::new(0.0, -180.5).is_err());
        assert!(Position::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_default_options() {
        let options = PositionOptions::default();
        assert!(options.enable_high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::ZERO);
    }

    #[test]
    fn test_fix_json_layout() {
        let fix = LocationFix {
            coordinates: "1, 2".to_string(),
            location_string: "Somewhere".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&fix).unwrap(),
            r#"{"coordinates":"1, 2","locationString":"Somewhere"}"#
        );
    }
}
