//! Geolocation failure classification.

use thiserror::Error;

/// Why a position fix could not be obtained.
///
/// The display text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// No position source is available.
    #[error("Geolocation is not supported on this device")]
    Unsupported,

    /// The user refused access to their location.
    #[error("Location permission denied. Please enable location access.")]
    PermissionDenied,

    /// A position could not be determined.
    #[error("Location information is unavailable.")]
    PositionUnavailable,

    /// No fix arrived within the allotted time.
    #[error("Location request timed out.")]
    Timeout,

    /// Any other failure, with the raw code if one was reported.
    #[error("Unable to retrieve your location")]
    Unknown(Option<u16>),
}

impl LocationError {
    /// Classify a W3C geolocation error code.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => LocationError::PermissionDenied,
            2 => LocationError::PositionUnavailable,
            3 => LocationError::Timeout,
            other => LocationError::Unknown(Some(other)),
        }
    }

    /// W3C geolocation error code, where one applies.
    pub fn code(&self) -> Option<u16> {
        match self {
            LocationError::Unsupported => None,
            LocationError::PermissionDenied => Some(1),
            LocationError::PositionUnavailable => Some(2),
            LocationError::Timeout => Some(3),
            LocationError::Unknown(code) => *code,
        }
    }
}
