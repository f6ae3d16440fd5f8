//! Position sources and fix resolution.

use async_trait::async_trait;
use log::{debug, info};

use super::{LocationError, LocationFix, Position, PositionOptions, ReverseGeocoder};

/// Source of one-shot position fixes.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, LocationError>;
}

/// A position supplied up front (command line or configuration).
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Position);

#[async_trait]
impl PositionProvider for FixedPosition {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Position, LocationError> {
        Ok(self.0)
    }
}

/// A provider that always fails with the given error.
#[derive(Debug, Clone)]
pub struct Unavailable(pub LocationError);

#[async_trait]
impl PositionProvider for Unavailable {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Position, LocationError> {
        Err(self.0.clone())
    }
}

/// Obtain a position and resolve it into a location fix.
///
/// The provider must answer within `options.timeout`. Reverse geocoding is
/// best-effort; without a place name the coordinates are used.
pub async fn request_location(
    provider: &dyn PositionProvider,
    geocoder: Option<&dyn ReverseGeocoder>,
    options: &PositionOptions,
) -> Result<LocationFix, LocationError> {
    let position = tokio::time::timeout(options.timeout, provider.current_position(options))
        .await
        .map_err(|_| LocationError::Timeout)??;

    let coordinates = position.to_string();
    let place = match geocoder {
        Some(geocoder) => geocoder.reverse(position).await,
        None => None,
    };

    let location_string = match place {
        Some(place) => place,
        None => {
            debug!("No place name for {}, using coordinates", coordinates);
            coordinates.clone()
        }
    };

    info!("Location fix: {} ({})", location_string, coordinates);
    Ok(LocationFix {
        coordinates,
        location_string,
    })
}
