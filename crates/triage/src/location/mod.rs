//! Location fix acquisition.
//!
//! A fix pairs the raw coordinates with a human-readable place name. The
//! position comes from a [`PositionProvider`]; the place name from a
//! best-effort [`ReverseGeocoder`] lookup that falls back to the coordinates.

mod error;
mod geocode;
mod provider;
mod types;

pub use error::LocationError;
pub use geocode::{DEFAULT_NOMINATIM_URL, NominatimGeocoder, ReverseGeocoder};
pub use provider::{FixedPosition, PositionProvider, Unavailable, request_location};
pub use types::{LocationFix, Position, PositionOptions};
