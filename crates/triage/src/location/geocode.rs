//! Reverse geocoding.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::Position;

/// Public OpenStreetMap Nominatim instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Best-effort lookup of a place name for a position.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Returns `None` on any failure.
    async fn reverse(&self, position: Position) -> Option<String>;
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    display_name: Option<String>,
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
    state: Option<String>,
}

impl NominatimResponse {
    /// "City, State", "City", or the full display name.
    fn place_name(self) -> Option<String> {
        let address = self.address?;
        let city = address
            .city
            .or(address.town)
            .or(address.village)
            .or(address.county);

        match (city, address.state) {
            (Some(city), Some(state)) => Some(format!("{city}, {state}")),
            (Some(city), None) => Some(city),
            (None, _) => self.display_name,
        }
    }
}

/// Reverse geocoder backed by the Nominatim `/reverse` API.
///
/// Nominatim's usage policy requires an identifying `User-Agent`; it is sent
/// with every request.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Fails if the HTTP client cannot be built, e.g. when `user_agent` is
    /// not a valid header value.
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn lookup(&self, position: Position) -> Result<Option<String>, reqwest::Error> {
        let url = format!("{}/reverse", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", position.latitude.to_string()),
                ("lon", position.longitude.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            debug!("Reverse geocoding returned status {}", response.status());
            return Ok(None);
        }

        let body: NominatimResponse = response.json().await?;
        Ok(body.place_name())
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, position: Position) -> Option<String> {
        match self.lookup(position).await {
            Ok(name) => name,
            Err(e) => {
                warn!("Reverse geocoding failed: {}", e);
                None
            }
        }
    }
}
