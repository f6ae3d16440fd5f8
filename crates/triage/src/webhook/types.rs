//! Webhook request types.

use serde::{Deserialize, Serialize};

use super::prompt::SYSTEM_PROMPT;
use crate::location::LocationFix;

/// Default triage webhook endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://ai-h.app.n8n.cloud/webhook/medical-triage";

/// Default facility search radius in kilometres.
pub const DEFAULT_SEARCH_RADIUS_KM: u32 = 100;

/// Body of a triage request.
///
/// Field names are fixed by the webhook, including the `location_coordnates`
/// spelling and the space in `"system prompt"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageRequest {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub user_input: String,
    #[serde(rename = "location_coordnates")]
    pub location_coordinates: String,
    #[serde(rename = "location_str")]
    pub location: String,
    /// Search radius in kilometres.
    pub within_distance: u32,
    #[serde(rename = "system prompt")]
    pub system_prompt: String,
}

impl TriageRequest {
    /// Build a request with the default radius and instruction block.
    pub fn new(
        session_id: impl Into<String>,
        user_input: impl Into<String>,
        location: &LocationFix,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_input: user_input.into(),
            location_coordinates: location.coordinates.clone(),
            location: location.location_string.clone(),
            within_distance: DEFAULT_SEARCH_RADIUS_KM,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Set the search radius.
    pub fn within_distance(mut self, km: u32) -> Self {
        self.within_distance = km;
        self
    }

    /// Replace the instruction block.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}
