//! Triage webhook client.
//!
//! The webhook is an external workflow service: it accepts a JSON request
//! describing the user's symptoms and location, and streams the assistant's
//! answer back as newline-delimited JSON events.

mod client;
mod error;
mod prompt;
mod types;

pub use client::{EventStream, TriageClient, TriageClientConfig};
pub use error::{WebhookError, WebhookResult};
pub use prompt::SYSTEM_PROMPT;
pub use types::{DEFAULT_ENDPOINT, DEFAULT_SEARCH_RADIUS_KM, TriageRequest};
