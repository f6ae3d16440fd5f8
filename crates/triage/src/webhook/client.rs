//! Triage webhook HTTP client.

use futures::stream::{Stream, TryStreamExt};
use log::{debug, info};
use reqwest::Client;
use std::pin::Pin;
use std::time::Duration;
use tracing::instrument;

use super::error::{WebhookError, WebhookResult};
use super::types::{DEFAULT_ENDPOINT, TriageRequest};
use crate::stream::{StreamEvent, decode_events};

/// Lazily decoded events of one webhook response.
pub type EventStream = Pin<Box<dyn Stream<Item = WebhookResult<StreamEvent>> + Send>>;

/// Configuration for the triage client.
#[derive(Debug, Clone)]
pub struct TriageClientConfig {
    /// Webhook URL requests are POSTed to.
    pub endpoint: String,
    /// Limit on establishing the connection. Reading the stream is never
    /// timed out.
    pub connect_timeout: Option<Duration>,
}

impl Default for TriageClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Client for the triage webhook.
#[derive(Debug, Clone)]
pub struct TriageClient {
    /// HTTP client.
    client: Client,
    /// Webhook URL.
    endpoint: String,
}

impl TriageClient {
    /// Create a new triage client.
    pub fn new(config: TriageClientConfig) -> WebhookResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| WebhookError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a request and return the decoded event stream of the response.
    #[instrument(skip(self, request), fields(session_id = %request.session_id))]
    pub async fn send(&self, request: &TriageRequest) -> WebhookResult<EventStream> {
        debug!(
            "Posting {} chars of user input to {}",
            request.user_input.len(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status(status.as_u16()));
        }

        info!("Webhook responded {}, streaming events", status);
        let body = response.bytes_stream().map_err(WebhookError::StreamFailed);
        Ok(Box::pin(decode_events(body)))
    }
}
