//! Webhook stream event types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One newline-delimited record of the webhook response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// Start of an assistant message; resets accumulated text.
    Begin {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Map<String, Value>>,
    },
    /// Incremental text fragment.
    Item {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Map<String, Value>>,
    },
    /// End of an assistant message.
    End {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Map<String, Value>>,
    },
}

impl StreamEvent {
    pub fn begin() -> Self {
        StreamEvent::Begin { metadata: None }
    }

    pub fn item(content: impl Into<String>) -> Self {
        StreamEvent::Item {
            content: Some(content.into()),
            metadata: None,
        }
    }

    pub fn end() -> Self {
        StreamEvent::End { metadata: None }
    }

    /// Parse a single trimmed line.
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Wire name of the event type.
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Begin { .. } => "begin",
            StreamEvent::Item { .. } => "item",
            StreamEvent::End { .. } => "end",
        }
    }

    /// Text carried by an `item` event, if non-empty.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Item {
                content: Some(content),
                ..
            } if !content.is_empty() => Some(content),
            _ => None,
        }
    }
}
