//! Session data models.
//!
//! Field names follow the persisted JSON layout (`sessionId`, `isUser`,
//! `locationData`, ...), so records written by other clients of the same
//! store load unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::id::generate_message_id;
use crate::location::LocationFix;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Author::User => write!(f, "user"),
            Author::Assistant => write!(f, "assistant"),
        }
    }
}

/// A healthcare facility suggested by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalFacility {
    pub name: String,
    pub address: String,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
}

/// Structured triage result attached to an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredAdvice {
    /// Free-text severity label (e.g. "Non-Emergency").
    pub severity: String,
    pub precautions: String,
    pub otc_medications: String,
    #[serde(default)]
    pub facilities: Vec<MedicalFacility>,
}

impl StructuredAdvice {
    /// Markdown rendition used in place of the raw transcript.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "### Severity Assessment\n\n{}\n", self.severity);
        let _ = writeln!(out, "### Immediate Precautions\n\n{}\n", self.precautions);
        let _ = writeln!(out, "### Safe OTC Medications\n\n{}\n", self.otc_medications);
        if !self.facilities.is_empty() {
            out.push_str("### Nearby Healthcare Facilities\n\n");
            for (i, facility) in self.facilities.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{}. **{}** ({:.1}/5.0)\n   - Address: {}",
                    i + 1,
                    facility.name,
                    facility.rating,
                    facility.address
                );
                if let Some(ref hours) = facility.hours {
                    let _ = writeln!(out, "   - Hours: {hours}");
                }
                if let Some(ref url) = facility.url {
                    let _ = writeln!(out, "   - Map: <{url}>");
                }
                if let Some(ref reviews) = facility.reviews {
                    let _ = writeln!(out, "   - Reviews: {reviews}");
                }
            }
        }
        out
    }
}

/// One message of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    /// Message text; grows while the assistant is streaming.
    pub content: String,
    pub is_user: bool,
    /// Set on assistant messages; `true` until the turn ends.
    #[serde(
        rename = "isStreaming",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub streaming: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<StructuredAdvice>,
}

impl ChatMessage {
    /// A message typed by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: generate_message_id("user"),
            content: content.into(),
            is_user: true,
            streaming: None,
            advice: None,
        }
    }

    /// An empty assistant message that is about to receive streamed text.
    pub fn assistant_placeholder() -> Self {
        Self {
            id: generate_message_id("ai"),
            content: String::new(),
            is_user: false,
            streaming: Some(true),
            advice: None,
        }
    }

    pub fn author(&self) -> Author {
        if self.is_user {
            Author::User
        } else {
            Author::Assistant
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming.unwrap_or(false)
    }

    /// Whether the raw text should be shown. Structured advice replaces the
    /// transcript of an assistant message.
    pub fn shows_content(&self) -> bool {
        !self.content.is_empty() && (self.is_user || self.advice.is_none())
    }
}

/// A persisted conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    pub location_data: LocationFix,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Milliseconds since the Unix epoch.
    pub updated_at: i64,
}

impl StoredSession {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.updated_at)
    }

    /// First user message, used as a title in listings.
    pub fn title(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.is_user)
            .map(|m| m.content.as_str())
    }
}
