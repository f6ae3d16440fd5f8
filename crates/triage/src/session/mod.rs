//! Persisted chat sessions.
//!
//! A session is one conversation plus the location fix it was started
//! with. Sessions are stored wholesale as JSON documents in a
//! [`KeyValueStore`](crate::storage::KeyValueStore); every save overwrites
//! the previous record.

mod id;
mod models;
mod store;

pub use id::{generate_message_id, generate_session_id, now_millis};
pub use models::{Author, ChatMessage, MedicalFacility, StoredSession, StructuredAdvice};
pub use store::{SESSION_KEY_PREFIX, SessionStore};
