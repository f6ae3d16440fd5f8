//! Streaming chat client for a symptom-triage assistant.
//!
//! A conversation sends the user's symptoms and location to a triage
//! webhook, consumes the newline-delimited JSON answer as it streams in,
//! and persists the session through a pluggable key-value store.

pub mod chat;
pub mod location;
pub mod markdown;
pub mod session;
pub mod storage;
pub mod stream;
pub mod webhook;
