//! Conversation driver.
//!
//! Ties a persisted session to the webhook: each turn appends the user's
//! message and a streaming assistant placeholder, then folds the webhook's
//! event stream into that placeholder.

mod conversation;

pub use conversation::{Conversation, TurnOutcome};
