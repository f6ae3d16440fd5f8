//! Newline-delimited JSON ingest for the triage webhook.
//!
//! The webhook answers with a body of `{"type": "begin"|"item"|"end"}`
//! records separated by newlines. Records may be split across read
//! boundaries; this module reassembles them into [`StreamEvent`]s and folds
//! those into incremental turn text.

mod decoder;
mod event;
mod ingest;

pub use decoder::{LineAssembler, Utf8Decoder};
pub use event::StreamEvent;
pub use ingest::{TurnAccumulator, TurnHandler, TurnSummary, TurnUpdate, decode_events, drive_turn};
