//! Event decoding over a byte stream and turn accumulation.

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use log::{debug, warn};
use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;

use super::decoder::{LineAssembler, Utf8Decoder};
use super::event::StreamEvent;
use crate::session::StructuredAdvice;

struct DecodeState<S> {
    body: Pin<Box<S>>,
    decoder: Utf8Decoder,
    lines: LineAssembler,
    ready: VecDeque<StreamEvent>,
    done: bool,
}

/// Turn a chunked response body into a lazy sequence of stream events.
///
/// Malformed records are logged and skipped. A transport error is yielded
/// once and ends the sequence. A trailing record not completed by the time
/// the body ends is dropped.
pub fn decode_events<S, B, E>(body: S) -> impl Stream<Item = Result<StreamEvent, E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    let state = DecodeState {
        body: Box::pin(body),
        decoder: Utf8Decoder::new(),
        lines: LineAssembler::new(),
        ready: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.ready.pop_front() {
                return Some((Ok(event), state));
            }
            if state.done {
                return None;
            }

            match state.body.next().await {
                Some(Ok(chunk)) => {
                    let text = state.decoder.decode(chunk.as_ref());
                    for line in state.lines.push(&text) {
                        match StreamEvent::parse(&line) {
                            Ok(event) => state.ready.push_back(event),
                            Err(e) => {
                                let display_line: String = line.chars().take(200).collect();
                                warn!(
                                    "Failed to parse stream event: {}, line: {}",
                                    e, display_line
                                );
                            }
                        }
                    }
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(e), state));
                }
                None => {
                    state.done = true;
                    if let Some(fragment) = state.lines.take_remainder() {
                        debug!(
                            "Dropping unterminated trailing record ({} bytes)",
                            fragment.len()
                        );
                    }
                }
            }
        }
    })
}

/// What a single event means for the turn in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnUpdate {
    /// New text to append to the assistant message.
    Chunk(String),
    /// The assistant message is finished.
    Complete {
        /// Structured advice for the message. Never reconstructed from the
        /// streamed text, so currently always `None`.
        advice: Option<StructuredAdvice>,
        /// Text accumulated since the last `begin`.
        text: String,
    },
}

/// Folds stream events into the running text of an assistant message.
#[derive(Debug, Default)]
pub struct TurnAccumulator {
    text: String,
}

impl TurnAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &StreamEvent) -> Option<TurnUpdate> {
        match event {
            StreamEvent::Begin { .. } => {
                self.text.clear();
                None
            }
            StreamEvent::Item { .. } => {
                let chunk = event.text()?;
                self.text.push_str(chunk);
                Some(TurnUpdate::Chunk(chunk.to_string()))
            }
            StreamEvent::End { .. } => Some(TurnUpdate::Complete {
                advice: None,
                text: std::mem::take(&mut self.text),
            }),
        }
    }

    /// Text accumulated since the last boundary.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Receiver of turn progress.
#[async_trait]
pub trait TurnHandler: Send {
    /// A text fragment arrived.
    async fn on_chunk(&mut self, chunk: &str);

    /// The webhook signalled the end of the assistant message.
    async fn on_complete(&mut self, advice: Option<StructuredAdvice>);

    /// The transport failed. Called at most once per turn.
    async fn on_error(&mut self, error: String);
}

/// Counters describing a driven turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnSummary {
    /// Events decoded from the stream.
    pub events: usize,
    /// Fragments forwarded to the handler.
    pub chunks: usize,
    /// `end` events seen.
    pub completions: usize,
    /// Transport error that ended the stream.
    pub error: Option<String>,
}

impl TurnSummary {
    pub fn completed(&self) -> bool {
        self.error.is_none() && self.completions > 0
    }
}

/// Drive an event stream to completion, reporting progress to `handler`.
pub async fn drive_turn<S, E, H>(events: S, handler: &mut H) -> TurnSummary
where
    S: Stream<Item = Result<StreamEvent, E>>,
    E: Display,
    H: TurnHandler + ?Sized,
{
    let mut events = std::pin::pin!(events);
    let mut accumulator = TurnAccumulator::new();
    let mut summary = TurnSummary::default();

    while let Some(item) = events.next().await {
        let event = match item {
            Ok(event) => event,
            Err(e) => {
                let message = e.to_string();
                warn!("Turn stream failed: {}", message);
                handler.on_error(message.clone()).await;
                summary.error = Some(message);
                break;
            }
        };

        summary.events += 1;
        match accumulator.apply(&event) {
            Some(TurnUpdate::Chunk(chunk)) => {
                summary.chunks += 1;
                handler.on_chunk(&chunk).await;
            }
            Some(TurnUpdate::Complete { advice, text }) => {
                summary.completions += 1;
                debug!("Assistant message complete ({} chars)", text.len());
                handler.on_complete(advice).await;
            }
            None => {}
        }
    }

    summary
}
