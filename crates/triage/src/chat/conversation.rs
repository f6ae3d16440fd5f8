//! A single chat conversation and its turns.

use async_trait::async_trait;
use futures::stream::Stream;
use log::{info, warn};
use std::fmt::Display;
use tracing::instrument;

use crate::location::LocationFix;
use crate::session::{
    ChatMessage, SessionStore, StoredSession, StructuredAdvice, generate_session_id,
};
use crate::stream::{StreamEvent, TurnHandler, TurnSummary, drive_turn};
use crate::webhook::{DEFAULT_SEARCH_RADIUS_KM, SYSTEM_PROMPT, TriageClient, TriageRequest};

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The webhook sent its `end` event.
    Completed,
    /// The body ended without an `end` event.
    Truncated,
    /// The transport failed; the message was replaced with the error.
    Failed(String),
}

/// A conversation bound to a session record.
///
/// Turns take `&mut self`, so a conversation never has two turns in flight.
#[derive(Debug)]
pub struct Conversation {
    session_id: String,
    messages: Vec<ChatMessage>,
    location: LocationFix,
    store: SessionStore,
    search_radius_km: u32,
    system_prompt: String,
}

impl Conversation {
    /// Start a new conversation with a fresh session ID.
    pub fn start(store: SessionStore, location: LocationFix) -> Self {
        let session_id = generate_session_id();
        info!("Starting session {}", session_id);
        Self::from_parts(session_id, Vec::new(), location, store)
    }

    /// Reopen a stored conversation. Returns `None` if the session is
    /// missing or unreadable.
    pub async fn resume(store: SessionStore, session_id: &str) -> Option<Self> {
        let StoredSession {
            session_id,
            messages,
            location_data,
            ..
        } = store.load(session_id).await?;
        info!("Resuming session {} ({} messages)", session_id, messages.len());
        Some(Self::from_parts(session_id, messages, location_data, store))
    }

    fn from_parts(
        session_id: String,
        messages: Vec<ChatMessage>,
        location: LocationFix,
        store: SessionStore,
    ) -> Self {
        Self {
            session_id,
            messages,
            location,
            store,
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Set the facility search radius sent with each request.
    pub fn with_search_radius(mut self, km: u32) -> Self {
        self.search_radius_km = km;
        self
    }

    /// Replace the instruction block sent with each request.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn location(&self) -> &LocationFix {
        &self.location
    }

    /// Run a full turn: record the user's input, call the webhook, and
    /// stream the answer into the conversation. Every fragment is also
    /// passed to `sink` as it arrives.
    #[instrument(skip(self, client, input, sink), fields(session_id = %self.session_id))]
    pub async fn send<F>(&mut self, client: &TriageClient, input: &str, sink: F) -> TurnOutcome
    where
        F: FnMut(&str) + Send,
    {
        let request = self.begin_turn(input).await;
        match client.send(&request).await {
            Ok(events) => self.stream_turn(events, sink).await,
            Err(e) => {
                let mut turn = ActiveTurn {
                    conversation: self,
                    sink,
                };
                turn.on_error(e.to_string()).await;
                TurnOutcome::Failed(e.to_string())
            }
        }
    }

    /// Append the user's message and an empty streaming assistant message,
    /// persist, and return the webhook request for the turn.
    pub async fn begin_turn(&mut self, input: &str) -> TriageRequest {
        self.messages.push(ChatMessage::user(input));
        self.messages.push(ChatMessage::assistant_placeholder());
        self.persist().await;

        TriageRequest::new(&self.session_id, input, &self.location)
            .within_distance(self.search_radius_km)
            .system_prompt(self.system_prompt.clone())
    }

    /// Fold an event stream into the trailing assistant message.
    pub async fn stream_turn<S, E, F>(&mut self, events: S, sink: F) -> TurnOutcome
    where
        S: Stream<Item = Result<StreamEvent, E>>,
        E: Display,
        F: FnMut(&str) + Send,
    {
        let mut turn = ActiveTurn {
            conversation: self,
            sink,
        };
        let summary: TurnSummary = drive_turn(events, &mut turn).await;

        if let Some(error) = summary.error {
            return TurnOutcome::Failed(error);
        }
        if summary.completions > 0 {
            return TurnOutcome::Completed;
        }

        warn!(
            "Webhook stream for session {} ended without an end event",
            self.session_id
        );
        if let Some(message) = self.trailing_assistant() {
            message.streaming = Some(false);
        }
        self.persist().await;
        TurnOutcome::Truncated
    }

    fn trailing_assistant(&mut self) -> Option<&mut ChatMessage> {
        self.messages.last_mut().filter(|m| !m.is_user)
    }

    async fn persist(&self) {
        self.store
            .save(&self.session_id, &self.messages, &self.location)
            .await;
    }
}

/// Routes turn progress into the conversation and the caller's sink.
struct ActiveTurn<'a, F> {
    conversation: &'a mut Conversation,
    sink: F,
}

#[async_trait]
impl<F> TurnHandler for ActiveTurn<'_, F>
where
    F: FnMut(&str) + Send,
{
    async fn on_chunk(&mut self, chunk: &str) {
        (self.sink)(chunk);
        if let Some(message) = self.conversation.trailing_assistant() {
            message.content.push_str(chunk);
        }
        self.conversation.persist().await;
    }

    async fn on_complete(&mut self, advice: Option<StructuredAdvice>) {
        if let Some(message) = self.conversation.trailing_assistant() {
            message.streaming = Some(false);
            if advice.is_some() {
                message.content.clear();
            }
            message.advice = advice;
        }
        self.conversation.persist().await;
    }

    async fn on_error(&mut self, error: String) {
        if let Some(message) = self.conversation.trailing_assistant() {
            message.content = format!("Error: {error}");
            message.streaming = Some(false);
        }
        self.conversation.persist().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Author;
    use crate::storage::MemoryStore;
    use futures::stream;
    use std::sync::Arc;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(MemoryStore::new()))
    }

    fn location() -> LocationFix {
        LocationFix {
            coordinates: "18.52, 73.85".to_string(),
            location_string: "Pune, Maharashtra".to_string(),
        }
    }

    fn events(
        items: Vec<Result<StreamEvent, String>>,
    ) -> impl Stream<Item = Result<StreamEvent, String>> {
        stream::iter(items)
    }

    #[tokio::test]
    async fn test_begin_turn_appends_and_persists() {
        let store = store();
        let mut conversation =
            Conversation::start(store.clone(), location()).with_search_radius(20);

        let request = conversation.begin_turn("I have a headache").await;
        assert_eq!(request.session_id, conversation.session_id());
        assert_eq!(request.user_input, "I have a headache");
        assert_eq!(request.within_distance, 20);
        assert_eq!(request.location, "Pune, Maharashtra");

        let messages = conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].author(), Author::User);
        assert!(messages[1].is_streaming());
        assert!(messages[1].content.is_empty());

        let stored = store.load(conversation.session_id()).await.unwrap();
        assert_eq!(stored.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_stream_turn_completes() {
        let store = store();
        let mut conversation = Conversation::start(store.clone(), location());
        conversation.begin_turn("fever").await;

        let mut seen = Vec::new();
        let outcome = conversation
            .stream_turn(
                events(vec![
                    Ok(StreamEvent::begin()),
                    Ok(StreamEvent::item("### Severity\n")),
                    Ok(StreamEvent::item("Non-Emergency")),
                    Ok(StreamEvent::end()),
                ]),
                |chunk: &str| seen.push(chunk.to_string()),
            )
            .await;

        assert_eq!(outcome, TurnOutcome::Completed);
        assert_eq!(seen, vec!["### Severity\n", "Non-Emergency"]);

        let assistant = conversation.messages().last().unwrap();
        assert_eq!(assistant.content, "### Severity\nNon-Emergency");
        assert!(!assistant.is_streaming());
        assert!(assistant.advice.is_none());

        let stored = store.load(conversation.session_id()).await.unwrap();
        assert_eq!(stored.messages, conversation.messages());
    }

    #[tokio::test]
    async fn test_stream_turn_error_replaces_content() {
        let mut conversation = Conversation::start(store(), location());
        conversation.begin_turn("cough").await;

        let outcome = conversation
            .stream_turn(
                events(vec![
                    Ok(StreamEvent::item("partial")),
                    Err("connection reset".to_string()),
                ]),
                |_: &str| {},
            )
            .await;

        assert_eq!(outcome, TurnOutcome::Failed("connection reset".to_string()));
        let assistant = conversation.messages().last().unwrap();
        assert_eq!(assistant.content, "Error: connection reset");
        assert!(!assistant.is_streaming());
    }

    #[tokio::test]
    async fn test_stream_without_end_is_truncated() {
        let mut conversation = Conversation::start(store(), location());
        conversation.begin_turn("rash").await;

        let outcome = conversation
            .stream_turn(events(vec![Ok(StreamEvent::item("Apply"))]), |_: &str| {})
            .await;

        assert_eq!(outcome, TurnOutcome::Truncated);
        let assistant = conversation.messages().last().unwrap();
        assert_eq!(assistant.content, "Apply");
        assert!(!assistant.is_streaming());
    }

    #[tokio::test]
    async fn test_resume_round_trip() {
        let store = store();
        let mut conversation = Conversation::start(store.clone(), location());
        conversation.begin_turn("back pain").await;
        let id = conversation.session_id().to_string();

        let resumed = Conversation::resume(store.clone(), &id).await.unwrap();
        assert_eq!(resumed.messages(), conversation.messages());
        assert_eq!(resumed.location(), &location());

        assert!(Conversation::resume(store, "missing").await.is_none());
    }

    #[tokio::test]
    async fn test_turns_only_append() {
        let mut conversation = Conversation::start(store(), location());

        conversation.begin_turn("one").await;
        let answer = events(vec![Ok(StreamEvent::item("a")), Ok(StreamEvent::end())]);
        conversation.stream_turn(answer, |_: &str| {}).await;
        let first_turn: Vec<ChatMessage> = conversation.messages().to_vec();

        conversation.begin_turn("two").await;
        let answer = events(vec![Ok(StreamEvent::item("b")), Ok(StreamEvent::end())]);
        conversation.stream_turn(answer, |_: &str| {}).await;

        assert_eq!(conversation.messages().len(), 4);
        assert_eq!(&conversation.messages()[..2], first_turn.as_slice());
        assert_eq!(conversation.messages()[3].content, "b");
    }
}
