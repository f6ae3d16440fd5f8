//! End-to-end conversation tests against an in-process webhook.

use std::sync::Arc;

mod common;
use common::{client_for, spawn_server, test_location};

use triage::chat::{Conversation, TurnOutcome};
use triage::session::SessionStore;
use triage::storage::{KeyValueStore, LocalStore, MemoryStore};

fn memory_sessions() -> SessionStore {
    SessionStore::new(Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn test_full_turn_is_streamed_and_persisted() {
    let server = spawn_server(vec![
        "{\"type\":\"begin\"}\n{\"type\":\"item\",\"content\":\"Rest and \"}\n",
        "{\"type\":\"item\",\"content\":\"drink fluids.\"}\n{\"type\":\"end\"}\n",
    ])
    .await;
    let store = memory_sessions();
    let mut conversation = Conversation::start(store.clone(), test_location());

    let mut seen = Vec::new();
    let outcome = conversation
        .send(&server.client(), "I have a mild fever", |chunk: &str| {
            seen.push(chunk.to_string())
        })
        .await;

    assert_eq!(outcome, TurnOutcome::Completed);
    assert_eq!(seen, vec!["Rest and ", "drink fluids."]);

    let stored = store.load(conversation.session_id()).await.unwrap();
    assert_eq!(stored.messages.len(), 2);
    assert!(stored.messages[0].is_user);
    assert_eq!(stored.messages[0].content, "I have a mild fever");
    assert_eq!(stored.messages[1].content, "Rest and drink fluids.");
    assert!(!stored.messages[1].is_streaming());
    assert!(stored.messages[1].advice.is_none());
    assert_eq!(stored.location_data, test_location());

    let bodies = server.bodies();
    assert_eq!(bodies[0]["sessionId"], conversation.session_id());
    assert_eq!(bodies[0]["user_input"], "I have a mild fever");
}

#[tokio::test]
async fn test_http_error_is_recorded_in_transcript() {
    let server = spawn_server(vec![]).await;
    let store = memory_sessions();
    let mut conversation = Conversation::start(store.clone(), test_location());

    let outcome = conversation
        .send(&client_for(server.failing_url()), "chest pain", |_: &str| {})
        .await;

    assert_eq!(
        outcome,
        TurnOutcome::Failed("HTTP error! status: 502".to_string())
    );

    let stored = store.load(conversation.session_id()).await.unwrap();
    let reply = &stored.messages[1];
    assert_eq!(reply.content, "Error: HTTP error! status: 502");
    assert!(!reply.is_streaming());
}

#[tokio::test]
async fn test_stream_without_end_is_truncated() {
    let server = spawn_server(vec!["{\"type\":\"item\",\"content\":\"Partial\"}\n"]).await;
    let mut conversation = Conversation::start(memory_sessions(), test_location());

    let outcome = conversation
        .send(&server.client(), "rash", |_: &str| {})
        .await;

    assert_eq!(outcome, TurnOutcome::Truncated);
    let reply = conversation.messages().last().unwrap();
    assert_eq!(reply.content, "Partial");
    assert!(!reply.is_streaming());
}

/// A session written to disk can be resumed by a later run.
#[tokio::test]
async fn test_resume_from_local_store() {
    let temp = tempfile::tempdir().unwrap();
    let server = spawn_server(vec![
        "{\"type\":\"begin\"}\n{\"type\":\"item\",\"content\":\"Noted.\"}\n{\"type\":\"end\"}\n",
    ])
    .await;

    let backend: Arc<dyn KeyValueStore> = Arc::new(LocalStore::new(temp.path()));
    let session_id = {
        let mut conversation = Conversation::start(SessionStore::new(backend), test_location());
        conversation
            .send(&server.client(), "twisted ankle", |_: &str| {})
            .await;
        conversation.session_id().to_string()
    };

    let backend: Arc<dyn KeyValueStore> = Arc::new(LocalStore::new(temp.path()));
    let mut resumed = Conversation::resume(SessionStore::new(backend), &session_id)
        .await
        .unwrap();
    assert_eq!(resumed.messages().len(), 2);
    assert_eq!(resumed.location(), &test_location());

    resumed
        .send(&server.client(), "it is swollen now", |_: &str| {})
        .await;
    assert_eq!(resumed.messages().len(), 4);
    assert_eq!(server.bodies()[1]["sessionId"], session_id);
}

#[tokio::test]
async fn test_resume_missing_session() {
    assert!(
        Conversation::resume(memory_sessions(), "0-missing")
            .await
            .is_none()
    );
}
