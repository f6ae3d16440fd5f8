//! Test utilities: an in-process stand-in for the triage webhook and the
//! reverse geocoding service.

#![allow(dead_code)]

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use bytes::Bytes;
use futures::stream;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use triage::location::LocationFix;
use triage::webhook::{TriageClient, TriageClientConfig};

#[derive(Default)]
struct Recorded {
    bodies: Vec<Value>,
    queries: Vec<HashMap<String, String>>,
    user_agents: Vec<String>,
}

#[derive(Clone)]
struct ServerState {
    chunks: Arc<Vec<&'static str>>,
    recorded: Arc<Mutex<Recorded>>,
}

/// A running test server.
pub struct TestServer {
    pub base_url: String,
    recorded: Arc<Mutex<Recorded>>,
}

impl TestServer {
    /// URL of the streaming webhook route.
    pub fn webhook_url(&self) -> String {
        format!("{}/webhook", self.base_url)
    }

    /// URL of a webhook route that always answers 502.
    pub fn failing_url(&self) -> String {
        format!("{}/failing", self.base_url)
    }

    /// JSON bodies received by the webhook routes, in order.
    pub fn bodies(&self) -> Vec<Value> {
        self.recorded.lock().unwrap().bodies.clone()
    }

    /// Query strings received by `/reverse`, in order.
    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.recorded.lock().unwrap().queries.clone()
    }

    /// `User-Agent` headers received by `/reverse`, in order.
    pub fn user_agents(&self) -> Vec<String> {
        self.recorded.lock().unwrap().user_agents.clone()
    }

    /// A client pointed at the streaming webhook route.
    pub fn client(&self) -> TriageClient {
        client_for(self.webhook_url())
    }
}

pub fn client_for(endpoint: String) -> TriageClient {
    TriageClient::new(TriageClientConfig {
        endpoint,
        ..TriageClientConfig::default()
    })
    .unwrap()
}

/// Start a server whose webhook answers with `chunks`, each written as a
/// separate body frame.
pub async fn spawn_server(chunks: Vec<&'static str>) -> TestServer {
    let recorded = Arc::new(Mutex::new(Recorded::default()));
    let state = ServerState {
        chunks: Arc::new(chunks),
        recorded: recorded.clone(),
    };

    let app = Router::new()
        .route("/webhook", post(stream_answer))
        .route("/failing", post(fail))
        .route("/reverse", get(reverse))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        recorded,
    }
}

async fn stream_answer(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.recorded.lock().unwrap().bodies.push(body);

    let frames: Vec<Result<Bytes, Infallible>> = state
        .chunks
        .iter()
        .map(|chunk| Ok(Bytes::from_static(chunk.as_bytes())))
        .collect();

    (
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        Body::from_stream(stream::iter(frames)),
    )
}

async fn fail(State(state): State<ServerState>, Json(body): Json<Value>) -> StatusCode {
    state.recorded.lock().unwrap().bodies.push(body);
    StatusCode::BAD_GATEWAY
}

async fn reverse(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let lat = query.get("lat").cloned().unwrap_or_default();
    {
        let mut recorded = state.recorded.lock().unwrap();
        recorded.queries.push(query);
        if let Some(agent) = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()) {
            recorded.user_agents.push(agent.to_string());
        }
    }

    // Latitude 0 plays the part of open ocean: no address.
    if lat == "0" {
        return Json(json!({"error": "Unable to geocode"}));
    }

    Json(json!({
        "display_name": "Shivajinagar, Pune, Pune District, Maharashtra, 411005, India",
        "address": {
            "suburb": "Shivajinagar",
            "city": "Pune",
            "state": "Maharashtra",
            "country": "India"
        }
    }))
}

pub fn test_location() -> LocationFix {
    LocationFix {
        coordinates: "18.5204, 73.8567".to_string(),
        location_string: "Pune, Maharashtra".to_string(),
    }
}
