//! In-process stub of the backend for tests: axum router on 127.0.0.1:0 with
//! scripted replies, per-route call counters and captured request bodies.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header::CONTENT_TYPE, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use serde_json::Value;

use crate::api::ApiClient;
use crate::config::{ClientConfig, Timeouts};
use crate::protocol::Operation;

#[derive(Clone, Debug)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn json(v: Value) -> Self {
        Self::status(200, v)
    }

    pub fn status(status: u16, v: Value) -> Self {
        Self { status, body: v.to_string(), delay: Duration::ZERO }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self { status, body: body.to_string(), delay: Duration::ZERO }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone, Default)]
struct Shared {
    replies: Arc<Mutex<HashMap<&'static str, VecDeque<Reply>>>>,
    calls: Arc<Mutex<HashMap<&'static str, usize>>>,
    bodies: Arc<Mutex<HashMap<&'static str, Vec<Value>>>>,
}

pub struct StubBackend {
    pub base_url: String,
    shared: Shared,
}

impl StubBackend {
    pub async fn start() -> Self {
        let shared = Shared::default();
        let app = Router::new()
            .route(
                Operation::GenerateStudy.path(),
                post(|State(s): State<Shared>, body: Bytes| handle(s, Operation::GenerateStudy, body)),
            )
            .route(
                Operation::StartInterview.path(),
                post(|State(s): State<Shared>, body: Bytes| handle(s, Operation::StartInterview, body)),
            )
            .route(
                Operation::SubmitTheory.path(),
                post(|State(s): State<Shared>, body: Bytes| handle(s, Operation::SubmitTheory, body)),
            )
            .route(
                Operation::SubmitCode.path(),
                post(|State(s): State<Shared>, body: Bytes| handle(s, Operation::SubmitCode, body)),
            )
            .with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url: format!("http://{}", addr), shared }
    }

    /// Queue a reply. The last queued reply for a route keeps being served.
    pub fn reply(&self, op: Operation, reply: Reply) {
        self.shared
            .replies
            .lock()
            .unwrap()
            .entry(op.path())
            .or_default()
            .push_back(reply);
    }

    /// Drop anything queued for the route and serve `reply` from now on.
    pub fn replace(&self, op: Operation, reply: Reply) {
        let mut replies = self.shared.replies.lock().unwrap();
        let queue = replies.entry(op.path()).or_default();
        queue.clear();
        queue.push_back(reply);
    }

    pub fn calls(&self, op: Operation) -> usize {
        self.shared.calls.lock().unwrap().get(op.path()).copied().unwrap_or(0)
    }

    pub fn bodies(&self, op: Operation) -> Vec<Value> {
        self.shared.bodies.lock().unwrap().get(op.path()).cloned().unwrap_or_default()
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig { api_base_url: self.base_url.clone(), ..ClientConfig::default() }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config()).unwrap()
    }

    pub fn client_with(&self, timeouts: Timeouts) -> ApiClient {
        ApiClient::new(&ClientConfig { timeouts, ..self.config() }).unwrap()
    }
}

async fn handle(s: Shared, op: Operation, body: Bytes) -> impl IntoResponse {
    let key = op.path();
    *s.calls.lock().unwrap().entry(key).or_insert(0) += 1;
    s.bodies
        .lock()
        .unwrap()
        .entry(key)
        .or_default()
        .push(serde_json::from_slice(&body).unwrap_or(Value::Null));

    let reply = {
        let mut replies = s.replies.lock().unwrap();
        let queue = replies.entry(key).or_default();
        if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() }
    };
    let reply = reply.unwrap_or_else(|| Reply::raw(500, r#"{"message":"no stub reply"}"#));

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(CONTENT_TYPE, "application/json")], reply.body)
}
