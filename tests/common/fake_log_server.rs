//! Fake log platform for integration tests.
//!
//! Spins up a minimal `axum` server on a random TCP port bound to 127.0.0.1.
//! Serves:
//! - `GET /apps/{app}/sources`: the configured inventory, or a forced error
//! - `GET /logs`: a WebSocket that replays the frames scripted for the
//!   requested `source`, then closes (or stays open when `hold_open` is set)
//!
//! Every stream request is recorded with its query and `Authorization`
//! header so tests can assert what the client asked for.
//!
//! # Example
//!
//! ```rust,no_run
//! let server = FakeLogServer::start().await.unwrap();
//! server.add_source("shop", "web-1").await;
//! server.script("web-1", &["Listening on port 3000\n"]).await;
//! let transport = WebSocketTransport::new(&server.stream_url(), None)?;
//! ```

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// One recorded `/logs` upgrade request.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct ServerState {
    sources: HashMap<String, Vec<serde_json::Value>>,
    directory_status: Option<StatusCode>,
    directory_auth: Vec<Option<String>>,
    frames: HashMap<String, Vec<String>>,
    hold_open: bool,
    requests: Vec<StreamRequest>,
}

type Shared = Arc<Mutex<ServerState>>;

/// Handle to the running fake server.
pub struct FakeLogServer {
    addr: SocketAddr,
    state: Shared,
}

impl FakeLogServer {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state: Shared = Arc::new(Mutex::new(ServerState::default()));

        let app = Router::new()
            .route("/apps/{app}/sources", get(list_sources))
            .route("/logs", get(stream_logs))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL for the inventory (e.g. `http://127.0.0.1:PORT`).
    pub fn directory_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// WebSocket endpoint for log streams.
    pub fn stream_url(&self) -> String {
        format!("ws://{}/logs", self.addr)
    }

    /// Register a running source under `app`.
    pub async fn add_source(&self, app: &str, source_id: &str) {
        let mut state = self.state.lock().await;
        state
            .sources
            .entry(app.to_string())
            .or_default()
            .push(serde_json::json!({
                "sourceId": source_id,
                "name": source_id,
                "state": "running",
            }));
    }

    /// Make every inventory request fail with `status`.
    pub async fn fail_directory(&self, status: StatusCode) {
        self.state.lock().await.directory_status = Some(status);
    }

    /// Frames replayed, one WebSocket text message each, to streams of
    /// `source_id`.
    pub async fn script(&self, source_id: &str, frames: &[&str]) {
        let mut state = self.state.lock().await;
        state.frames.insert(
            source_id.to_string(),
            frames.iter().map(|f| f.to_string()).collect(),
        );
    }

    /// Keep streams open after their frames instead of closing them.
    pub async fn hold_open(&self) {
        self.state.lock().await.hold_open = true;
    }

    pub async fn stream_requests(&self) -> Vec<StreamRequest> {
        self.state.lock().await.requests.clone()
    }

    pub async fn directory_auth(&self) -> Vec<Option<String>> {
        self.state.lock().await.directory_auth.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn list_sources(
    Path(app): Path<String>,
    headers: HeaderMap,
    State(state): State<Shared>,
) -> Response {
    let mut state = state.lock().await;
    state.directory_auth.push(authorization(&headers));
    if let Some(status) = state.directory_status {
        return status.into_response();
    }
    Json(state.sources.get(&app).cloned().unwrap_or_default()).into_response()
}

async fn stream_logs(
    ws: WebSocketUpgrade,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    State(state): State<Shared>,
) -> Response {
    let (frames, hold_open) = {
        let mut state = state.lock().await;
        let source = query.get("source").cloned().unwrap_or_default();
        state.requests.push(StreamRequest {
            query,
            authorization: authorization(&headers),
        });
        (
            state.frames.get(&source).cloned().unwrap_or_default(),
            state.hold_open,
        )
    };
    ws.on_upgrade(move |socket| replay(socket, frames, hold_open))
}

async fn replay(mut socket: WebSocket, frames: Vec<String>, hold_open: bool) {
    for frame in frames {
        if socket.send(Message::Text(frame.into())).await.is_err() {
            return;
        }
    }
    if hold_open {
        while let Some(Ok(_)) = socket.recv().await {}
    } else {
        let _ = socket.send(Message::Close(None)).await;
    }
}
