//! Fake hosted vector index for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves `POST /query`, answering from a [`MemoryIndex`] unless a
//! canned failure or delay has been configured. Every request body and
//! `Authorization` header is recorded for inspection.
//!
//! # Example
//!
//! ```rust,no_run
//! let api = FakeIndexApi::start(catalog_index()).await.unwrap();
//! let index = HttpIndex::new(&IndexConfig { url: api.base_url(), ..Default::default() })?;
//! ```

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use shelf_core::QueryRequest;
use shelf_index::{MemoryIndex, VectorIndex};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A request as the fake index received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub body: serde_json::Value,
    pub authorization: Option<String>,
}

/// Behaviour overrides for the next requests.
#[derive(Default)]
struct Script {
    failure: Option<(StatusCode, String)>,
    raw_body: Option<String>,
    delay: Option<Duration>,
}

struct ApiState {
    index: MemoryIndex,
    script: Mutex<Script>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Handle to the running fake index server.
pub struct FakeIndexApi {
    addr: SocketAddr,
    state: Arc<ApiState>,
}

impl FakeIndexApi {
    /// Start the fake index on a random port. Returns once the server is
    /// listening.
    pub async fn start(index: MemoryIndex) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(ApiState {
            index,
            script: Mutex::new(Script::default()),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/query", post(handle_query))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL for the API (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer every following request with `status` and `body`.
    pub async fn fail_with(&self, status: StatusCode, body: &str) {
        self.state.script.lock().await.failure = Some((status, body.to_string()));
    }

    /// Answer every following request with `200` and this literal body.
    pub async fn respond_raw(&self, body: &str) {
        self.state.script.lock().await.raw_body = Some(body.to_string());
    }

    /// Sleep this long before answering.
    pub async fn delay(&self, delay: Duration) {
        self.state.script.lock().await.delay = Some(delay);
    }

    /// Requests received so far.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().await.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn handle_query(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.requests.lock().await.push(RecordedRequest {
        body: body.clone(),
        authorization: headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let (failure, raw_body, delay) = {
        let script = state.script.lock().await;
        (script.failure.clone(), script.raw_body.clone(), script.delay)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some((status, body)) = failure {
        return (status, body).into_response();
    }
    if let Some(body) = raw_body {
        return (StatusCode::OK, body).into_response();
    }

    let request: QueryRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    match state.index.query(&request).await {
        Ok(result) => Json(serde_json::json!({ "result": result })).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}
