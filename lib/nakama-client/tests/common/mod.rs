#![allow(dead_code, missing_docs, clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use nakama_client::NakamaClient;
use rstest::fixture;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// The canned answer of the mock server.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
            delay: None,
        }
    }

    pub fn status(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone)]
struct MockState {
    reply: Arc<Mutex<Reply>>,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.recorded.lock().expect("not poisoned").push(Recorded {
        method,
        uri,
        headers,
        body,
    });

    let reply = state.reply.lock().expect("not poisoned").clone();
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    (reply.status, [(CONTENT_TYPE, "application/json")], reply.body)
}

/// An in-process HTTP server recording every request and answering a canned reply.
#[derive(Debug)]
pub struct MockServer {
    addr: SocketAddr,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub async fn start() -> anyhow::Result<Self> {
        let state = MockState {
            reply: Arc::new(Mutex::new(Reply::ok("{}"))),
            recorded: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new().fallback(record).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, app).await {
                tracing::error!(?error, "mock server failed");
            }
        });
        info!(%addr, "mock server started");

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    pub fn reply_with(&self, reply: Reply) {
        *self.state.reply.lock().expect("not poisoned") = reply;
    }

    pub fn client(&self) -> NakamaClient {
        self.builder().build().expect("valid client")
    }

    pub fn builder(&self) -> nakama_client::NakamaClientBuilder {
        NakamaClient::builder()
            .with_host(self.addr.ip().to_string())
            .with_port(self.addr.port())
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.recorded.lock().expect("not poisoned").clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("at least one request")
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[fixture]
pub async fn server() -> MockServer {
    init_tracing();
    match MockServer::start().await {
        Ok(server) => server,
        Err(error) => panic!("fail to start mock server: {error:?}"),
    }
}
