#![allow(
    clippy::missing_errors_doc,
    dead_code,
    missing_docs,
    clippy::expect_used
)]
use std::net::SocketAddr;

use nakama_client::NakamaClient;
use nakama_client::api::Healthcheck;
use rstest::fixture;
use tokio::task::JoinHandle;
use tracing::info;

use rewards_rpc::{ServerConfig, launch};

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

pub const SERVER_KEY: &str = "test-server-key";
pub const HTTP_KEY: &str = "test-http-key";

/// A running server and a client pointing at it.
#[derive(Debug)]
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: NakamaClient,
    handle: JoinHandle<()>,
}

impl TestApp {
    pub async fn start() -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let config = ServerConfig {
            server_key: SERVER_KEY.to_string(),
            http_key: HTTP_KEY.to_string(),
            ..ServerConfig::default()
        };
        let handle = tokio::spawn(async move {
            info!(?addr, "launching server");
            launch(listener, config).await.expect("server launched");
        });

        let client = NakamaClient::builder()
            .with_host(addr.ip().to_string())
            .with_port(addr.port())
            .with_server_key(SERVER_KEY)
            .build()?;
        client.send(Healthcheck::new()).await?;

        Ok(Self {
            addr,
            client,
            handle,
        })
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[fixture]
pub async fn app() -> TestApp {
    init_tracing();
    match TestApp::start().await {
        Ok(app) => app,
        Err(error) => {
            panic!("fail to start test app: {error:?}");
        }
    }
}
