use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::rpc::{RpcRegistry, rewards};
use crate::sessions::SessionStore;

/// Server keys, as configured on a Nakama server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Key expected in the Basic authentication of authenticate calls.
    pub server_key: String,
    /// Key accepted by server functions called without session.
    pub http_key: String,
    /// Lifetime of issued session tokens.
    pub token_expiry: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_key: "defaultkey".to_string(),
            http_key: "defaulthttpkey".to_string(),
            token_expiry: Duration::from_secs(60 * 60),
        }
    }
}

/// The application state
#[derive(Debug, Clone)]
pub struct AppState {
    started_at: Instant,
    pub(crate) config: Arc<ServerConfig>,
    pub(crate) sessions: SessionStore,
    pub(crate) registry: Arc<RpcRegistry>,
}

impl AppState {
    /// Create a state with the built-in server functions
    pub fn new(config: ServerConfig) -> Self {
        let registry = RpcRegistry::new().register("rewards", rewards);
        Self::with_registry(config, registry)
    }

    /// Create a state with custom server functions
    pub fn with_registry(config: ServerConfig, registry: RpcRegistry) -> Self {
        let sessions = SessionStore::new(config.token_expiry);
        Self {
            started_at: Instant::now(),
            config: Arc::new(config),
            sessions,
            registry: Arc::new(registry),
        }
    }

    pub(crate) fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
