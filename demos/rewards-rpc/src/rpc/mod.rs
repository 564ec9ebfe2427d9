//! Server functions callable through `/v2/rpc/{id}`.
//!
//! A function receives the caller context and the raw payload string, and
//! returns the encoded response payload. Decoding is the function's own
//! business: an invalid payload is rejected before any logic runs, and the
//! decode error is returned to the caller as-is.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use axum::http::StatusCode;
use tracing::debug;

mod rewards;
pub use self::rewards::{Rewards, rewards};

/// The signature of a server function.
pub type RpcHandler = fn(&RpcContext, &str) -> Result<String, RpcError>;

/// Who is calling a server function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpcContext {
    /// The caller user ID, `None` when called with the HTTP key.
    pub user_id: Option<String>,
    /// The caller username, `None` when called with the HTTP key.
    pub username: Option<String>,
    /// Session variables of the caller.
    pub vars: BTreeMap<String, String>,
}

impl RpcContext {
    /// A context for a server-to-server call authenticated with the HTTP key.
    pub fn server() -> Self {
        Self::default()
    }

    /// A context for a user session.
    pub fn user(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            username: Some(username.into()),
            vars: BTreeMap::new(),
        }
    }
}

/// Failure of a server function.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum RpcError {
    /// The payload cannot be decoded.
    #[display("{message}")]
    InvalidPayload {
        /// The decoder message.
        message: String,
    },

    /// No function registered with this ID.
    #[display("RPC function not found")]
    NotFound {
        /// The requested function ID.
        id: String,
    },

    /// The function failed.
    #[display("{message}")]
    Internal {
        /// A description of the failure.
        message: String,
    },
}

impl RpcError {
    /// Builds an [`RpcError::InvalidPayload`] from any decoder error.
    pub fn invalid_payload(error: impl fmt::Display) -> Self {
        Self::InvalidPayload {
            message: error.to_string(),
        }
    }

    /// The gRPC code Nakama reports for this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidPayload { .. } => 3,
            Self::NotFound { .. } => 5,
            Self::Internal { .. } => 13,
        }
    }

    /// The HTTP status Nakama reports for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPayload { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Server functions by ID.
///
/// IDs are case-insensitive, they are stored lowercase.
#[derive(Clone, Default)]
pub struct RpcRegistry {
    handlers: HashMap<String, RpcHandler>,
}

impl RpcRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `id`, replacing any previous one.
    #[must_use]
    pub fn register(mut self, id: &str, handler: RpcHandler) -> Self {
        self.handlers.insert(id.to_lowercase(), handler);
        self
    }

    /// The registered IDs, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = self.handlers.keys().map(String::as_str).collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }

    /// Calls the function `id` with the payload.
    ///
    /// # Errors
    ///
    /// Fails with [`RpcError::NotFound`] for an unknown ID, otherwise
    /// returns the error of the function.
    pub fn call(&self, id: &str, context: &RpcContext, payload: &str) -> Result<String, RpcError> {
        let id = id.to_lowercase();
        let Some(handler) = self.handlers.get(&id) else {
            return Err(RpcError::NotFound { id });
        };
        debug!(%id, user_id = ?context.user_id, "calling server function");
        handler(context, payload)
    }
}

impl fmt::Debug for RpcRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}
