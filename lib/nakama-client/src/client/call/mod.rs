use std::time::Duration;

use http::Method;
use tokio_util::sync::CancellationToken;

use super::{Auth, CallBody, CallQuery};

mod builder;
mod execution;

/// One request handed to the dispatcher.
///
/// `ApiRequest` is the endpoint descriptor: an HTTP method, a server-relative
/// path (identifiers already escaped, see [`CallPath`](super::CallPath)), the
/// credential the endpoint requires, the query parameters and an optional body.
///
/// Endpoint adapters build it through [`Endpoint::to_request`](crate::Endpoint::to_request);
/// it can also be built by hand to reach an operation this crate does not cover.
///
/// # Example
///
/// ```rust,no_run
/// use nakama_client::{ApiRequest, Auth, CallQuery, NakamaClient};
///
/// # async fn example(client: NakamaClient) -> Result<(), nakama_client::NakamaError> {
/// let request = ApiRequest::get("/v2/friend", Auth::Session)
///     .with_query(CallQuery::new().add_param("limit", 10));
///
/// let friends: serde_json::Value = client.dispatch(request).await?.json()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(in crate::client) method: Method,
    pub(in crate::client) path: String,
    pub(in crate::client) auth: Auth,
    pub(in crate::client) query: CallQuery,
    pub(in crate::client) body: Option<CallBody>,
    pub(in crate::client) timeout: Option<Duration>,
    pub(in crate::client) cancellation: Option<CancellationToken>,
}

/// Per-call options applied on top of an endpoint request.
///
/// ```rust,no_run
/// use std::time::Duration;
///
/// use nakama_client::api::GetAccount;
/// use nakama_client::{CallOptions, CancellationToken, NakamaClient};
///
/// # async fn example(client: NakamaClient) -> Result<(), nakama_client::NakamaError> {
/// let token = CancellationToken::new();
/// let options = CallOptions::new()
///     .with_timeout(Duration::from_secs(2))
///     .with_cancellation(token.clone());
///
/// let account = client.send_with(GetAccount::new(), options).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub(in crate::client) timeout: Option<Duration>,
    pub(in crate::client) cancellation: Option<CancellationToken>,
}

impl CallOptions {
    /// Options with no timeout and no cancellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aborts the call when it takes longer than `timeout`.
    ///
    /// An elapsed timeout is reported as [`NakamaError::Transport`](crate::NakamaError::Transport).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Aborts the call as soon as the token is cancelled.
    ///
    /// A cancelled call is reported as [`NakamaError::Cancelled`](crate::NakamaError::Cancelled).
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub(in crate::client) fn apply(self, request: ApiRequest) -> ApiRequest {
        let Self {
            timeout,
            cancellation,
        } = self;
        let request = match timeout {
            Some(timeout) => request.with_timeout(timeout),
            None => request,
        };
        match cancellation {
            Some(token) => request.with_cancellation(token),
            None => request,
        }
    }
}
