use std::sync::Arc;
use std::time::Duration;

use url::Url;

mod builder;
pub use self::builder::{DEFAULT_PORT, DEFAULT_SERVER_KEY, NakamaClientBuilder};

mod call;
pub use self::call::{ApiRequest, CallOptions};

mod parameters;
pub use self::parameters::{CallBody, CallPath, CallQuery};

mod response;
pub use self::response::ApiResponse;

mod auth;
use self::auth::Credentials;
pub use self::auth::{Auth, SecureString, TokenPlacement};

mod endpoint;
pub use self::endpoint::Endpoint;

mod session;
pub use self::session::{Session, SessionClaims};

mod error;
pub use self::error::{ApiErrorBody, ErrorCode, NakamaError};

/// HTTP client for the Nakama REST API.
///
/// `NakamaClient` is a cheap handle: cloning it shares the connection pool and
/// the configuration. Binding a session with [`with_session`](Self::with_session)
/// returns a new handle and leaves the original untouched.
///
/// Use [`NakamaClientBuilder`] to create instances.
///
/// # Example
///
/// ```rust,no_run
/// use nakama_client::NakamaClient;
/// use nakama_client::api::{AccountDevice, Authenticate, GetAccount};
///
/// # async fn example() -> Result<(), nakama_client::NakamaError> {
/// let client = NakamaClient::builder().build()?;
///
/// let session = client
///     .send(Authenticate::new(AccountDevice::new("device-id")).with_create(true))
///     .await?;
/// let client = client.with_session(&session);
///
/// let account = client.send(GetAccount::new()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NakamaClient {
    client: reqwest::Client,
    base_url: Arc<Url>,
    credentials: Arc<Credentials>,
    timeout: Option<Duration>,
}

// Create
impl NakamaClient {
    /// Creates a builder with the default configuration.
    pub fn builder() -> NakamaClientBuilder {
        NakamaClientBuilder::default()
    }

    /// The base URL every request path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

// Session
impl NakamaClient {
    /// Returns a handle bound to the session token.
    #[must_use]
    pub fn with_session(&self, session: &Session) -> Self {
        self.with_session_token(session.token.clone())
    }

    /// Returns a handle bound to a raw session token.
    #[must_use]
    pub fn with_session_token(&self, token: impl Into<SecureString>) -> Self {
        let credentials = Credentials {
            session: Some(token.into()),
            ..Credentials::clone(&self.credentials)
        };
        Self {
            credentials: Arc::new(credentials),
            ..self.clone()
        }
    }

    /// Returns a handle without session.
    #[must_use]
    pub fn without_session(&self) -> Self {
        let credentials = Credentials {
            session: None,
            ..Credentials::clone(&self.credentials)
        };
        Self {
            credentials: Arc::new(credentials),
            ..self.clone()
        }
    }

    /// Whether a session token is bound to this handle.
    pub fn has_session(&self) -> bool {
        self.credentials
            .session
            .as_ref()
            .is_some_and(|token| !token.is_empty())
    }
}

// Send
impl NakamaClient {
    /// Sends an endpoint request and decodes its response.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`to_request`](Endpoint::to_request),
    /// [`dispatch`](Self::dispatch) and [`decode`](Endpoint::decode) unchanged.
    pub async fn send<E>(&self, endpoint: E) -> Result<E::Output, NakamaError>
    where
        E: Endpoint,
    {
        self.send_with(endpoint, CallOptions::default()).await
    }

    /// Sends an endpoint request with per-call options.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send), plus [`NakamaError::Cancelled`] when the
    /// cancellation token fires first.
    pub async fn send_with<E>(
        &self,
        endpoint: E,
        options: CallOptions,
    ) -> Result<E::Output, NakamaError>
    where
        E: Endpoint,
    {
        let request = options.apply(endpoint.to_request()?);
        let response = self.dispatch(request).await?;
        endpoint.decode(response)
    }
}
