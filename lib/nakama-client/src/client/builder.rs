use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use http::uri::{PathAndQuery, Scheme};
use url::Url;

use super::auth::Credentials;
use super::{NakamaClient, NakamaError, SecureString, TokenPlacement};

/// Default Nakama HTTP port.
pub const DEFAULT_PORT: u16 = 7350;

/// Default server key of a fresh Nakama installation.
pub const DEFAULT_SERVER_KEY: &str = "defaultkey";

const DEFAULT_USER_AGENT: &str = concat!("nakama-client/", env!("CARGO_PKG_VERSION"));

/// Builder for creating [`NakamaClient`] instances.
///
/// # Default Configuration
///
/// - **Scheme**: HTTP (use `with_scheme()` to change to HTTPS)
/// - **Host**: 127.0.0.1 (localhost)
/// - **Port**: 7350 (Nakama HTTP port)
/// - **Base path**: None (requests go to root path)
/// - **Server key**: `defaultkey`
/// - **HTTP key**: None
/// - **Session token placement**: `Authorization` header
/// - **Timeout**: None
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
///
/// use http::uri::Scheme;
/// use nakama_client::NakamaClient;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = NakamaClient::builder()
///     .with_scheme(Scheme::HTTPS)
///     .with_host("nakama.example.com")
///     .with_port(443)
///     .with_server_key("my-server-key")
///     .with_timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NakamaClientBuilder {
    client: Option<reqwest::Client>,
    scheme: Scheme,
    host: String,
    port: u16,
    base_path: Option<PathAndQuery>,
    server_key: SecureString,
    http_key: Option<SecureString>,
    token_placement: TokenPlacement,
    timeout: Option<Duration>,
    user_agent: String,
}

impl NakamaClientBuilder {
    /// Builds the final [`NakamaClient`].
    ///
    /// # Errors
    ///
    /// This method can fail if:
    /// - The base URL cannot be built from the scheme, host, port and base path
    /// - The underlying reqwest client cannot be created
    pub fn build(self) -> Result<NakamaClient, NakamaError> {
        let Self {
            client,
            scheme,
            host,
            port,
            base_path,
            server_key,
            http_key,
            token_placement,
            timeout,
            user_agent,
        } = self;

        let base_path = base_path
            .as_ref()
            .map(|it| it.path().trim_end_matches('/'))
            .unwrap_or_default();
        let base_url = Url::parse(&format!("{scheme}://{host}:{port}{base_path}/"))?;

        let client = match client {
            Some(client) => client,
            None => reqwest::Client::builder().user_agent(user_agent).build()?,
        };

        let credentials = Credentials {
            server_key,
            http_key,
            session: None,
            token_placement,
        };

        Ok(NakamaClient {
            client,
            base_url: Arc::new(base_url),
            credentials: Arc::new(credentials),
            timeout,
        })
    }

    /// Sets the HTTP scheme.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the hostname or IP address of the Nakama server.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port of the Nakama server.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the base path for all requests, when Nakama sits behind a reverse proxy.
    ///
    /// ```rust
    /// use nakama_client::NakamaClient;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = NakamaClient::builder()
    ///     .with_host("games.example.com")
    ///     .with_base_path("/nakama")?
    ///     .build()?;
    ///
    /// assert_eq!(client.base_url().as_str(), "http://games.example.com:7350/nakama/");
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`NakamaError::InvalidBasePath`] if the path contains invalid characters
    /// (such as spaces) or cannot be parsed as a valid URI path.
    pub fn with_base_path<P>(mut self, base_path: P) -> Result<Self, NakamaError>
    where
        P: TryInto<PathAndQuery>,
        P::Error: Debug + 'static,
    {
        let base_path = base_path
            .try_into()
            .map_err(|err| NakamaError::InvalidBasePath {
                error: format!("{err:?}"),
            })?;
        self.base_path = Some(base_path);
        Ok(self)
    }

    /// Sets scheme, host, port and base path from a URL.
    ///
    /// The port defaults to the scheme's well-known port when the URL has none.
    ///
    /// # Errors
    ///
    /// Returns [`NakamaError::Url`] if the URL cannot be parsed, or
    /// [`NakamaError::InvalidBasePath`] if it has no host or an unsupported scheme.
    pub fn with_url(self, url: &str) -> Result<Self, NakamaError> {
        let url = Url::parse(url)?;
        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => {
                return Err(NakamaError::InvalidBasePath {
                    error: format!("unsupported scheme '{other}'"),
                });
            }
        };
        let Some(host) = url.host_str() else {
            return Err(NakamaError::InvalidBasePath {
                error: format!("missing host in '{url}'"),
            });
        };
        let port = url.port_or_known_default().unwrap_or(DEFAULT_PORT);

        self.with_scheme(scheme)
            .with_host(host)
            .with_port(port)
            .with_base_path(url.path().to_string())
    }

    /// Sets the server key used to authenticate and refresh sessions.
    pub fn with_server_key(mut self, server_key: impl Into<SecureString>) -> Self {
        self.server_key = server_key.into();
        self
    }

    /// Sets the runtime HTTP key, used to call RPC functions without a session.
    pub fn with_http_key(mut self, http_key: impl Into<SecureString>) -> Self {
        self.http_key = Some(http_key.into());
        self
    }

    /// Chooses where the session token is sent.
    ///
    /// ```rust
    /// use nakama_client::{NakamaClient, TokenPlacement};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = NakamaClient::builder()
    ///     .with_token_placement(TokenPlacement::query())
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_token_placement(mut self, token_placement: TokenPlacement) -> Self {
        self.token_placement = token_placement;
        self
    }

    /// Sets the default timeout applied to every request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the `User-Agent` header.
    ///
    /// Ignored when a custom reqwest client is provided.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Uses a preconfigured reqwest client, e.g. to share its connection pool
    /// or to enable a TLS backend.
    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }
}

impl Default for NakamaClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            scheme: Scheme::HTTP,
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            base_path: None,
            server_key: SecureString::from(DEFAULT_SERVER_KEY),
            http_key: None,
            token_placement: TokenPlacement::default(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
