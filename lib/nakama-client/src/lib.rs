//! # Nakama client
//!
//! A typed REST client for the [Nakama](https://heroiclabs.com/nakama/) game server.
//!
//! Every REST operation is a plain struct in [`api`] implementing [`Endpoint`].
//! All of them go through one dispatcher, [`NakamaClient::dispatch`], which
//! performs a single HTTP round trip: it resolves the credential the operation
//! needs, builds the URL, sends the request, and maps the outcome to
//! [`NakamaError`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nakama_client::NakamaClient;
//! use nakama_client::api::{AccountDevice, Authenticate, GetAccount, Rpc};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = NakamaClient::builder()
//!     .with_host("127.0.0.1")
//!     .with_port(7350)
//!     .with_server_key("defaultkey")
//!     .build()?;
//!
//! // Authenticate with the server key, then bind the session
//! let session = client
//!     .send(Authenticate::new(AccountDevice::new("a-device-id")).with_create(true))
//!     .await?;
//! let client = client.with_session(&session);
//!
//! let account = client.send(GetAccount::new()).await?;
//! println!("Hello {}", account.user.username);
//!
//! // Call a server function
//! let result = client
//!     .send(Rpc::new("rewards").with_payload(r#"{"rewards":5}"#))
//!     .await?;
//! println!("{}", result.payload);
//! # Ok(())
//! # }
//! ```
//!
//! ## Optional fields
//!
//! Optional fields are recorded with `with_*` setters and only sent when set.
//! A field set to its zero value is still sent:
//!
//! ```rust
//! use nakama_client::Endpoint;
//! use nakama_client::api::ListChannelMessages;
//!
//! let request = ListChannelMessages::new("2...general")
//!     .with_limit(0)
//!     .with_forward(false)
//!     .to_request()?;
//!
//! assert_eq!(request.query().to_query_string()?, "limit=0&forward=false");
//! # Ok::<(), nakama_client::NakamaError>(())
//! ```
//!
//! ## Errors
//!
//! | Variant | When |
//! |---|---|
//! | [`NakamaError::AuthenticationRequired`] | the credential is missing, before any network I/O |
//! | [`NakamaError::Transport`] | DNS, connection or timeout failure |
//! | [`NakamaError::Api`] | non-2xx status, with the decoded Nakama error payload |
//! | [`NakamaError::Decode`] | the body does not match the expected type |
//! | [`NakamaError::Cancelled`] | the cancellation token fired first |
//!
//! ## Session token placement
//!
//! The session token goes in the `Authorization: Bearer` header by default;
//! [`TokenPlacement::query`] sends it as the `token` query parameter instead.

pub mod api;

mod client;

pub use self::client::{
    ApiErrorBody, ApiRequest, ApiResponse, Auth, CallBody, CallOptions, CallPath, CallQuery,
    DEFAULT_PORT, DEFAULT_SERVER_KEY, Endpoint, ErrorCode, NakamaClient, NakamaClientBuilder,
    NakamaError, SecureString, Session, SessionClaims, TokenPlacement,
};
pub use tokio_util::sync::CancellationToken;
