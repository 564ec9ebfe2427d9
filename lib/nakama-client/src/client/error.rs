use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

pub(in crate::client) const BODY_MAX_LENGTH: usize = 1024;

/// Errors that can occur when talking to a Nakama server.
///
/// The first four variants are the dispatch outcomes every endpoint can produce:
/// a missing credential, a transport failure, an API error returned by the server,
/// and a response that cannot be decoded. Adapters propagate them unchanged.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum NakamaError {
    /// The endpoint requires a credential that is not configured.
    ///
    /// Raised before any network I/O happens.
    #[display("Authentication required for '{path}': {reason}")]
    #[from(skip)]
    AuthenticationRequired {
        /// The request path that required the credential.
        path: String,
        /// Which credential was missing.
        reason: &'static str,
    },

    /// Network-level failure from the underlying reqwest client.
    ///
    /// Covers DNS resolution, refused connections and timeouts.
    #[display("Transport error: {_0}")]
    Transport(reqwest::Error),

    /// The server answered with a status outside of the 2xx range.
    #[display("API error (status {status_code}): {body}")]
    #[from(skip)]
    Api {
        /// The HTTP status code returned by the server.
        status_code: u16,
        /// The decoded error payload.
        body: ApiErrorBody,
    },

    /// The response body cannot be decoded into the expected type.
    #[display("Failed to decode response of '{path}': {error}\n{body}")]
    #[from(skip)]
    Decode {
        /// The request path where the error occurred.
        path: String,
        /// The underlying JSON error, with the location of the failing field.
        error: serde_path_to_error::Error<serde_json::Error>,
        /// The response body that failed to parse (possibly truncated).
        body: String,
    },

    /// The call was cancelled before a response arrived.
    #[display("Request to '{path}' was cancelled")]
    #[from(skip)]
    Cancelled {
        /// The request path that was cancelled.
        path: String,
    },

    /// URL parsing error when building the request URL.
    #[display("Invalid URL: {_0}")]
    Url(url::ParseError),

    /// Invalid base path configuration.
    #[display("Invalid base path: {error}")]
    #[from(skip)]
    InvalidBasePath {
        /// Description of why the base path is invalid.
        error: String,
    },

    /// Path template contains unresolved parameters.
    #[display("Path '{path}' is missing required arguments: {missings:?}")]
    #[from(skip)]
    PathUnresolved {
        /// The path template that couldn't be resolved.
        path: String,
        /// List of missing parameter names.
        missings: Vec<String>,
    },

    /// A path identifier is a dot segment, which URL normalization would resolve away.
    #[display("Path '{path}' cannot take '{value}' as argument '{name}'")]
    #[from(skip)]
    InvalidPathSegment {
        /// The path template.
        path: String,
        /// The parameter name.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// Request body serialization failed.
    #[display("Serialization error: {_0}")]
    Serialization(serde_json::Error),

    /// Query string serialization failed.
    #[display("Query serialization error: {_0}")]
    QuerySerialization(serde_urlencoded::ser::Error),

    /// A header value contains invalid characters.
    #[display("Invalid header value: {_0}")]
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// The session token cannot be used as a bearer token.
    #[display("Invalid bearer token: {message}")]
    #[from(skip)]
    InvalidBearerToken {
        /// Description of the invalid characters or format issue.
        message: String,
    },

    /// The session token is not a well-formed JWT.
    #[display("Invalid session token: {message}")]
    #[from(skip)]
    InvalidSessionToken {
        /// Description of the decoding failure.
        message: String,
    },
}

impl NakamaError {
    /// Returns the HTTP status code when the server answered with an error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            Self::Transport(error) => error.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Returns the Nakama error payload when the server answered with an error.
    pub fn api_error(&self) -> Option<&ApiErrorBody> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether the server reported a missing resource.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    pub(crate) fn decode(
        path: &str,
        error: serde_path_to_error::Error<serde_json::Error>,
        body: &[u8],
    ) -> Self {
        Self::Decode {
            path: path.to_string(),
            error,
            body: truncate_body(&String::from_utf8_lossy(body)),
        }
    }
}

pub(in crate::client) fn truncate_body(text: &str) -> String {
    if text.len() <= BODY_MAX_LENGTH {
        return text.to_string();
    }
    let mut end = BODY_MAX_LENGTH;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let head = text.get(..end).unwrap_or_default();
    format!("{head}... (truncated)")
}

/// Error payload returned by Nakama for non-2xx responses.
///
/// Nakama relies on the gRPC gateway, so errors look like
/// `{"code": 5, "message": "Group not found.", "details": []}`.
/// When the body is not valid JSON, the raw text is kept in [`raw`](Self::raw).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// gRPC status code.
    #[serde(default)]
    pub code: i32,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Legacy error field, usually a copy of the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional error details.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<serde_json::Value>,
    /// Raw body when it could not be parsed as JSON.
    #[serde(skip)]
    pub raw: Option<String>,
}

impl ApiErrorBody {
    /// Parses an error body, falling back on the raw text.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Self>(bytes) {
            Ok(body) => body,
            Err(_) => Self {
                raw: Some(truncate_body(&String::from_utf8_lossy(bytes))),
                ..Self::default()
            },
        }
    }

    /// The typed gRPC status code.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from(self.code)
    }
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(raw) = &self.raw {
            return write!(f, "{raw}");
        }
        let message = if self.message.is_empty() {
            self.error.as_deref().unwrap_or_default()
        } else {
            &self.message
        };
        write!(f, "{message} ({})", self.error_code())
    }
}

/// gRPC status codes used by Nakama in error payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ErrorCode {
    /// Not an error.
    Ok,
    /// The operation was cancelled.
    Cancelled,
    /// Unknown error.
    Unknown,
    /// The client specified an invalid argument.
    InvalidArgument,
    /// The deadline expired before the operation could complete.
    DeadlineExceeded,
    /// Some requested entity was not found.
    NotFound,
    /// The entity that a client attempted to create already exists.
    AlreadyExists,
    /// The caller does not have permission to execute the operation.
    PermissionDenied,
    /// Some resource has been exhausted.
    ResourceExhausted,
    /// The system is not in a state required for the operation.
    FailedPrecondition,
    /// The operation was aborted.
    Aborted,
    /// The operation was attempted past the valid range.
    OutOfRange,
    /// The operation is not implemented or enabled.
    Unimplemented,
    /// Internal server error.
    Internal,
    /// The service is currently unavailable.
    Unavailable,
    /// Unrecoverable data loss or corruption.
    DataLoss,
    /// The request does not have valid authentication credentials.
    Unauthenticated,
    /// A code outside of the gRPC range.
    #[display("Unrecognized({_0})")]
    Unrecognized(i32),
}

impl From<i32> for ErrorCode {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::Ok,
            1 => Self::Cancelled,
            2 => Self::Unknown,
            3 => Self::InvalidArgument,
            4 => Self::DeadlineExceeded,
            5 => Self::NotFound,
            6 => Self::AlreadyExists,
            7 => Self::PermissionDenied,
            8 => Self::ResourceExhausted,
            9 => Self::FailedPrecondition,
            10 => Self::Aborted,
            11 => Self::OutOfRange,
            12 => Self::Unimplemented,
            13 => Self::Internal,
            14 => Self::Unavailable,
            15 => Self::DataLoss,
            16 => Self::Unauthenticated,
            other => Self::Unrecognized(other),
        }
    }
}
