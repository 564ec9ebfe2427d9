use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::rpc::RpcError;

/// An error answered the way Nakama does.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
#[display("{message} ({code})")]
pub struct ApiError {
    status: StatusCode,
    code: i32,
    message: String,
}

/// The JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// The gRPC status code.
    pub code: i32,
    /// Human-readable error message.
    pub message: String,
    /// Legacy copy of the message.
    pub error: String,
}

impl ApiError {
    fn new(status: StatusCode, code: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, 3, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, 5, message)
    }

    pub(crate) fn already_exists(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, 6, message)
    }

    pub(crate) fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, 16, message)
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, 13, message)
    }
}

impl From<RpcError> for ApiError {
    fn from(error: RpcError) -> Self {
        Self::new(error.status_code(), error.code(), error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let Self {
            status,
            code,
            message,
        } = self;
        warn!(%status, code, %message, "request failed");

        let body = ApiErrorResponse {
            code,
            error: message.clone(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
