//! Extractors for the three ways a Nakama request authenticates.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use headers::authorization::{Basic, Bearer};
use headers::{Authorization, HeaderMapExt};
use serde::Deserialize;

use crate::errors::ApiError;
use crate::rpc::RpcContext;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CredentialQuery {
    token: Option<String>,
    http_key: Option<String>,
}

impl CredentialQuery {
    fn from_parts(parts: &Parts) -> Self {
        Query::<Self>::try_from_uri(&parts.uri)
            .map(|Query(query)| query)
            .unwrap_or_default()
    }
}

/// The request carries the server key as Basic authentication.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ServerKey;

impl FromRequestParts<AppState> for ServerKey {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(Authorization(basic)) = parts.headers.typed_get::<Authorization<Basic>>() else {
            return Err(ApiError::unauthenticated("Server key required"));
        };
        if basic.username() != state.config.server_key {
            return Err(ApiError::unauthenticated("Server key invalid"));
        }
        Ok(Self)
    }
}

/// The caller of a session-only endpoint.
#[derive(Debug, Clone)]
pub(crate) struct SessionUser(pub(crate) RpcContext);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts) else {
            return Err(ApiError::unauthenticated("Auth token required"));
        };
        match state.sessions.resolve(&token).await {
            Some(context) => Ok(Self(context)),
            None => Err(ApiError::unauthenticated("Auth token invalid")),
        }
    }
}

/// The caller of a server function, a session user or the HTTP key holder.
#[derive(Debug, Clone)]
pub(crate) struct RpcCaller(pub(crate) RpcContext);

impl FromRequestParts<AppState> for RpcCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(http_key) = CredentialQuery::from_parts(parts).http_key {
            if http_key != state.config.http_key {
                return Err(ApiError::unauthenticated("HTTP key invalid"));
            }
            return Ok(Self(RpcContext::server()));
        }

        SessionUser::from_request_parts(parts, state)
            .await
            .map(|SessionUser(context)| Self(context))
    }
}

// The bearer header wins over the `token` query parameter
fn session_token(parts: &Parts) -> Option<String> {
    if let Some(Authorization(bearer)) = parts.headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_string());
    }
    CredentialQuery::from_parts(parts).token
}
