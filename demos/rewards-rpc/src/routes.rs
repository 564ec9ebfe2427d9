use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::errors::ApiError;
use crate::extractors::{RpcCaller, ServerKey, SessionUser};
use crate::rpc::RpcContext;
use crate::sessions::IssuedSession;
use crate::state::AppState;

/// The application router
pub fn app_router() -> Router<AppState> {
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/v2/account", get(get_account))
        .route("/v2/account/authenticate/device", post(authenticate_device))
        .route("/v2/rpc/{id}", get(rpc_get).post(rpc_post))
}

async fn healthcheck(State(state): State<AppState>) -> impl IntoResponse {
    debug!(uptime = ?state.uptime(), "healthcheck");
    Json(json!({}))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthenticateQuery {
    // Absent means create, as Nakama does
    create: Option<bool>,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeviceBody {
    #[serde(default)]
    id: String,
    #[serde(default)]
    vars: HashMap<String, String>,
}

async fn authenticate_device(
    State(state): State<AppState>,
    _server_key: ServerKey,
    Query(query): Query<AuthenticateQuery>,
    body: Bytes,
) -> Result<Json<IssuedSession>, ApiError> {
    let body = serde_json::from_slice::<DeviceBody>(&body)
        .map_err(|error| ApiError::invalid_argument(error.to_string()))?;
    if !(10..=128).contains(&body.id.len()) {
        return Err(ApiError::invalid_argument(
            "Device ID invalid, must be 10-128 bytes.",
        ));
    }

    let create = query.create.unwrap_or(true);
    let session = state
        .sessions
        .authenticate_device(&body.id, create, query.username, body.vars)
        .await?;
    Ok(Json(session))
}

#[derive(Debug, Serialize)]
struct AccountResponse {
    user: UserResponse,
    devices: Vec<DeviceResponse>,
}

#[derive(Debug, Serialize)]
struct UserResponse {
    id: String,
    username: String,
}

#[derive(Debug, Serialize)]
struct DeviceResponse {
    id: String,
}

async fn get_account(
    State(state): State<AppState>,
    SessionUser(caller): SessionUser,
) -> Result<Json<AccountResponse>, ApiError> {
    let user_id = caller.user_id.unwrap_or_default();
    let Some(account) = state.sessions.account(&user_id).await else {
        return Err(ApiError::not_found("Account not found."));
    };

    Ok(Json(AccountResponse {
        user: UserResponse {
            id: account.id,
            username: account.username,
        },
        devices: vec![DeviceResponse {
            id: account.device_id,
        }],
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RpcQuery {
    unwrap: bool,
    payload: Option<String>,
}

#[derive(Debug, Serialize)]
struct RpcResponse {
    id: String,
    payload: String,
}

async fn rpc_get(
    State(state): State<AppState>,
    RpcCaller(caller): RpcCaller,
    Path(id): Path<String>,
    Query(query): Query<RpcQuery>,
) -> Result<Response, ApiError> {
    let payload = query.payload.unwrap_or_default();
    call_rpc(&state, &caller, id, &payload, query.unwrap)
}

async fn rpc_post(
    State(state): State<AppState>,
    RpcCaller(caller): RpcCaller,
    Path(id): Path<String>,
    Query(query): Query<RpcQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let payload = if query.unwrap {
        String::from_utf8(body.to_vec())
            .map_err(|_| ApiError::invalid_argument("Payload must be valid UTF-8"))?
    } else if body.iter().all(u8::is_ascii_whitespace) {
        String::new()
    } else {
        // The wrapped payload is a JSON string
        serde_json::from_slice::<String>(&body).map_err(|error| {
            ApiError::invalid_argument(format!("Unable to decode payload: {error}"))
        })?
    };
    call_rpc(&state, &caller, id, &payload, query.unwrap)
}

fn call_rpc(
    state: &AppState,
    caller: &RpcContext,
    id: String,
    payload: &str,
    unwrap: bool,
) -> Result<Response, ApiError> {
    let result = state.registry.call(&id, caller, payload)?;

    let response = if unwrap {
        ([(header::CONTENT_TYPE, "application/json")], result).into_response()
    } else {
        Json(RpcResponse {
            id: id.to_lowercase(),
            payload: result,
        })
        .into_response()
    };
    Ok(response)
}
