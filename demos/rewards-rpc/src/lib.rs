//! A tiny Nakama-like server hosting the `rewards` server function.
//!
//! It answers just enough of the Nakama REST API for a client to
//! authenticate a device, read its account and call server functions.
use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

mod errors;
mod extractors;
mod routes;
mod sessions;
mod state;

pub mod rpc;

pub use self::errors::ApiErrorResponse;
pub use self::state::{AppState, ServerConfig};

use self::routes::app_router;

/// Launch the server
///
/// # Errors
///
/// fail if the socket cannot be created (e.g. port already used)
/// fail if the server cannot be launch
pub async fn run(addr: SocketAddr, config: ServerConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("opening {addr}"))?;
    info!("Using address {addr}");

    launch(listener, config).await
}

/// Launch the server
///
/// # Errors
///
/// fail if the server cannot be launch
pub async fn launch(listener: tokio::net::TcpListener, config: ServerConfig) -> anyhow::Result<()> {
    let app = app(AppState::new(config));

    axum::serve(listener, app.into_make_service())
        .await
        .context("starting server")?;

    Ok(())
}

/// The application with its state
pub fn app(state: AppState) -> Router {
    app_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
