//! HTTP front of the booru bridge.
//!
//! # Overview
//! Every inbound request runs the same pipeline: translate the URL with
//! `bridge_core`, call the backend with reqwest, remap the backend's posts
//! and answer with JSON. Failures are answered as plain text by
//! `ErrorResponse`.
//!
//! # Design
//! - The router has a single fallback handler, so paths outside `/posts`
//!   still reach the translator and get its 400.
//! - Shared state is immutable: the `BridgeClient` and a pooled
//!   `reqwest::Client`. The request counter only feeds the log span.

pub mod backend;
pub mod error;

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Response},
    Json, Router,
};
use bridge_core::{BridgeClient, BridgeConfig, BridgeError, BridgePayload, IncomingQuery};
use tokio::net::TcpListener;
use tracing::{error, info, info_span, Instrument};

use crate::error::ErrorResponse;

static REQ_COUNT: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> u64 {
    REQ_COUNT.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone)]
struct AppState {
    client: Arc<BridgeClient>,
    http: reqwest::Client,
}

/// Build the bridge router for `config`.
pub fn app(config: BridgeConfig) -> anyhow::Result<Router> {
    let http = reqwest::Client::builder().build()?;
    let state = AppState {
        client: Arc::new(BridgeClient::new(config)),
        http,
    };
    Ok(Router::new().fallback(handle).with_state(state))
}

/// Serve the bridge on `listener` until `shutdown` resolves.
pub async fn run(
    listener: TcpListener,
    config: BridgeConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let backend = config.server_url.clone();
    let app = app(config)?;

    info!("Listening on {addr}, forwarding to {backend}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Bridge shut down");
    Ok(())
}

async fn handle(State(state): State<AppState>, uri: Uri) -> Response {
    let id = next_request_id();
    async move {
        info!("Received request");
        let response = match forward(&state, &uri).await {
            Ok(payload) => {
                info!("Sending back response of {} posts...", payload.len());
                Json(payload).into_response()
            }
            Err(err) => {
                error!("[ERROR] {err}");
                ErrorResponse(err).into_response()
            }
        };
        info!("Done.");
        response
    }
    .instrument(info_span!("request", id))
    .await
}

async fn forward(state: &AppState, uri: &Uri) -> Result<BridgePayload, BridgeError> {
    info!("Transforming client request...");
    let incoming = IncomingQuery::from_parts(uri.path(), uri.query());
    let outbound = state.client.translate(&incoming)?;
    let request = state.client.build_backend_request(&outbound);

    info!("Calling server with URL \"{}\"", request.url);
    let response = backend::execute(&state.http, request).await?;

    info!("Processing server response...");
    state.client.parse_posts(outbound.kind, response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_increase() {
        let first = next_request_id();
        let second = next_request_id();
        assert!(second > first);
    }
}
