//! Backend invoker: executes a core-built `HttpRequest` with reqwest.
//!
//! One attempt per request, transport-default timeouts. Any status is
//! returned as data; `BridgeClient::parse_posts` decides what is an error.

use bridge_core::{BridgeError, HttpRequest, HttpResponse};
use reqwest::Client;
use tracing::debug;

pub async fn execute(client: &Client, request: HttpRequest) -> Result<HttpResponse, BridgeError> {
    let mut builder = client.get(&request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let response = builder
        .send()
        .await
        .map_err(|e| BridgeError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response
        .text()
        .await
        .map_err(|e| BridgeError::Transport(format!("failed to read backend body: {e}")))?;
    debug!(status, bytes = body.len(), "Backend answered");

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
