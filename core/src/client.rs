//! Stateless bridge client: builds backend requests, parses backend responses.
//!
//! # Design
//! `BridgeClient` holds only its `BridgeConfig`. Each request goes through
//! `translate` -> `build_backend_request` -> (host executes) ->
//! `parse_posts`. The caller owns the HTTP round-trip between the two halves.

use serde_json::Value;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::http::{HttpRequest, HttpResponse};
use crate::remap::{remap_list, remap_single};
use crate::translate::translate;
use crate::types::{BridgePayload, IncomingQuery, OutboundRequest, QueryKind};

#[derive(Debug, Clone)]
pub struct BridgeClient {
    config: BridgeConfig,
}

impl BridgeClient {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn translate(&self, query: &IncomingQuery) -> Result<OutboundRequest, BridgeError> {
        translate(query, &self.config)
    }

    /// Render an `OutboundRequest` with the fixed backend header set.
    ///
    /// `Authorization` is only present when the caller supplied credentials.
    pub fn build_backend_request(&self, outbound: &OutboundRequest) -> HttpRequest {
        let url = outbound.url.to_string();
        let mut headers: Vec<(String, String)> = [
            ("Accept", "application/json"),
            ("Content-Type", "application/json"),
            ("Accept-Encoding", "utf8"),
            ("Accept-Language", "en-US,en;q=0.5"),
            ("Connection", "keep-alive"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        headers.push(("Host".to_string(), self.config.backend_host()));
        headers.push(("Referer".to_string(), url.clone()));
        headers.push(("User-Agent".to_string(), self.config.user_agent.clone()));
        if let Some(token) = &outbound.token {
            headers.push(("Authorization".to_string(), token.as_str().to_string()));
        }
        HttpRequest { url, headers }
    }

    /// Check the status and parse the body as JSON, without looking at its shape.
    pub fn parse_backend_response(&self, response: HttpResponse) -> Result<Value, BridgeError> {
        if response.status != 200 {
            return Err(BridgeError::Backend {
                status: response.status,
                body: response.body,
            });
        }
        serde_json::from_str(&response.body)
            .map_err(|e| BridgeError::Deserialization(e.to_string()))
    }

    pub fn parse_posts(
        &self,
        kind: QueryKind,
        response: HttpResponse,
    ) -> Result<BridgePayload, BridgeError> {
        let value = self.parse_backend_response(response)?;
        match kind {
            QueryKind::List => remap_list(value, &self.config.server_url).map(BridgePayload::List),
            QueryKind::Single => {
                remap_single(value, &self.config.server_url).map(BridgePayload::Single)
            }
        }
    }
}
