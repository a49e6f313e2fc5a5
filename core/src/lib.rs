//! Request translation and response remapping for the booru bridge.
//!
//! # Overview
//! The bridge accepts Danbooru-style post queries and answers them from a
//! Szurubooru-style backend. This crate holds the whole transformation: it
//! turns an inbound URL into an outbound `HttpRequest` and turns the backend's
//! `HttpResponse` into Danbooru-shaped posts. It never touches the network
//! (host-does-IO pattern); the server crate executes the round-trip.
//!
//! # Design
//! - `BridgeClient` is stateless apart from its immutable `BridgeConfig`.
//! - `translate` and `remap` are free functions so they can be tested without
//!   a client; `BridgeClient` wires them to the configured backend.
//! - Backend DTOs are defined independently from the mock-backend crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod remap;
pub mod translate;
pub mod types;

pub use client::BridgeClient;
pub use config::{BridgeConfig, ConfigError};
pub use error::BridgeError;
pub use http::{HttpRequest, HttpResponse};
pub use types::{
    AuthToken, BackendItem, BridgeItem, BridgePayload, IncomingQuery, OutboundRequest, QueryKind,
};
