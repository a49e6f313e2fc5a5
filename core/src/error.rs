//! Error taxonomy for the bridge.
//!
//! # Design
//! Each failure is a tagged variant; the HTTP status and response text are
//! derived by pattern matching in `status_code` and `response_body`. Only
//! `BadRequest` maps to a 4xx. `Backend` keeps the upstream status and raw
//! body so the caller can see what the backend said. Everything else is a
//! "miscellaneous" 500.

use std::fmt;

/// Errors produced while translating, forwarding or remapping a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The inbound request cannot be translated (bad path, bad paging).
    BadRequest(String),

    /// The backend answered with a status other than 200.
    Backend { status: u16, body: String },

    /// The backend answered 200 but the JSON does not have the expected shape.
    MalformedResponse(String),

    /// The backend body is not valid JSON.
    Deserialization(String),

    /// The backend could not be reached or its body could not be read.
    Transport(String),
}

impl BridgeError {
    /// HTTP status the bridge answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            BridgeError::BadRequest(_) => 400,
            _ => 500,
        }
    }

    /// Plain-text body the bridge answers with for this error.
    pub fn response_body(&self) -> String {
        match self {
            BridgeError::BadRequest(msg) => msg.clone(),
            BridgeError::Backend { body, .. } => {
                format!("Server returned an error: \nBEGIN ERROR\n{body}\nEND ERROR")
            }
            other => format!("Server encountered a miscellaneous error: {other}"),
        }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::BadRequest(msg) => write!(f, "bad request: {msg}"),
            BridgeError::Backend { status, .. } => {
                write!(f, "backend returned HTTP {status}")
            }
            BridgeError::MalformedResponse(msg) => {
                write!(f, "malformed backend response: {msg}")
            }
            BridgeError::Deserialization(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            BridgeError::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

impl std::error::Error for BridgeError {}
