//! Per-request values flowing through the bridge.
//!
//! # Design
//! Inbound values (`IncomingQuery`, `AuthToken`, `OutboundRequest`) are built
//! by the translator. Backend DTOs (`BackendItem` and friends) deserialize
//! leniently: every field is optional and unknown fields are ignored, because
//! the backend only returns what the `fields` selector asked for.
//!
//! Renamed fields are `Option<Value>` so they pass through untouched. `None`
//! means the backend omitted the key and the bridge omits it too; an explicit
//! `null` survives as `Some(Value::Null)`.

use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::{form_urlencoded, Url};

/// The parts of an inbound bridge URL the translator looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingQuery {
    pub path: String,
    pub login: Option<String>,
    pub api_key: Option<String>,
    pub tags: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

impl IncomingQuery {
    /// Split a path and raw query string. When a parameter repeats, the first
    /// occurrence wins.
    pub fn from_parts(path: &str, query: Option<&str>) -> Self {
        let mut incoming = IncomingQuery {
            path: path.to_string(),
            ..Default::default()
        };
        let Some(query) = query else {
            return incoming;
        };
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match &*key {
                "login" => &mut incoming.login,
                "api_key" => &mut incoming.api_key,
                "tags" => &mut incoming.tags,
                "limit" => &mut incoming.limit,
                "page" => &mut incoming.page,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        incoming
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_parts(url.path(), url.query())
    }
}

/// Value of the `Authorization` header sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// `Token base64(login:api_key)`, or `None` unless both credentials are
    /// present and non-empty.
    pub fn from_credentials(login: Option<&str>, api_key: Option<&str>) -> Option<Self> {
        match (login, api_key) {
            (Some(login), Some(key)) if !login.is_empty() && !key.is_empty() => {
                Some(AuthToken(format!("Token {}", B64.encode(format!("{login}:{key}")))))
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether the caller asked for one post or a page of posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Single,
    List,
}

/// Result of translating an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub kind: QueryKind,
    pub url: Url,
    pub token: Option<AuthToken>,
}

// ---------------------------------------------------------------------------
// Backend DTOs
// ---------------------------------------------------------------------------

/// Deserialize a present key as `Some`, even when its value is `null`.
/// Combined with `#[serde(default)]`, an absent key stays `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// One post as returned by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendItem {
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub creation_time: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub last_edit_time: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub score: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub source: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub safety: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub canvas_width: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub canvas_height: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub checksum: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub mime_type: Option<Value>,
    #[serde(default)]
    pub user: Option<BackendUser>,
    #[serde(default)]
    pub tags: Option<Vec<BackendTag>>,
    #[serde(default)]
    pub relations: Option<Vec<BackendRelation>>,
    #[serde(default)]
    pub content_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendUser {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendTag {
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendRelation {
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,
}

// ---------------------------------------------------------------------------
// Bridge DTOs
// ---------------------------------------------------------------------------

/// One post in the shape bridge callers expect. Field order is the
/// serialization order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BridgeItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_ext: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub tag_string: String,
    pub has_children: bool,
    pub children_ids: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_file_url: Option<String>,
}

/// What the bridge sends back: an array for list queries, a bare object for
/// single-post lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BridgePayload {
    List(Vec<BridgeItem>),
    Single(BridgeItem),
}

impl BridgePayload {
    /// Number of posts carried.
    pub fn len(&self) -> usize {
        match self {
            BridgePayload::List(items) => items.len(),
            BridgePayload::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
