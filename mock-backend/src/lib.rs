//! In-memory Szurubooru-shaped backend for tests and local runs.
//!
//! Serves `GET /api/posts` (search with `query`/`limit`/`offset`/`fields`)
//! and `GET /api/posts/{id}`. Errors use the backend's JSON error envelope.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct Backend {
    posts: Arc<Vec<Value>>,
    /// When set, every request must carry exactly this `Authorization` value.
    required_auth: Option<Arc<str>>,
}

impl Backend {
    pub fn new(posts: Vec<Value>) -> Self {
        Self {
            posts: Arc::new(posts),
            required_auth: None,
        }
    }

    pub fn require_auth(mut self, authorization: &str) -> Self {
        self.required_auth = Some(Arc::from(authorization));
        self
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::new(sample_posts())
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub query: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub fields: Option<String>,
}

/// Three posts: a safe parent with two children of other ratings.
pub fn sample_posts() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "version": 3,
            "creationTime": "2023-04-01T10:00:00.000000Z",
            "lastEditTime": "2023-04-02T11:30:00.000000Z",
            "safety": "safe",
            "source": "https://example.org/art/1",
            "type": "image",
            "mimeType": "image/png",
            "checksum": "0f1e2d3c4b5a",
            "canvasWidth": 1024,
            "canvasHeight": 768,
            "contentUrl": "data/posts/1_0f1e2d3c.png",
            "thumbnailUrl": "data/generated-thumbnails/1_0f1e2d3c.jpg",
            "tags": [
                {"names": ["cat", "neko"], "category": "default", "usages": 2},
                {"names": ["outdoors"], "category": "default", "usages": 1}
            ],
            "relations": [{"id": 2}, {"id": 3}],
            "user": {"name": "alice", "avatarUrl": "data/avatars/alice.png"},
            "score": 5
        }),
        json!({
            "id": 2,
            "version": 1,
            "creationTime": "2023-04-03T09:00:00.000000Z",
            "lastEditTime": null,
            "safety": "sketchy",
            "source": null,
            "type": "image",
            "mimeType": "image/jpeg",
            "checksum": "a1b2c3d4e5f6",
            "canvasWidth": 640,
            "canvasHeight": 480,
            "contentUrl": "data/posts/2_a1b2c3d4.jpg",
            "thumbnailUrl": "data/generated-thumbnails/2_a1b2c3d4.jpg",
            "tags": [{"names": ["cat"], "category": "default", "usages": 2}],
            "relations": [{"id": 1}],
            "user": {"name": "bob", "avatarUrl": null},
            "score": 0
        }),
        json!({
            "id": 3,
            "version": 1,
            "creationTime": "2023-04-04T08:00:00.000000Z",
            "lastEditTime": null,
            "safety": "unsafe",
            "source": "",
            "type": "image",
            "mimeType": "image/gif",
            "checksum": "ffeeddccbbaa",
            "canvasWidth": 320,
            "canvasHeight": 240,
            "contentUrl": "data/posts/3_ffeeddcc.gif",
            "thumbnailUrl": "data/generated-thumbnails/3_ffeeddcc.jpg",
            "tags": [{"names": ["dog"], "category": "default", "usages": 1}],
            "relations": [],
            "user": null,
            "score": -1
        }),
    ]
}

pub fn app() -> Router {
    app_with(Backend::default())
}

pub fn app_with(backend: Backend) -> Router {
    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/{id}", get(get_post))
        .with_state(backend)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Backend::default()).await
}

pub async fn run_with(listener: TcpListener, backend: Backend) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(backend)).await
}

fn error_response(status: StatusCode, name: &str, description: String) -> Response {
    let body = json!({
        "name": name,
        "title": status.canonical_reason().unwrap_or("Error"),
        "description": description,
    });
    (status, Json(body)).into_response()
}

fn check_auth(backend: &Backend, headers: &HeaderMap) -> Result<(), Response> {
    let Some(required) = backend.required_auth.as_deref() else {
        return Ok(());
    };
    let sent = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if sent == Some(required) {
        Ok(())
    } else {
        Err(error_response(
            StatusCode::FORBIDDEN,
            "AuthError",
            "Anonymous users are not allowed to list posts.".to_string(),
        ))
    }
}

/// Canonical safety for a search value, accepting the usual aliases.
fn safety_value(raw: &str) -> Option<&'static str> {
    match raw {
        "safe" => Some("safe"),
        "sketchy" | "questionable" => Some("sketchy"),
        "unsafe" => Some("unsafe"),
        _ => None,
    }
}

fn has_tag(post: &Value, name: &str) -> bool {
    post["tags"].as_array().is_some_and(|tags| {
        tags.iter().any(|t| {
            t["names"]
                .as_array()
                .is_some_and(|names| names.iter().any(|n| n == name))
        })
    })
}

fn matches_token(post: &Value, token: &str) -> Result<bool, String> {
    let (negated, token) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let hit = match token.split_once(':') {
        Some(("rating" | "safety", value)) => {
            let wanted = safety_value(value)
                .ok_or_else(|| format!("Invalid value for safety: {value:?}"))?;
            post["safety"] == wanted
        }
        _ => has_tag(post, token),
    };
    Ok(hit != negated)
}

fn project(post: &Value, fields: Option<&str>) -> Value {
    let (Some(fields), Some(map)) = (fields.filter(|f| !f.is_empty()), post.as_object()) else {
        return post.clone();
    };
    let projected: Map<String, Value> = fields
        .split(',')
        .filter_map(|f| map.get(f).map(|v| (f.to_string(), v.clone())))
        .collect();
    Value::Object(projected)
}

async fn list_posts(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    if let Err(resp) = check_auth(&backend, &headers) {
        return resp;
    }
    let query = params.query.unwrap_or_default();
    let mut matched = Vec::new();
    for post in backend.posts.iter() {
        let mut keep = true;
        for token in query.split_whitespace() {
            match matches_token(post, token) {
                Ok(hit) => keep &= hit,
                Err(description) => {
                    return error_response(StatusCode::BAD_REQUEST, "SearchError", description)
                }
            }
        }
        if keep {
            matched.push(post);
        }
    }

    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(100);
    let results: Vec<Value> = matched
        .iter()
        .skip(offset)
        .take(limit)
        .map(|post| project(post, params.fields.as_deref()))
        .collect();

    Json(json!({
        "query": query,
        "offset": offset,
        "limit": limit,
        "total": matched.len(),
        "results": results,
    }))
    .into_response()
}

async fn get_post(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    if let Err(resp) = check_auth(&backend, &headers) {
        return resp;
    }
    match backend.posts.iter().find(|p| p["id"] == id) {
        Some(post) => Json(post.clone()).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            "PostNotFoundError",
            format!("Post {id} not found."),
        ),
    }
}
