//! Inbound URL -> backend URL.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::types::{AuthToken, IncomingQuery, OutboundRequest, QueryKind};

const DEFAULT_LIMIT: &str = "75";
const DEFAULT_PAGE: &str = "1";

/// Rating shorthand patterns, applied in order. Each rewrites only its first
/// match and keeps the terminating whitespace.
static RATING_REWRITES: LazyLock<[(Regex, &'static str); 3]> = LazyLock::new(|| {
    [
        (rating_pattern("g|general|s|safe"), ":safe${1}"),
        (rating_pattern("q|questionable"), ":questionable${1}"),
        (rating_pattern("e|explicit"), ":unsafe${1}"),
    ]
});

fn rating_pattern(alternatives: &str) -> Regex {
    Regex::new(&format!(r":(?:{alternatives})(\s|$)")).expect("rating pattern is valid")
}

/// Normalize Danbooru rating shorthand (`rating:s`, `rating:e`, ...) to the
/// backend's long form.
pub fn rewrite_ratings(tags: &str) -> String {
    RATING_REWRITES
        .iter()
        .fold(tags.to_string(), |acc, (pattern, replacement)| {
            pattern.replace(&acc, *replacement).into_owned()
        })
}

/// Post id of a single-post lookup, if the path names one.
///
/// `/posts/{segment}` is a lookup when the segment (minus a `.json` suffix)
/// is empty or all digits. The segment is passed through unvalidated
/// otherwise.
fn single_post_id(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("/posts/")?;
    let segment = rest.split('/').next().unwrap_or_default();
    let segment = segment.strip_suffix(".json").unwrap_or(segment);
    segment.bytes().all(|b| b.is_ascii_digit()).then_some(segment)
}

fn parse_int(name: &str, raw: &str) -> Result<i64, BridgeError> {
    raw.trim()
        .parse()
        .map_err(|_| BridgeError::BadRequest(format!("Parameter `{name}` must be an integer")))
}

/// Translate an inbound bridge request into the backend request that answers it.
pub fn translate(
    query: &IncomingQuery,
    config: &BridgeConfig,
) -> Result<OutboundRequest, BridgeError> {
    let token = AuthToken::from_credentials(query.login.as_deref(), query.api_key.as_deref());

    if !query.path.starts_with("/posts") {
        return Err(BridgeError::BadRequest(
            "Endpoint must start with /posts".to_string(),
        ));
    }

    if let Some(id) = single_post_id(&query.path) {
        let url = config
            .server_url
            .join(&format!("/api/posts/{id}"))
            .map_err(|e| BridgeError::BadRequest(format!("invalid post id: {e}")))?;
        return Ok(OutboundRequest {
            kind: QueryKind::Single,
            url,
            token,
        });
    }

    let tags = query.tags.as_deref().map(rewrite_ratings).unwrap_or_default();
    let limit = parse_int("limit", query.limit.as_deref().unwrap_or(DEFAULT_LIMIT))?;
    let page = parse_int("page", query.page.as_deref().unwrap_or(DEFAULT_PAGE))?;
    let offset = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(limit))
        .ok_or_else(|| BridgeError::BadRequest("Page out of range".to_string()))?;

    let mut url = config
        .server_url
        .join("/api/posts")
        .map_err(|e| BridgeError::BadRequest(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("query", &tags)
        .append_pair("limit", &limit.to_string())
        .append_pair("offset", &offset.to_string())
        .append_pair("fields", &config.request_post_fields);

    Ok(OutboundRequest {
        kind: QueryKind::List,
        url,
        token,
    })
}
