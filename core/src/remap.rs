//! Backend JSON -> bridge posts.
//!
//! # Design
//! Renamed fields are copied verbatim. Derived fields follow the rules the
//! bridge's callers rely on:
//! - `tag_string` joins the first name of every tag, in tag order.
//! - `has_children` holds only for a non-empty `relations` list.
//! - `file_url` and `large_file_url` carry the same absolute content URL; the
//!   backend has no separate large variant.

use serde_json::Value;
use url::Url;

use crate::error::BridgeError;
use crate::types::{BackendItem, BackendRelation, BackendTag, BridgeItem};

/// Remap a list response (`{"results": [...]}`), preserving order.
pub fn remap_list(response: Value, base: &Url) -> Result<Vec<BridgeItem>, BridgeError> {
    let results = match response {
        Value::Object(mut map) => map.remove("results"),
        _ => None,
    };
    let Some(Value::Array(results)) = results else {
        return Err(BridgeError::MalformedResponse(
            "expected a `results` list".to_string(),
        ));
    };

    results
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let item: BackendItem = serde_json::from_value(raw).map_err(|e| {
                BridgeError::MalformedResponse(format!("result #{index}: {e}"))
            })?;
            remap_item(&item, base)
        })
        .collect()
}

/// Remap the bare post object returned for a single-post lookup.
pub fn remap_single(response: Value, base: &Url) -> Result<BridgeItem, BridgeError> {
    if !response.is_object() {
        return Err(BridgeError::MalformedResponse(
            "expected a post object".to_string(),
        ));
    }
    let item: BackendItem = serde_json::from_value(response)
        .map_err(|e| BridgeError::MalformedResponse(e.to_string()))?;
    remap_item(&item, base)
}

pub fn remap_item(item: &BackendItem, base: &Url) -> Result<BridgeItem, BridgeError> {
    let has_children = item.relations.as_ref().is_some_and(|r| !r.is_empty());
    let children_ids = match &item.relations {
        Some(relations) if has_children => join_relation_ids(relations),
        _ => String::new(),
    };
    let file_url = resolve(base, item.content_url.as_deref())?;

    Ok(BridgeItem {
        id: item.id.clone(),
        created_at: item.creation_time.clone(),
        updated_at: item.last_edit_time.clone(),
        score: item.score.clone(),
        source: item.source.clone(),
        rating: item.safety.clone(),
        width: item.canvas_width.clone(),
        height: item.canvas_height.clone(),
        md5: item.checksum.clone(),
        file_ext: item.mime_type.clone(),
        author: item.user.as_ref().and_then(|u| u.name.clone()),
        tag_string: join_tag_names(item.tags.as_deref().unwrap_or_default()),
        has_children,
        children_ids,
        large_file_url: file_url.clone(),
        file_url,
        preview_file_url: resolve(base, item.thumbnail_url.as_deref())?,
    })
}

fn join_tag_names(tags: &[BackendTag]) -> String {
    tags.iter()
        .filter_map(|t| t.names.first().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_relation_ids(relations: &[BackendRelation]) -> String {
    relations
        .iter()
        .map(|r| match &r.id {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve(base: &Url, relative: Option<&str>) -> Result<Option<String>, BridgeError> {
    relative
        .map(|path| {
            base.join(path)
                .map(String::from)
                .map_err(|e| BridgeError::MalformedResponse(format!("bad content url {path:?}: {e}")))
        })
        .transpose()
}
