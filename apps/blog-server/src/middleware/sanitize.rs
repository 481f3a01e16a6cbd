//! Request sanitization applied before routing.
//!
//! - JSON bodies: object keys starting with `$` or containing `.` are dropped,
//!   `<` and `>` inside string values are HTML-escaped.
//! - Query strings: repeated keys collapse to their last value, values are
//!   HTML-escaped the same way.

use std::error::Error as StdError;

use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use blog_http::{ApiError, catalog};
use bytes::Bytes;
use http::uri::PathAndQuery;
use http::{HeaderValue, Uri, header};
use http_body_util::LengthLimitError;
use serde_json::{Map, Value};

/// Escape the characters that open or close HTML markup.
#[must_use]
pub fn escape_html(input: &str) -> String {
    if !input.contains(['<', '>']) {
        return input.to_owned();
    }
    let mut out = String::with_capacity(input.len() + 8);
    for ch in input.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

fn is_operator_key(key: &str) -> bool {
    key.starts_with('$') || key.contains('.')
}

/// Sanitize a JSON document in place. Returns `true` if anything changed.
pub fn sanitize_json(value: &mut Value) -> bool {
    match value {
        Value::Object(map) => sanitize_object(map),
        Value::Array(items) => items
            .iter_mut()
            .fold(false, |changed, item| sanitize_json(item) | changed),
        Value::String(s) => {
            let escaped = escape_html(s);
            if escaped == *s {
                false
            } else {
                *s = escaped;
                true
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

fn sanitize_object(map: &mut Map<String, Value>) -> bool {
    let before = map.len();
    map.retain(|key, _| !is_operator_key(key));
    let mut changed = map.len() != before;
    for value in map.values_mut() {
        changed |= sanitize_json(value);
    }
    changed
}

/// Collapse repeated keys to their last value and escape every value.
/// Keys keep the position of their first occurrence.
///
/// `None` if the query string cannot be decoded or re-encoded.
#[must_use]
pub fn sanitize_query(query: &str) -> Option<String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).ok()?;
    let mut deduped: Vec<(String, String)> = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        let value = escape_html(&value);
        match deduped.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => deduped.push((key, value)),
        }
    }
    serde_urlencoded::to_string(&deduped).ok()
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<mime::Mime>().ok())
        .is_some_and(|m| {
            m.type_() == mime::APPLICATION
                && (m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON))
        })
}

fn is_length_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut cur = Some(err);
    while let Some(e) = cur {
        if e.is::<LengthLimitError>() {
            return true;
        }
        cur = e.source();
    }
    false
}

fn rewrite_query(req: &mut Request) -> Result<(), ApiError> {
    let Some(query) = req.uri().query() else {
        return Ok(());
    };
    let clean =
        sanitize_query(query).ok_or_else(|| ApiError::bad_request("Invalid query string"))?;
    if clean == query {
        return Ok(());
    }

    let path_and_query = if clean.is_empty() {
        req.uri().path().to_owned()
    } else {
        format!("{}?{clean}", req.uri().path())
    };
    let mut parts = req.uri().clone().into_parts();
    parts.path_and_query = Some(
        PathAndQuery::try_from(path_and_query)
            .map_err(|_| ApiError::bad_request("Invalid query string"))?,
    );
    *req.uri_mut() =
        Uri::from_parts(parts).map_err(|_| ApiError::bad_request("Invalid query string"))?;
    Ok(())
}

async fn rewrite_json_body(req: Request, limit: usize) -> Result<Request, ApiError> {
    let (mut parts, body) = req.into_parts();
    let bytes = to_bytes(body, limit).await.map_err(|err| {
        if is_length_limit(&err) {
            ApiError::from_def(&catalog::PAYLOAD_TOO_LARGE, "Request body is too large")
        } else {
            ApiError::bad_request("Failed to read request body")
        }
    })?;

    // Unparseable bodies are left for the JSON extractor to reject.
    let bytes = match serde_json::from_slice::<Value>(&bytes) {
        Ok(mut value) => {
            if sanitize_json(&mut value) {
                let clean = serde_json::to_vec(&value).map_err(|e| {
                    tracing::error!(error = %e, "failed to re-serialize sanitized body");
                    ApiError::internal()
                })?;
                parts
                    .headers
                    .insert(header::CONTENT_LENGTH, HeaderValue::from(clean.len()));
                Bytes::from(clean)
            } else {
                bytes
            }
        }
        Err(_) => bytes,
    };

    Ok(Request::from_parts(parts, Body::from(bytes)))
}

/// Sanitize the query string and, for JSON requests, the body.
/// `limit` caps how much of a JSON body is buffered.
pub async fn sanitize_middleware(
    State(limit): State<usize>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    rewrite_query(&mut req)?;
    if is_json(&req) {
        req = rewrite_json_body(req, limit).await?;
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operator_keys_are_removed_recursively() {
        let mut v = json!({
            "email": {"$gt": ""},
            "password": "x",
            "profile.admin": true,
            "nested": [{"$where": "1", "ok": 1}]
        });
        assert!(sanitize_json(&mut v));
        assert_eq!(
            v,
            json!({"email": {}, "password": "x", "nested": [{"ok": 1}]})
        );
    }

    #[test]
    fn markup_in_strings_is_escaped() {
        let mut v = json!({"username": "<script>alert(1)</script>", "n": 1});
        assert!(sanitize_json(&mut v));
        assert_eq!(v["username"], "&lt;script&gt;alert(1)&lt;/script&gt;");
        assert_eq!(v["n"], 1);
    }

    #[test]
    fn clean_document_is_untouched() {
        let mut v = json!({"username": "alice", "tags": ["a", "b"], "n": null});
        assert!(!sanitize_json(&mut v));
    }

    #[test]
    fn duplicated_query_keys_keep_last_value() {
        assert_eq!(
            sanitize_query("sort=name&page=1&sort=email").unwrap(),
            "sort=email&page=1"
        );
    }

    #[test]
    fn query_values_are_escaped() {
        assert_eq!(
            sanitize_query("q=%3Cb%3E").unwrap(),
            "q=%26lt%3Bb%26gt%3B"
        );
    }

    #[test]
    fn plain_query_is_stable() {
        assert_eq!(sanitize_query("a=1&b=2").unwrap(), "a=1&b=2");
    }
}
