//! Helper utilities for REST request handling.

use log::warn;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use super::types::{ApiErrorBody, Token};
use crate::error::{BoxedStr, YtError};

/// Maximum number of characters to keep when logging response body snippets.
pub(super) const BODY_SNIPPET_LEN: usize = 500;
/// Maximum number of characters to keep when logging request payload snippets.
pub(super) const REQUEST_SNIPPET_LEN: usize = 1024;

/// Trim `text` to `max` characters, appending `...` when truncated.
///
/// Returns an empty string when `max` is zero.
pub(super) fn snippet(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out = text.chars().take(max).collect::<String>();
        out.push_str("...");
        out
    }
}

/// Recursively redact values stored under credential-like keys.
pub(super) fn redact_sensitive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (k, v) in map.iter_mut() {
                if matches!(
                    k.to_ascii_lowercase().as_str(),
                    "token"
                        | "authorization"
                        | "password"
                        | "secret"
                        | "api_key"
                        | "apikey"
                        | "bearer"
                        | "credentials"
                        | "base64content"
                ) {
                    *v = Value::String("<redacted>".into());
                } else {
                    redact_sensitive(v);
                }
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(redact_sensitive),
        _ => {}
    }
}

/// Build a snippet of the redacted request payload.
pub(super) fn payload_snippet(payload: &Value) -> String {
    let mut redacted = payload.clone();
    redact_sensitive(&mut redacted);
    let json = match serde_json::to_string(&redacted) {
        Ok(s) => s,
        Err(e) => {
            warn!("failed to serialise redacted payload: {e}");
            "<failed to serialise payload>".into()
        }
    };
    snippet(&json, REQUEST_SNIPPET_LEN)
}

/// Interpret a YouTrack error body, if `body` is one.
pub(super) fn api_error(body: &str) -> Option<YtError> {
    let parsed: ApiErrorBody = serde_json::from_str(body).ok()?;
    let msg = match parsed.error_description {
        Some(desc) if !desc.is_empty() => format!("{}: {desc}", parsed.error),
        _ => parsed.error,
    };
    Some(YtError::ApiErrors(msg.boxed()))
}

/// Build standard headers with an optional bearer token.
pub(super) fn build_headers(token: &Token) -> Result<HeaderMap, YtError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("ytk"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if !token.is_empty() {
        let value =
            format!("Bearer {}", token.as_str())
                .parse()
                .map_err(|e| YtError::RequestContext {
                    context: "parse Authorization header".boxed(),
                    source: Box::new(e),
                })?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}
