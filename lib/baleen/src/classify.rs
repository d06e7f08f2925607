//! Content classification.
//!
//! Decides whether a response body should be treated as JSON at all, from
//! the declared content length and content type. Pure predicate, no body
//! access.

use crate::source::JsonSource;

/// JSON media type token matched against the `Content-Type` header.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Returns `true` if the response content uses the JSON content type and the
/// content is not declared empty.
///
/// A declared content length of exactly `0` disqualifies regardless of the
/// content type; an absent length does not. The content type must carry the
/// `application/json` media type (byte-wise comparison, no locale rules),
/// optionally followed by parameters such as `; charset=utf-8`. A missing
/// content type is never JSON.
#[must_use]
pub fn has_json<R: JsonSource>(response: &R) -> bool {
    let has_length = response.content_length() != Some(0);
    let has_type = response.content_type().is_some_and(|content_type| {
        // Too-short values cannot carry the token; skip the comparison.
        content_type.len() >= JSON_CONTENT_TYPE.len() && is_json_media_type(content_type)
    });

    has_length && has_type
}

/// The trimmed value must start with the media type token at a token
/// boundary, so `application/jsonx` does not pass as JSON.
fn is_json_media_type(content_type: &str) -> bool {
    let Some(rest) = content_type.trim().strip_prefix(JSON_CONTENT_TYPE) else {
        return false;
    };
    rest.is_empty() || rest.starts_with(';') || rest.starts_with(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::response::Response;

    fn response(content_type: Option<&str>, body: &str) -> Response {
        let mut headers = HashMap::new();
        if let Some(content_type) = content_type {
            headers.insert("Content-Type".to_string(), content_type.to_string());
        }
        Response::new(200, headers, body.to_string())
    }

    #[test]
    fn json_content_type_matches() {
        assert!(has_json(&response(Some("application/json"), "{}")));
        assert!(has_json(&response(
            Some("application/json; charset=utf-8"),
            "{}"
        )));
        assert!(has_json(&response(Some("  application/json"), "{}")));
    }

    #[test]
    fn empty_body_never_matches() {
        // Content length of exactly 0 disqualifies regardless of type.
        assert!(!has_json(&response(Some("application/json"), "")));
    }

    #[test]
    fn missing_content_type_never_matches() {
        assert!(!has_json(&response(None, "{}")));
    }

    #[test]
    fn non_json_content_type_never_matches() {
        assert!(!has_json(&response(Some("text/html"), "{}")));
        assert!(!has_json(&response(Some("application/xml"), "{}")));
        // Prefix without a token boundary is a different media type.
        assert!(!has_json(&response(Some("application/jsonx"), "{}")));
        // No false positive from a substring elsewhere in the value.
        assert!(!has_json(&response(
            Some("text/html; see application/json"),
            "{}"
        )));
    }

    #[test]
    fn short_content_type_never_matches() {
        assert!(!has_json(&response(Some("json"), "{}")));
        assert!(!has_json(&response(Some(""), "{}")));
    }

    #[test]
    fn case_sensitive_token() {
        assert!(!has_json(&response(Some("Application/Json"), "{}")));
    }

    #[test]
    fn absent_length_matches() {
        // A streaming response with no content-length header still counts.
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        let response = crate::response::StreamingResponse::new(
            200,
            headers,
            Box::pin(futures_util::stream::empty()),
        );
        assert!(has_json(&response));
    }
}
