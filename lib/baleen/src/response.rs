//! Concrete HTTP response types.
//!
//! [`Response`] holds a buffered body; [`StreamingResponse`] holds a chunked
//! one. Both implement [`JsonSource`], so they plug straight into
//! [`decode_as`](crate::decode_as) and friends.
//!
//! # Example
//!
//! ```ignore
//! let user: User = baleen::decode_as(&mut response).await?;
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::source::{BodyChunks, BodyStream, JsonSource};

/// HTTP response with status, headers, and a buffered body.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
}

impl Response {
    /// Creates a new buffered response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: Some(body.into()),
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name.
    ///
    /// Lookup is ASCII-case-insensitive, since transports differ in how they
    /// case header names.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_lookup(&self.headers, name)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }
}

impl JsonSource for Response {
    fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    fn content_length(&self) -> Option<u64> {
        // The buffered body is its own length; once consumed there is none.
        self.body
            .as_ref()
            .and_then(|body| u64::try_from(body.len()).ok())
    }

    fn take_body(&mut self) -> BodyStream {
        match self.body.take() {
            Some(bytes) => BodyStream::from_bytes(bytes),
            None => BodyStream::unreadable(),
        }
    }
}

/// HTTP response whose body arrives as a stream of chunks.
pub struct StreamingResponse {
    status: u16,
    headers: HashMap<String, String>,
    body: Option<BodyChunks>,
}

impl StreamingResponse {
    /// Creates a new streaming response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: BodyChunks) -> Self {
        Self {
            status,
            headers,
            body: Some(body),
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name (ASCII-case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_lookup(&self.headers, name)
    }

    /// Drops the body, as a transport does when the owning request is torn
    /// down by a timeout or cancellation racing the read. Later body takes
    /// yield an unreadable stream.
    pub fn close(&mut self) {
        self.body = None;
    }
}

impl JsonSource for StreamingResponse {
    fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    fn content_length(&self) -> Option<u64> {
        self.header("content-length")?.trim().parse().ok()
    }

    fn take_body(&mut self) -> BodyStream {
        match self.body.take() {
            Some(chunks) => BodyStream::readable(chunks),
            None => BodyStream::unreadable(),
        }
    }
}

fn header_lookup<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_basic() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let response = Response::new(200, headers, r#"{"id":1}"#);

        assert_eq!(response.status(), 200);
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert!(response.is_success());
        assert!(!response.is_client_error());
        assert!(!response.is_server_error());
    }

    #[test]
    fn response_status_checks() {
        let response = Response::new(404, HashMap::new(), "");
        assert!(response.is_client_error());

        let response = Response::new(500, HashMap::new(), "");
        assert!(response.is_server_error());
    }

    #[test]
    fn response_content_length_tracks_body() {
        let mut response = Response::new(200, HashMap::new(), "{}");
        assert_eq!(response.content_length(), Some(2));

        let _ = response.take_body();
        assert_eq!(response.content_length(), None);
    }

    #[tokio::test]
    async fn response_body_taken_once() {
        let mut response = Response::new(200, HashMap::new(), r#"{"id":1}"#);

        let body = response.take_body();
        assert!(body.is_readable());
        assert_eq!(
            body.collect().await.expect("collect").as_ref(),
            br#"{"id":1}"#
        );

        assert!(!response.take_body().is_readable());
    }

    #[tokio::test]
    async fn streaming_response_close_makes_body_unreadable() {
        let mut headers = HashMap::new();
        headers.insert("content-length".to_string(), "5".to_string());

        let chunks: BodyChunks = Box::pin(futures_util::stream::once(std::future::ready(Ok(
            Bytes::from_static(b"hello"),
        ))));
        let mut response = StreamingResponse::new(200, headers, chunks);

        assert_eq!(response.content_length(), Some(5));

        response.close();
        assert!(!response.take_body().is_readable());
    }
}
