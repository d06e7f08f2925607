//! The response capability trait and body stream handle.
//!
//! [`JsonSource`] is the minimal surface baleen needs from an HTTP response:
//! content headers plus a body that can be taken as a byte stream exactly
//! once. Any HTTP client abstraction can satisfy it; an implementation for
//! [`http::Response`] is provided for the hyper ecosystem.

use std::io;
use std::pin::Pin;

use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;

/// A response body: chunks of bytes arriving over time.
pub type BodyChunks = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Capability trait for HTTP responses that may carry a JSON body.
///
/// The trait deliberately does not require any concrete framework response
/// type. Implementors expose the declared content headers and hand out the
/// body stream once; the body remains owned by the response, and baleen only
/// consumes the stream handle it took.
pub trait JsonSource {
    /// Declared `Content-Type` header value, if any.
    fn content_type(&self) -> Option<&str>;

    /// Declared or computed content length in bytes, if known.
    fn content_length(&self) -> Option<u64>;

    /// Take the response body as a stream of byte chunks.
    ///
    /// The body can be taken at most once. Later calls, or calls after the
    /// transport tore the response down, yield an unreadable stream.
    fn take_body(&mut self) -> BodyStream;
}

/// Handle to a response body stream taken from a [`JsonSource`].
///
/// A handle is either readable (it owns the chunk stream) or unreadable (the
/// body was already consumed, or the owning response was torn down before the
/// read, e.g. by a request timeout racing it).
pub struct BodyStream {
    chunks: Option<BodyChunks>,
}

impl BodyStream {
    /// Creates a readable handle over a chunk stream.
    #[must_use]
    pub fn readable(chunks: BodyChunks) -> Self {
        Self {
            chunks: Some(chunks),
        }
    }

    /// Creates a readable handle over an already-buffered body.
    #[must_use]
    pub fn from_bytes(bytes: Bytes) -> Self {
        Self::readable(Box::pin(futures_util::stream::once(std::future::ready(
            Ok(bytes),
        ))))
    }

    /// Creates an unreadable handle.
    #[must_use]
    pub const fn unreadable() -> Self {
        Self { chunks: None }
    }

    /// Whether the body can be read from this handle.
    #[must_use]
    pub const fn is_readable(&self) -> bool {
        self.chunks.is_some()
    }

    /// Buffer the entire stream into one byte buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unreadable or reading any chunk
    /// fails.
    pub async fn collect(self) -> io::Result<Bytes> {
        let mut chunks = self.into_chunks()?;
        let mut collected = Vec::new();

        while let Some(chunk) = chunks.next().await {
            collected.extend_from_slice(&chunk?);
        }

        Ok(Bytes::from(collected))
    }

    /// Buffer at most `limit` bytes from the stream.
    ///
    /// Stops pulling chunks once the limit is reached; the final chunk is
    /// trimmed so the result never exceeds `limit` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unreadable or reading any chunk
    /// fails.
    pub async fn collect_up_to(self, limit: usize) -> io::Result<Bytes> {
        let mut chunks = self.into_chunks()?;
        let mut collected = Vec::new();

        while collected.len() < limit {
            let Some(chunk) = chunks.next().await else {
                break;
            };
            let chunk = chunk?;
            let remaining = limit - collected.len();
            collected.extend_from_slice(chunk.get(..remaining.min(chunk.len())).unwrap_or(&chunk));
        }

        Ok(Bytes::from(collected))
    }

    fn into_chunks(self) -> io::Result<BodyChunks> {
        self.chunks.ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "body stream is not readable")
        })
    }
}

impl std::fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyStream")
            .field("readable", &self.is_readable())
            .finish()
    }
}

impl JsonSource for http::Response<Option<Bytes>> {
    fn content_type(&self) -> Option<&str> {
        self.headers()
            .get(http::header::CONTENT_TYPE)?
            .to_str()
            .ok()
    }

    fn content_length(&self) -> Option<u64> {
        self.headers()
            .get(http::header::CONTENT_LENGTH)?
            .to_str()
            .ok()?
            .trim()
            .parse()
            .ok()
    }

    fn take_body(&mut self) -> BodyStream {
        match self.body_mut().take() {
            Some(bytes) => BodyStream::from_bytes(bytes),
            None => BodyStream::unreadable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunked(chunks: Vec<&'static [u8]>) -> BodyStream {
        BodyStream::readable(Box::pin(futures_util::stream::iter(
            chunks.into_iter().map(|chunk| Ok(Bytes::from_static(chunk))),
        )))
    }

    #[tokio::test]
    async fn collect_buffers_all_chunks() {
        let stream = chunked(vec![b"hello", b", ", b"world"]);
        assert!(stream.is_readable());

        let bytes = stream.collect().await.expect("collect");
        assert_eq!(bytes.as_ref(), b"hello, world");
    }

    #[tokio::test]
    async fn collect_up_to_stops_at_limit() {
        let stream = chunked(vec![b"abcd", b"efgh", b"ijkl"]);

        let bytes = stream.collect_up_to(6).await.expect("collect");
        assert_eq!(bytes.as_ref(), b"abcdef");
    }

    #[tokio::test]
    async fn collect_up_to_short_body() {
        let stream = chunked(vec![b"abc"]);

        let bytes = stream.collect_up_to(100).await.expect("collect");
        assert_eq!(bytes.as_ref(), b"abc");
    }

    #[tokio::test]
    async fn unreadable_collect_fails() {
        let stream = BodyStream::unreadable();
        assert!(!stream.is_readable());

        let error = stream.collect().await.expect_err("should fail");
        assert_eq!(error.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn collect_surfaces_chunk_errors() {
        let stream = BodyStream::readable(Box::pin(futures_util::stream::iter(vec![
            Ok(Bytes::from_static(b"{")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        ])));

        let error = stream.collect().await.expect_err("should fail");
        assert_eq!(error.kind(), io::ErrorKind::ConnectionReset);
    }

    #[tokio::test]
    async fn http_response_source() {
        let mut response = http::Response::builder()
            .status(200)
            .header("content-type", "application/json; charset=utf-8")
            .header("content-length", "7")
            .body(Some(Bytes::from_static(b"{\"a\":1}")))
            .expect("response");

        assert_eq!(
            response.content_type(),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(JsonSource::content_length(&response), Some(7));

        let body = response.take_body();
        assert!(body.is_readable());
        assert_eq!(body.collect().await.expect("collect").as_ref(), b"{\"a\":1}");

        // Body is gone after the first take.
        assert!(!response.take_body().is_readable());
    }
}
