//! Typed JSON decoding for completed HTTP responses.
//!
//! baleen sits between an already-executed HTTP request and your typed data:
//! it confirms a response actually carries JSON, reads the body, and
//! deserializes it into a caller-chosen type, folding every failure mode
//! (wrong content type, empty body, unreadable stream, malformed JSON,
//! schema mismatch) into one uniform [`Error`].
//!
//! The crate owns no transport. Any response type that exposes its content
//! headers and hands out its body stream once can implement [`JsonSource`];
//! buffered [`Response`] and chunked [`StreamingResponse`] implementations
//! ship with the crate, as does one for [`http::Response`].
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use baleen::{Response, decode_as, has_json};
//!
//! #[derive(Debug, serde::Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> baleen::Result<()> {
//! let mut headers = HashMap::new();
//! headers.insert("Content-Type".to_string(), "application/json".to_string());
//! let mut response = Response::new(200, headers, r#"{"id":1,"name":"Alice"}"#);
//!
//! assert!(has_json(&response));
//! let user: User = decode_as(&mut response).await?;
//! assert_eq!(user.id, 1);
//! # Ok(())
//! # }
//! ```
//!
//! Decoding is all-or-nothing and consumes the body: a second decode of the
//! same response fails with [`Error::StreamUnreadable`]. Retry policy, if
//! any, belongs to the transport layer re-issuing the request.

mod classify;
mod decode;
mod error;
pub mod prelude;
mod response;
mod source;

pub use classify::{JSON_CONTENT_TYPE, has_json};
pub use decode::{
    DecodeOptions, decode_as, decode_as_with, decode_value, decode_value_with, json_text,
};
pub use error::{Error, Result};
pub use response::{Response, StreamingResponse};
pub use source::{BodyChunks, BodyStream, JsonSource};
