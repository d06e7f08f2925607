//! The decoding pipeline: take the body stream, parse it, normalize failures.
//!
//! Each call is an independent linear pipeline with no retries: take the
//! body, buffer it, drive serde over it, and fold every failure into
//! [`Error`]. Callers decide whether to retry at a higher level by
//! re-issuing the request; the body of one response can only be decoded
//! once.

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::has_json;
use crate::source::JsonSource;

/// Settings bag forwarded to the JSON deserializer.
///
/// # Example
///
/// ```
/// use baleen::DecodeOptions;
///
/// let options = DecodeOptions::new().capture_path(false);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    capture_path: bool,
    allow_trailing_data: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            capture_path: true,
            allow_trailing_data: false,
        }
    }
}

impl DecodeOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether schema errors carry the JSON path to the offending field
    /// (e.g. `user.address.city`). Defaults to `true`.
    #[must_use]
    pub const fn capture_path(mut self, capture: bool) -> Self {
        self.capture_path = capture;
        self
    }

    /// Whether bytes after the first JSON value are tolerated. Defaults to
    /// `false`: the whole body must be one value.
    #[must_use]
    pub const fn allow_trailing_data(mut self, allow: bool) -> Self {
        self.allow_trailing_data = allow;
        self
    }
}

/// Reads the response body as JSON text.
///
/// The body must be UTF-8 (invalid sequences are replaced, no BOM or
/// encoding sniffing). Consumes the body stream; it cannot be read again.
///
/// # Errors
///
/// Fails with [`Error::NotJson`] before any stream is taken when the
/// response is not classified as JSON-bearing (see
/// [`has_json`](crate::has_json)), with [`Error::StreamUnreadable`] when the
/// body stream is gone, or with [`Error::Read`] when reading it fails.
pub async fn json_text<R: JsonSource>(response: &mut R) -> Result<String> {
    if !has_json(response) {
        tracing::debug!(
            content_type = ?response.content_type(),
            content_length = ?response.content_length(),
            "response does not have JSON content"
        );
        return Err(Error::not_json_with_preview(response).await);
    }

    let body = response.take_body();
    if !body.is_readable() {
        return Err(Error::StreamUnreadable);
    }

    let bytes = body.collect().await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decodes the response body into a value of type `T`.
///
/// Equivalent to [`decode_as_with`] with default [`DecodeOptions`]. The
/// caller is expected to have checked [`has_json`](crate::has_json) first;
/// a non-JSON body surfaces as a syntax error here.
///
/// Use [`decode_value`] to parse arbitrary JSON without a target type.
///
/// # Errors
///
/// Fails with [`Error::StreamUnreadable`], [`Error::Read`],
/// [`Error::Syntax`], or [`Error::Schema`]; see [`decode_as_with`].
pub async fn decode_as<T, R>(response: &mut R) -> Result<T>
where
    T: DeserializeOwned,
    R: JsonSource,
{
    decode_as_with(response, &DecodeOptions::default()).await
}

/// Decodes the response body into a value of type `T`, honoring `options`.
///
/// Consumes the body stream: a second decode of the same response fails with
/// [`Error::StreamUnreadable`]. Decoding is all-or-nothing; no partial value
/// is ever produced.
///
/// # Errors
///
/// - [`Error::StreamUnreadable`] when the body stream is already gone,
///   observed in practice when the owning request was canceled by a timeout
///   racing the read. Fatal for this call, no retry.
/// - [`Error::Read`] when reading a body chunk fails.
/// - [`Error::Syntax`] when the body is not well-formed JSON.
/// - [`Error::Schema`] when the JSON does not fit `T`; the message names `T`
///   via [`std::any::type_name`].
pub async fn decode_as_with<T, R>(response: &mut R, options: &DecodeOptions) -> Result<T>
where
    T: DeserializeOwned,
    R: JsonSource,
{
    let body = response.take_body();
    if !body.is_readable() {
        return Err(Error::StreamUnreadable);
    }

    let bytes = body.collect().await?;
    tracing::trace!(
        len = bytes.len(),
        target_type = std::any::type_name::<T>(),
        "decoding response body"
    );
    parse_slice(&bytes, options)
}

/// Decodes the response body as arbitrary JSON.
///
/// This is the dynamic form of [`decode_as`], for callers that only know the
/// shape of the data at runtime.
///
/// # Errors
///
/// Same failure modes as [`decode_as`].
pub async fn decode_value<R: JsonSource>(response: &mut R) -> Result<serde_json::Value> {
    decode_as(response).await
}

/// Decodes the response body as arbitrary JSON, honoring `options`.
///
/// # Errors
///
/// Same failure modes as [`decode_as_with`].
pub async fn decode_value_with<R: JsonSource>(
    response: &mut R,
    options: &DecodeOptions,
) -> Result<serde_json::Value> {
    decode_as_with(response, options).await
}

fn parse_slice<T: DeserializeOwned>(bytes: &[u8], options: &DecodeOptions) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);

    let parsed = if options.capture_path {
        serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            let path = error.path().to_string();
            normalize::<T>(error.into_inner(), Some(path))
        })
    } else {
        T::deserialize(&mut deserializer).map_err(|error| normalize::<T>(error, None))
    }?;

    if !options.allow_trailing_data {
        deserializer
            .end()
            .map_err(|error| normalize::<T>(error, None))?;
    }

    Ok(parsed)
}

/// Folds a deserializer failure into the uniform error, keyed by the
/// deserializer's own failure category.
fn normalize<T>(source: serde_json::Error, path: Option<String>) -> Error {
    use serde_json::error::Category;

    match source.classify() {
        Category::Data => {
            // "." is serde_path_to_error's empty path.
            let message = match path.filter(|path| path != ".") {
                Some(path) => format!("{path}: {source}"),
                None => source.to_string(),
            };
            Error::schema(std::any::type_name::<T>(), message, source)
        }
        Category::Syntax | Category::Eof => Error::syntax(source),
        // Not a decode failure of ours; surface the I/O error as-is.
        Category::Io => Error::Read(std::io::Error::other(source)),
    }
}
