//! Error types for baleen.

use derive_more::{Display, Error, From};

use crate::source::JsonSource;

/// Characters of response body kept in a diagnostic preview.
const PREVIEW_LENGTH: usize = 2000;

/// The uniform error surfaced for every decode failure.
///
/// Every classified failure of the decode pipeline is one of these variants;
/// the raw deserializer error is reachable through
/// [`std::error::Error::source`] but never surfaced as its own type.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The response was not classified as JSON-bearing.
    #[display("The response does not have JSON content.")]
    #[from(skip)]
    NotJson {
        /// Bounded preview of the response body, for diagnostics.
        #[error(not(source))]
        preview: Option<String>,
    },

    /// The body stream could not be read, typically because the owning
    /// request was torn down (timeout or cancellation) before the read.
    #[display("Response stream is not readable.")]
    #[from(skip)]
    StreamUnreadable,

    /// The body is not well-formed JSON.
    #[display("Response is not valid JSON: {message}")]
    #[from(skip)]
    Syntax {
        /// The deserializer's own message.
        message: String,
        /// Underlying deserializer error.
        source: serde_json::Error,
    },

    /// The body is well-formed JSON but incompatible with the target type.
    #[display("Response JSON could not be deserialized to {target}: {message}")]
    #[from(skip)]
    Schema {
        /// Declared name of the target type.
        target: &'static str,
        /// The deserializer's own message, with the JSON path when captured.
        message: String,
        /// Underlying deserializer error.
        source: serde_json::Error,
    },

    /// Reading the body stream failed partway through.
    #[display("failed to read response body: {_0}")]
    #[from]
    Read(std::io::Error),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a [`Error::NotJson`] carrying a bounded body preview.
    ///
    /// Reads at most a couple of kilobytes from the body for diagnostics,
    /// best effort: an unreadable stream or a failed read degrades to no
    /// preview rather than a different error.
    pub async fn not_json_with_preview<R: JsonSource>(response: &mut R) -> Self {
        Self::NotJson {
            preview: read_preview(response).await,
        }
    }

    pub(crate) fn syntax(source: serde_json::Error) -> Self {
        Self::Syntax {
            message: source.to_string(),
            source,
        }
    }

    pub(crate) fn schema(target: &'static str, message: String, source: serde_json::Error) -> Self {
        Self::Schema {
            target,
            message,
            source,
        }
    }

    /// Body preview attached to a [`Error::NotJson`], if one was captured.
    #[must_use]
    pub fn preview(&self) -> Option<&str> {
        match self {
            Self::NotJson { preview } => preview.as_deref(),
            _ => None,
        }
    }

    /// Declared target type name if this is a schema error.
    #[must_use]
    pub const fn schema_target(&self) -> Option<&'static str> {
        match self {
            Self::Schema { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Returns `true` if the response was not classified as JSON-bearing.
    #[must_use]
    pub const fn is_not_json(&self) -> bool {
        matches!(self, Self::NotJson { .. })
    }

    /// Returns `true` if the body stream was unreadable.
    #[must_use]
    pub const fn is_stream_unreadable(&self) -> bool {
        matches!(self, Self::StreamUnreadable)
    }

    /// Returns `true` if the body was not well-formed JSON.
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    /// Returns `true` if the JSON was incompatible with the target type.
    #[must_use]
    pub const fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }
}

async fn read_preview<R: JsonSource>(response: &mut R) -> Option<String> {
    let stream = response.take_body();
    if !stream.is_readable() {
        return None;
    }

    // Read one byte past the limit so truncation is detectable.
    match stream.collect_up_to(PREVIEW_LENGTH + 1).await {
        Ok(bytes) => {
            let truncated = bytes.len() > PREVIEW_LENGTH;
            let bounded = bytes.get(..PREVIEW_LENGTH.min(bytes.len())).unwrap_or(&bytes);
            let mut preview = String::from_utf8_lossy(bounded).into_owned();
            if truncated {
                preview.push_str("...");
            }
            Some(preview)
        }
        Err(error) => {
            tracing::debug!(%error, "failed to read response body preview");
            None
        }
    }
}
