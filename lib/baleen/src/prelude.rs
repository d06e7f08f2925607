//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use baleen::prelude::*;
//! ```

pub use crate::{
    BodyStream, DecodeOptions, Error, JsonSource, Response, Result, StreamingResponse, decode_as,
    decode_as_with, decode_value, has_json, json_text,
};
