//! JSON codec for request and response bodies.
//!
//! [`JsonCodec`] encodes payload-bearing resources' bodies and decodes
//! response bodies into their declared types. Failures are reported as
//! [`CodecError`], which is kept apart from transport errors so callers can
//! distinguish "the server answered with the wrong shape" from "the server did
//! not answer".
//!
//! # Decoding rules
//!
//! - An empty body decodes as JSON `null`, so `()` and `Option<T>` targets work.
//! - Otherwise the body is parsed as JSON. Unknown object keys are ignored.
//! - If JSON parsing fails and the response is not JSON-typed, the body text is
//!   decoded as a JSON string, so `String` targets accept `text/plain` bodies.
//!
//! # Example
//!
//! ```rust
//! use api_resource::JsonCodec;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct User {
//!     id: u64,
//!     nickname: Option<String>,
//! }
//!
//! let codec = JsonCodec::new().pretty_print(false);
//! let bytes = codec.encode(&User { id: 1, nickname: None }).unwrap();
//! assert_eq!(bytes, br#"{"id":1}"#);
//!
//! let user: User = codec.decode(&bytes, Some("application/json"), None).unwrap();
//! assert_eq!(user, User { id: 1, nickname: None });
//! ```

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Maximum number of body characters kept in error messages.
pub const SNIPPET_LEN: usize = 256;

/// Error raised when a body cannot be (de)serialized.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A request body could not be encoded.
    #[error("Failed to encode request body of type {target}: {source}")]
    Encode {
        /// The Rust type that was being encoded.
        target: &'static str,
        /// The underlying serializer error.
        #[source]
        source: serde_json::Error,
    },

    /// A response body did not match the declared response type.
    #[error("Failed to decode response body into {target}: {source}. Body: {snippet}")]
    Decode {
        /// The Rust type the body was expected to decode into.
        target: &'static str,
        /// The status code of the response, when known.
        status: Option<u16>,
        /// The start of the offending body.
        snippet: String,
        /// The underlying deserializer error.
        #[source]
        source: serde_json::Error,
    },
}

impl CodecError {
    /// Returns the name of the type that failed to (de)serialize.
    #[must_use]
    pub const fn target(&self) -> &'static str {
        match self {
            Self::Encode { target, .. } | Self::Decode { target, .. } => target,
        }
    }

    /// Returns the status code of the response whose body failed to decode.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Encode { .. } => None,
            Self::Decode { status, .. } => *status,
        }
    }
}

/// JSON codec settings.
///
/// # Defaults
///
/// - `pretty_print`: `true`
/// - `explicit_nulls`: `false` (object members whose value is `null` are
///   omitted from encoded bodies)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonCodec {
    pretty_print: bool,
    explicit_nulls: bool,
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self {
            pretty_print: true,
            explicit_nulls: false,
        }
    }
}

impl JsonCodec {
    /// Creates a codec with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether encoded bodies are pretty-printed.
    #[must_use]
    pub const fn pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Sets whether `null` object members are kept in encoded bodies.
    #[must_use]
    pub const fn explicit_nulls(mut self, explicit: bool) -> Self {
        self.explicit_nulls = explicit;
        self
    }

    /// Returns whether encoded bodies are pretty-printed.
    #[must_use]
    pub const fn is_pretty_print(&self) -> bool {
        self.pretty_print
    }

    /// Returns whether `null` object members are kept in encoded bodies.
    #[must_use]
    pub const fn is_explicit_nulls(&self) -> bool {
        self.explicit_nulls
    }

    /// Encodes a value as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the value cannot be serialized
    /// (e.g. a map with non-string keys).
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        let encode_error = |source| CodecError::Encode {
            target: std::any::type_name::<T>(),
            source,
        };

        let mut json = serde_json::to_value(value).map_err(encode_error)?;
        if !self.explicit_nulls {
            strip_nulls(&mut json);
        }

        if self.pretty_print {
            serde_json::to_vec_pretty(&json).map_err(encode_error)
        } else {
            serde_json::to_vec(&json).map_err(encode_error)
        }
    }

    /// Decodes a response body into `T`.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The fully materialized body
    /// * `content_type` - The response's `Content-Type`, if any
    /// * `status` - The response's status code, recorded in errors
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] if the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(
        &self,
        bytes: &[u8],
        content_type: Option<&str>,
        status: Option<u16>,
    ) -> Result<T, CodecError> {
        let decode_error = |source| CodecError::Decode {
            target: std::any::type_name::<T>(),
            status,
            snippet: snippet(bytes),
            source,
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_value(Value::Null).map_err(decode_error);
        }

        match serde_json::from_slice(bytes) {
            Ok(value) => Ok(value),
            Err(json_error) if !is_json_content_type(content_type) => {
                let text = String::from_utf8_lossy(bytes).into_owned();
                serde_json::from_value(Value::String(text)).map_err(|_| decode_error(json_error))
            }
            Err(json_error) => Err(decode_error(json_error)),
        }
    }
}

/// Returns `true` when the content type denotes a JSON payload.
///
/// Matches `application/json` as well as `+json` suffixes such as
/// `application/problem+json`.
#[must_use]
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| {
        let mime = ct.split(';').next().unwrap_or_default().trim();
        mime.eq_ignore_ascii_case("application/json")
            || mime.to_ascii_lowercase().ends_with("+json")
    })
}

/// Returns at most [`SNIPPET_LEN`] characters of the body as text.
#[must_use]
pub fn snippet(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.char_indices().nth(SNIPPET_LEN) {
        Some((end, _)) => format!("{}…", &text[..end]),
        None => text.into_owned(),
    }
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}
