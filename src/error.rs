//! Error types for the API resource client.
//!
//! This module contains [`ConfigError`], raised while building a
//! [`ClientConfig`](crate::ClientConfig), and [`ApiError`], the single error
//! type returned by every dispatch on a [`RemoteService`](crate::RemoteService).
//!
//! # Error Handling
//!
//! A dispatched call fails in exactly one of three ways, and callers can
//! always tell them apart:
//!
//! - **Resolution** ([`ApiError::Resolution`]): the resource's path could not
//!   be built, e.g. a `{placeholder}` without a matching field. Nothing was sent.
//! - **Transport** ([`ApiError::Transport`]): the server could not be reached,
//!   or it answered with a non-success status while success was required.
//! - **Decoding** ([`ApiError::Decoding`]): the server answered, but the body
//!   did not match the declared response type (or the request body could not
//!   be encoded).
//!
//! # Example
//!
//! ```rust
//! use api_resource::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

use crate::clients::HttpError;
use crate::codec::CodecError;
use crate::resource::ResourceError;

/// Errors that can occur while building the client configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Access token cannot be empty.
    #[error("Access token cannot be empty. Omit the token instead of passing an empty string.")]
    EmptyAccessToken,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide an absolute URL with an http or https scheme (e.g., 'https://api.example.com/v1').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A default header name or value is not valid HTTP.
    #[error("Invalid default header '{name}': {reason}")]
    InvalidHeader {
        /// The offending header name.
        name: String,
        /// Why the header was rejected.
        reason: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The underlying HTTP transport could not be created.
    #[error("Failed to create HTTP transport: {reason}")]
    Transport {
        /// The transport's own error message.
        reason: String,
    },
}

/// The error returned by a dispatched API call.
///
/// Every failure propagates to the caller unchanged; the client never
/// retries or substitutes a fallback value.
///
/// # Example
///
/// ```rust,ignore
/// use api_resource::ApiError;
///
/// match service.get(&user_by_id(7), None).await {
///     Ok(response) => println!("{}", response.name),
///     Err(ApiError::Transport(e)) if e.status() == Some(404) => println!("no such user"),
///     Err(ApiError::Decoding(e)) => println!("unexpected payload: {e}"),
///     Err(e) => return Err(e.into()),
/// }
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// The resource's path could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResourceError),

    /// The request failed at the transport level or returned a non-success status.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// A request or response body did not match its declared type.
    #[error(transparent)]
    Decoding(#[from] CodecError),
}

impl ApiError {
    /// Returns `true` if the resource's path could not be resolved.
    #[must_use]
    pub const fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }

    /// Returns `true` if the server could not be reached or answered with
    /// a non-success status.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if a body could not be (de)serialized.
    #[must_use]
    pub const fn is_decoding(&self) -> bool {
        matches!(self, Self::Decoding(_))
    }

    /// Returns the HTTP status code associated with this error, if any.
    ///
    /// Transport errors carry the status of the rejected response; decoding
    /// errors carry the status of the response whose body failed to decode.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Resolution(_) => None,
            Self::Transport(e) => e.status(),
            Self::Decoding(e) => e.status(),
        }
    }
}
