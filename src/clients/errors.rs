//! HTTP-specific error types for the API resource client.
//!
//! This module contains error types for transport operations.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses while success is required
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type encompassing all transport errors
//!
//! # Example
//!
//! ```rust,ignore
//! use api_resource::clients::{HttpClient, HttpError};
//!
//! match client.execute(&request).await {
//!     Ok(response) => println!("Success: {}", response.code),
//!     Err(HttpError::Response(e)) => {
//!         println!("API error {}: {}", e.code, e.message);
//!     }
//!     Err(HttpError::InvalidRequest(e)) => {
//!         println!("Invalid request: {}", e);
//!     }
//!     Err(HttpError::Network(e)) => {
//!         println!("Network error: {}", e);
//!     }
//! }
//! ```

use thiserror::Error;

use crate::clients::http_response::HttpResponse;

/// Error returned when a response has a non-success status and the client
/// is configured to expect success.
///
/// The full response is kept so callers can inspect headers and body
/// without re-issuing the call.
#[derive(Debug, Error)]
#[error("HTTP {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The start of the response body, for diagnostics.
    pub message: String,
    /// Reference ID for error reporting (from the `X-Request-Id` header).
    pub error_reference: Option<String>,
    /// The rejected response.
    pub response: Box<HttpResponse>,
}

impl HttpResponseError {
    /// Builds the error from a rejected response.
    #[must_use]
    pub fn from_response(response: HttpResponse) -> Self {
        Self {
            code: response.code,
            message: response.body_snippet(),
            error_reference: response.request_id().map(String::from),
            response: Box::new(response),
        }
    }

    /// Returns `true` for 4xx statuses.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.code, 400..=499)
    }

    /// Returns `true` for 5xx statuses.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.code >= 500
    }
}

/// Error returned when an HTTP request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The path is not absolute.
    #[error("Invalid request path '{path}'. Paths must start with '/'.")]
    InvalidPath {
        /// The invalid path.
        path: String,
    },

    /// A header name is not valid HTTP.
    #[error("Invalid header name '{name}'.")]
    InvalidHeaderName {
        /// The invalid header name.
        name: String,
    },

    /// A header value is not valid HTTP.
    #[error("Invalid value for header '{name}'.")]
    InvalidHeaderValue {
        /// The header whose value is invalid.
        name: String,
    },

    /// A multipart part declares a MIME type that cannot be parsed.
    #[error("Invalid MIME type '{mime_type}' for multipart part '{part}'.")]
    InvalidMimeType {
        /// The part's form field name.
        part: String,
        /// The rejected MIME type.
        mime_type: String,
    },
}

/// Unified error type for all transport errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network, connection, or timeout error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the status code of the rejected response, if any.
    ///
    /// Network errors report the status only when the failure happened after
    /// a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::InvalidRequest(_) => None,
            Self::Network(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// Returns `true` if the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_timeout())
    }

    /// Returns the rejected response, if any.
    #[must_use]
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Response(e) => Some(&e.response),
            Self::InvalidRequest(_) | Self::Network(_) => None,
        }
    }
}
