//! Raw HTTP response returned by the transport.
//!
//! [`HttpResponse`] is a fully materialized snapshot: status, protocol
//! version, headers, timing, and body bytes. Typed decoding happens in
//! [`TypedResponse`](crate::TypedResponse).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::Version;

use crate::codec;

/// A raw HTTP response.
///
/// Header names are stored lowercase; a header may have multiple values.
///
/// # Example
///
/// ```rust
/// use api_resource::clients::HttpResponse;
/// use std::collections::HashMap;
///
/// let mut headers = HashMap::new();
/// headers.insert("content-type".to_string(), vec!["text/plain".to_string()]);
///
/// let response = HttpResponse::new(200, headers, b"pong".to_vec());
/// assert!(response.is_ok());
/// assert_eq!(response.content_type(), Some("text/plain"));
/// assert_eq!(response.body_text(), "pong");
/// ```
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// The HTTP protocol version.
    pub version: Version,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The response body.
    pub body: Vec<u8>,
    /// When the request was sent.
    pub request_time: DateTime<Utc>,
    /// When the response headers were received.
    pub response_time: DateTime<Utc>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse` with HTTP/1.1 and both timestamps set to now.
    ///
    /// Header names are normalised to lowercase.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        let now = Utc::now();
        let mut normalized: HashMap<String, Vec<String>> = HashMap::new();
        for (name, values) in headers {
            normalized
                .entry(name.to_lowercase())
                .or_default()
                .extend(values);
        }
        Self {
            code,
            version: Version::HTTP_11,
            headers: normalized,
            body,
            request_time: now,
            response_time: now,
        }
    }

    /// Sets the protocol version and timestamps.
    #[must_use]
    pub fn with_metadata(
        mut self,
        version: Version,
        request_time: DateTime<Utc>,
        response_time: DateTime<Utc>,
    ) -> Self {
        self.version = version;
        self.request_time = request_time;
        self.response_time = response_time;
        self
    }

    /// Returns `true` if the response has a 2xx status code.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.code, 200..=299)
    }

    /// Returns the first value of the header `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `Content-Type` header, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the request ID from the `X-Request-Id` header.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Returns the start of the body, for error messages.
    #[must_use]
    pub fn body_snippet(&self) -> String {
        codec::snippet(&self.body)
    }

    /// Converts `reqwest` headers into a lowercase multi-valued map.
    pub(crate) fn parse_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
