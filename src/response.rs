//! Typed response wrapper for dispatched calls.
//!
//! This module provides [`TypedResponse<Body>`], the result of every call
//! made through [`RemoteService`](crate::RemoteService). It pairs the decoded
//! body with the transport metadata of the response it came from.
//!
//! # Deref Pattern
//!
//! `TypedResponse<Body>` implements `Deref<Target = Body>`, so the decoded
//! body can be used directly:
//!
//! ```rust,ignore
//! let users: TypedResponse<Vec<User>> = service.get(&users, None).await?;
//!
//! for user in users.iter() {
//!     println!("{}", user.name);
//! }
//! println!("{} users in {} ms", users.len(), users.elapsed().num_milliseconds());
//! ```
//!
//! The wrapper is immutable; use [`TypedResponse::into_inner`] to take the
//! body by value.

use std::collections::HashMap;
use std::ops::Deref;

use chrono::{DateTime, Duration, Utc};
use reqwest::Version;
use serde::de::DeserializeOwned;

use crate::clients::HttpResponse;
use crate::codec::{CodecError, JsonCodec};

/// A decoded response together with its status, headers, and timing.
///
/// # Example
///
/// ```rust
/// use api_resource::{JsonCodec, TypedResponse};
/// use api_resource::clients::HttpResponse;
/// use std::collections::HashMap;
///
/// let raw = HttpResponse::new(200, HashMap::new(), b"[1, 2, 3]".to_vec());
/// let response: TypedResponse<Vec<u32>> =
///     TypedResponse::from_http_response(raw, &JsonCodec::default()).unwrap();
///
/// assert!(response.is_success());
/// assert_eq!(response.len(), 3);
/// assert_eq!(response[0], 1);
/// ```
#[derive(Debug, Clone)]
pub struct TypedResponse<Body> {
    status: u16,
    version: Version,
    headers: HashMap<String, Vec<String>>,
    request_time: DateTime<Utc>,
    response_time: DateTime<Utc>,
    body: Body,
}

impl<Body: DeserializeOwned> TypedResponse<Body> {
    /// Decodes a raw response into `Body`.
    ///
    /// The body is decoded exactly once, from the fully materialized bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] if the bytes do not match `Body`.
    pub fn from_http_response(response: HttpResponse, codec: &JsonCodec) -> Result<Self, CodecError> {
        let body = codec.decode(&response.body, response.content_type(), Some(response.code))?;

        Ok(Self {
            status: response.code,
            version: response.version,
            headers: response.headers,
            request_time: response.request_time,
            response_time: response.response_time,
            body,
        })
    }
}

impl<Body> TypedResponse<Body> {
    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns `true` if the status code is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    /// Returns the HTTP protocol version.
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Returns all headers, keyed by lowercase name.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, Vec<String>> {
        &self.headers
    }

    /// Returns the first value of the header `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the request ID from the `X-Request-Id` header.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns when the request was sent.
    #[must_use]
    pub const fn request_time(&self) -> DateTime<Utc> {
        self.request_time
    }

    /// Returns when the response headers were received.
    #[must_use]
    pub const fn response_time(&self) -> DateTime<Utc> {
        self.response_time
    }

    /// Returns the time between sending the request and receiving the response.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.response_time - self.request_time
    }

    /// Returns a reference to the decoded body.
    ///
    /// Note: In most cases, you can use Deref coercion instead of
    /// calling this method explicitly.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Consumes the response and returns the decoded body.
    #[must_use]
    pub fn into_inner(self) -> Body {
        self.body
    }

    /// Transforms the body while keeping the response metadata.
    #[must_use]
    pub fn map<U, F: FnOnce(Body) -> U>(self, f: F) -> TypedResponse<U> {
        TypedResponse {
            status: self.status,
            version: self.version,
            headers: self.headers,
            request_time: self.request_time,
            response_time: self.response_time,
            body: f(self.body),
        }
    }
}

impl<Body> Deref for TypedResponse<Body> {
    type Target = Body;

    fn deref(&self) -> &Self::Target {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Article {
        id: u64,
        title: String,
    }

    fn raw(code: u16, content_type: &str, body: &str) -> HttpResponse {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), vec![content_type.to_string()]);
        headers.insert("X-Request-Id".to_string(), vec!["req-7".to_string()]);
        HttpResponse::new(code, headers, body.as_bytes().to_vec())
    }

    #[test]
    fn test_from_http_response_decodes_and_keeps_metadata() {
        let sent = Utc::now();
        let received = sent + Duration::milliseconds(40);
        let http = raw(200, "application/json", r#"{"id":1,"title":"Hello"}"#).with_metadata(
            Version::HTTP_2,
            sent,
            received,
        );

        let response: TypedResponse<Article> =
            TypedResponse::from_http_response(http, &JsonCodec::default()).unwrap();

        assert_eq!(response.status(), 200);
        assert!(response.is_success());
        assert_eq!(response.version(), Version::HTTP_2);
        assert_eq!(response.request_id(), Some("req-7"));
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.request_time(), sent);
        assert_eq!(response.response_time(), received);
        assert_eq!(response.elapsed(), Duration::milliseconds(40));
        assert_eq!(response.title, "Hello");
    }

    #[test]
    fn test_deref_exposes_collection_methods() {
        let http = raw(
            200,
            "application/json",
            r#"[{"id":1,"title":"a"},{"id":2,"title":"b"}]"#,
        );
        let response: TypedResponse<Vec<Article>> =
            TypedResponse::from_http_response(http, &JsonCodec::default()).unwrap();

        assert_eq!(response.len(), 2);
        assert_eq!(response[1].id, 2);
        assert_eq!(response.iter().map(|a| a.id).sum::<u64>(), 3);
    }

    #[test]
    fn test_decode_mismatch_reports_status_and_target() {
        let http = raw(200, "application/json", r#"{"unexpected":true}"#);
        let error = TypedResponse::<Vec<Article>>::from_http_response(http, &JsonCodec::default())
            .unwrap_err();

        assert_eq!(error.status(), Some(200));
        assert!(error.target().contains("Article"));
    }

    #[test]
    fn test_non_success_status_is_still_decoded_when_allowed() {
        let http = raw(404, "application/json", r#"{"id":0,"title":"missing"}"#);
        let response: TypedResponse<Article> =
            TypedResponse::from_http_response(http, &JsonCodec::default()).unwrap();

        assert!(!response.is_success());
        assert_eq!(response.status(), 404);
    }

    #[test]
    fn test_is_success_covers_exactly_2xx() {
        for (code, expected) in [(199, false), (200, true), (299, true), (300, false)] {
            let response: TypedResponse<()> =
                TypedResponse::from_http_response(raw(code, "text/plain", ""), &JsonCodec::default())
                    .unwrap();
            assert_eq!(response.is_success(), expected, "status {code}");
        }
    }

    #[test]
    fn test_into_inner_and_map_keep_body() {
        let http = raw(201, "text/plain", "Form Submitted");
        let response: TypedResponse<String> =
            TypedResponse::from_http_response(http, &JsonCodec::default()).unwrap();

        let lengths = response.clone().map(|text| text.len());
        assert_eq!(*lengths, 14);
        assert_eq!(lengths.status(), 201);
        assert_eq!(response.into_inner(), "Form Submitted");
    }
}
