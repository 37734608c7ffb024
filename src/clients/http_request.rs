//! HTTP request types for the API resource client.
//!
//! This module provides the [`HttpRequest`] type and its builder. Requests
//! are normally produced by [`RemoteService`](crate::RemoteService) from a
//! resource, but can also be built by hand and sent with
//! [`HttpClient::execute`](crate::clients::HttpClient::execute).

use std::fmt;

use reqwest::header::{HeaderName, HeaderValue};

use crate::clients::errors::InvalidHttpRequestError;
use crate::clients::form::{FormParameters, MultipartForm};

/// HTTP methods supported by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partially updating resources.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
    /// HTTP HEAD method for fetching headers only.
    Head,
}

impl HttpMethod {
    /// Converts the method into its `reqwest` counterpart.
    #[must_use]
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Patch => write!(f, "patch"),
            Self::Delete => write!(f, "delete"),
            Self::Head => write!(f, "head"),
        }
    }
}

/// Content type for HTTP request bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    /// JSON content type (`application/json`).
    Json,
    /// URL-encoded form content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
    /// Multipart form content type (`multipart/form-data`).
    Multipart,
}

impl DataType {
    /// Returns the MIME type string for this data type.
    ///
    /// The multipart boundary is added by the transport when the body is sent.
    #[must_use]
    pub const fn as_content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::Multipart => "multipart/form-data",
        }
    }
}

/// The primary payload of a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
    /// Pre-encoded JSON bytes.
    Json(Vec<u8>),
    /// A URL-encoded form.
    Form(FormParameters),
    /// A multipart form.
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Returns the data type of this body.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Json(_) => DataType::Json,
            Self::Form(_) => DataType::FormUrlEncoded,
            Self::Multipart(_) => DataType::Multipart,
        }
    }
}

/// An HTTP request to be sent by [`HttpClient`](crate::clients::HttpClient).
///
/// Use [`HttpRequest::builder`] to construct requests with the builder pattern.
///
/// # Example
///
/// ```rust
/// use api_resource::clients::{HttpMethod, HttpRequest, RequestBody};
///
/// let request = HttpRequest::builder(HttpMethod::Post, "/users/create")
///     .body(RequestBody::Json(br#"{"name":"Ada"}"#.to_vec()))
///     .header("X-Trace", "abc")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.path, "/users/create");
/// assert_eq!(request.header("x-trace"), Some("abc"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The absolute resolved path (appended to the base URL).
    pub path: String,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// Request headers, in order. Later entries win over earlier ones.
    pub headers: Vec<(String, String)>,
    /// The request body, if any.
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Returns the last value of the header `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the first value of the query parameter `name`.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `path` does not start with `/`
    /// - a header name or value is not valid HTTP
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if !self.path.starts_with('/') {
            return Err(InvalidHttpRequestError::InvalidPath {
                path: self.path.clone(),
            });
        }

        for (name, value) in &self.headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                return Err(InvalidHttpRequestError::InvalidHeaderName { name: name.clone() });
            }
            if HeaderValue::from_str(value).is_err() {
                return Err(InvalidHttpRequestError::InvalidHeaderValue { name: name.clone() });
            }
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl HttpRequestBuilder {
    /// Creates a new builder with the required method and path.
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends several query parameters.
    #[must_use]
    pub fn query(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(params);
        self
    }

    /// Adds a single header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            query: self.query,
            headers: self.headers,
            body: self.body,
        };
        request.verify()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "get");
        assert_eq!(HttpMethod::Post.to_string(), "post");
        assert_eq!(HttpMethod::Put.to_string(), "put");
        assert_eq!(HttpMethod::Patch.to_string(), "patch");
        assert_eq!(HttpMethod::Delete.to_string(), "delete");
        assert_eq!(HttpMethod::Head.to_string(), "head");
    }

    #[test]
    fn test_http_method_as_reqwest() {
        assert_eq!(HttpMethod::Get.as_reqwest(), reqwest::Method::GET);
        assert_eq!(HttpMethod::Patch.as_reqwest(), reqwest::Method::PATCH);
    }

    #[test]
    fn test_data_type_content_type() {
        assert_eq!(DataType::Json.as_content_type(), "application/json");
        assert_eq!(
            DataType::FormUrlEncoded.as_content_type(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(DataType::Multipart.as_content_type(), "multipart/form-data");
    }

    #[test]
    fn test_request_body_data_type() {
        assert_eq!(RequestBody::Json(vec![]).data_type(), DataType::Json);
        assert_eq!(
            RequestBody::Form(FormParameters::new()).data_type(),
            DataType::FormUrlEncoded
        );
        assert_eq!(
            RequestBody::Multipart(MultipartForm::new()).data_type(),
            DataType::Multipart
        );
    }

    #[test]
    fn test_builder_creates_valid_get_request() {
        let request = HttpRequest::builder(HttpMethod::Get, "/articles")
            .build()
            .unwrap();

        assert_eq!(request.http_method, HttpMethod::Get);
        assert_eq!(request.path, "/articles");
        assert!(request.body.is_none());
        assert!(request.query.is_empty());
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_builder_allows_post_without_body() {
        let request = HttpRequest::builder(HttpMethod::Post, "/jobs/run").build();
        assert!(request.is_ok());
    }

    #[test]
    fn test_verify_rejects_relative_path() {
        let result = HttpRequest::builder(HttpMethod::Get, "articles").build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::InvalidPath { path }) if path == "articles"
        ));
    }

    #[test]
    fn test_verify_rejects_invalid_header_name() {
        let result = HttpRequest::builder(HttpMethod::Get, "/a")
            .header("Bad Header", "x")
            .build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::InvalidHeaderName { name }) if name == "Bad Header"
        ));
    }

    #[test]
    fn test_verify_rejects_invalid_header_value() {
        let result = HttpRequest::builder(HttpMethod::Get, "/a")
            .header("X-Ok", "new\nline")
            .build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::InvalidHeaderValue { name }) if name == "X-Ok"
        ));
    }

    #[test]
    fn test_builder_with_query_params_and_header_lookup() {
        let request = HttpRequest::builder(HttpMethod::Get, "/articles")
            .query_param("limit", "50")
            .query(vec![("page".to_string(), "2".to_string())])
            .header("X-Custom", "first")
            .header("x-custom", "second")
            .build()
            .unwrap();

        assert_eq!(request.query_param("limit"), Some("50"));
        assert_eq!(request.query_param("page"), Some("2"));
        assert_eq!(request.header("X-CUSTOM"), Some("second"));
        assert_eq!(request.header("missing"), None);
    }
}
