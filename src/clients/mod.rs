//! HTTP transport types for the API resource client.
//!
//! This module provides the layer beneath [`RemoteService`](crate::RemoteService):
//! a concrete request description, a `reqwest`-backed client that sends it, and
//! a fully materialized response.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client shared by all calls
//! - [`HttpRequest`]: A resolved request ready to be sent
//! - [`HttpResponse`]: A raw response with headers, body bytes, and timing
//! - [`HttpMethod`]: Supported HTTP methods
//! - [`DataType`]: Content types for request bodies
//! - [`RequestBody`]: JSON, URL-encoded, or multipart payloads
//! - [`FormParameters`] and [`MultipartForm`]: Form payload builders
//! - [`HttpError`]: Transport failures, including rejected statuses
//!
//! # Example
//!
//! ```rust,ignore
//! use api_resource::{BaseUrl, ClientConfig};
//! use api_resource::clients::{HttpClient, HttpMethod, HttpRequest};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com").unwrap())
//!     .build()?;
//! let client = HttpClient::new(&config)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/users")
//!     .query_param("page", "2")
//!     .build()?;
//!
//! let response = client.execute(&request).await?;
//! ```
//!
//! # Success Policy
//!
//! When the configuration expects success (the default), any non-2xx status
//! is returned as [`HttpError::Response`] carrying the full response. There
//! are no automatic retries.

mod errors;
mod form;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use form::{FormParameters, FormPart, MultipartForm, PartContent};
pub use http_client::{HttpClient, CLIENT_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder, RequestBody};
pub use http_response::HttpResponse;
