//! Request dispatch for API resources.
//!
//! This module provides [`RemoteService`], which turns a resource value into
//! an HTTP request, sends it through the shared [`HttpClient`], and decodes
//! the answer into the resource's declared response type.
//!
//! # Pipeline
//!
//! Every entry point runs the same steps:
//!
//! 1. Resolve the resource's path and field-derived query parameters
//! 2. Pick the method (explicit argument, or the one the entry point implies)
//! 3. Attach the payload: the resource's own body as JSON, or the form or
//!    multipart payload passed to a submit call
//! 4. Apply the caller's [`RequestOverrides`]
//! 5. Send the request and read the whole body
//! 6. Decode the body into a [`TypedResponse`]
//!
//! Form and multipart submissions never send the resource's own body.
//!
//! # Example
//!
//! ```rust,ignore
//! use api_resource::{BaseUrl, ClientConfig, RemoteService, Resource};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com")?)
//!     .build()?;
//! let service = RemoteService::from_config(&config)?;
//!
//! let users = Resource::<Vec<User>>::new("users");
//! let response = service.get(&users, None).await?;
//! println!("{} users", response.len());
//! ```

use serde::de::DeserializeOwned;

use crate::clients::{
    DataType, FormParameters, HttpClient, HttpError, HttpMethod, HttpRequest, MultipartForm,
    RequestBody,
};
use crate::codec::JsonCodec;
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::resource::{ApiResource, Endpoint};
use crate::response::TypedResponse;

const CONTENT_TYPE: &str = "Content-Type";

/// Per-call additions applied after the resource's own request is built.
///
/// Headers replace same-named defaults, and query parameters replace
/// same-named parameters derived from resource fields. A `Content-Type`
/// passed to [`header`](Self::header) is ignored; use
/// [`content_type`](Self::content_type) to change the body's content type.
///
/// # Example
///
/// ```rust
/// use api_resource::RequestOverrides;
///
/// let overrides = RequestOverrides::new()
///     .header("X-Trace-Id", "abc")
///     .query_param("page", "3");
///
/// assert_eq!(overrides.headers().len(), 1);
/// assert_eq!(overrides.query().len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOverrides {
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    content_type: Option<String>,
}

impl RequestOverrides {
    /// Creates an empty set of overrides.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            headers: Vec::new(),
            query: Vec::new(),
            content_type: None,
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Replaces the content type of a JSON-bodied request.
    ///
    /// Form and multipart submissions always use their own content type.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns the extra headers.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the extra query parameters.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns the explicit content type, if set.
    #[must_use]
    pub fn explicit_content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

/// Where the parameters of a form submission are encoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormEncoding {
    /// A URL-encoded request body; the method defaults to POST.
    #[default]
    Body,
    /// The query string, with no body; the method defaults to GET.
    Query,
}

impl FormEncoding {
    /// Returns the method used when the caller does not pick one.
    #[must_use]
    pub const fn default_method(self) -> HttpMethod {
        match self {
            Self::Body => HttpMethod::Post,
            Self::Query => HttpMethod::Get,
        }
    }
}

/// The payload chosen at the call site.
enum Submission {
    /// The resource's own body, if it has one.
    Declared,
    Form {
        params: FormParameters,
        encoding: FormEncoding,
    },
    Multipart(MultipartForm),
}

/// Dispatches resources and returns typed responses.
///
/// The service holds no per-call state: cloning it is cheap, and any number
/// of calls may run concurrently on clones or on a shared reference.
///
/// # Thread Safety
///
/// `RemoteService` is `Send + Sync`.
#[derive(Clone, Debug)]
pub struct RemoteService {
    client: HttpClient,
    codec: JsonCodec,
}

// Verify RemoteService is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RemoteService>();
};

impl RemoteService {
    /// Creates a service around an existing client and codec.
    #[must_use]
    pub const fn new(client: HttpClient, codec: JsonCodec) -> Self {
        Self { client, codec }
    }

    /// Creates a service, and its HTTP client, from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the HTTP client cannot be created.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(HttpClient::new(config)?, config.codec().clone()))
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Returns the JSON codec.
    #[must_use]
    pub const fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    // ------------------------------------------------------------------
    // Prepared requests
    // ------------------------------------------------------------------

    /// Builds the request `dispatch` would send, without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Resolution`] if the path cannot be resolved,
    /// [`ApiError::Decoding`] if the body cannot be encoded, and
    /// [`ApiError::Transport`] if an override is not valid HTTP.
    pub fn prepare<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        method: HttpMethod,
        overrides: Option<&RequestOverrides>,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(resource, method, Submission::Declared, overrides)
    }

    /// Builds a GET request for `resource`.
    ///
    /// # Errors
    ///
    /// See [`prepare`](Self::prepare).
    pub fn prepare_get<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        overrides: Option<&RequestOverrides>,
    ) -> Result<HttpRequest, ApiError> {
        self.prepare(resource, HttpMethod::Get, overrides)
    }

    /// Builds a POST request for `resource`.
    ///
    /// # Errors
    ///
    /// See [`prepare`](Self::prepare).
    pub fn prepare_post<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        overrides: Option<&RequestOverrides>,
    ) -> Result<HttpRequest, ApiError> {
        self.prepare(resource, HttpMethod::Post, overrides)
    }

    /// Builds a PUT request for `resource`.
    ///
    /// # Errors
    ///
    /// See [`prepare`](Self::prepare).
    pub fn prepare_put<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        overrides: Option<&RequestOverrides>,
    ) -> Result<HttpRequest, ApiError> {
        self.prepare(resource, HttpMethod::Put, overrides)
    }

    /// Builds a form submission for `resource`.
    ///
    /// # Errors
    ///
    /// See [`prepare`](Self::prepare).
    pub fn prepare_submit_form<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        params: FormParameters,
        encoding: FormEncoding,
        method: Option<HttpMethod>,
        overrides: Option<&RequestOverrides>,
    ) -> Result<HttpRequest, ApiError> {
        let method = method.unwrap_or_else(|| encoding.default_method());
        self.build_request(
            resource,
            method,
            Submission::Form { params, encoding },
            overrides,
        )
    }

    /// Builds a multipart submission for `resource`.
    ///
    /// # Errors
    ///
    /// See [`prepare`](Self::prepare).
    pub fn prepare_submit_form_with_binary_data<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        form: MultipartForm,
        method: Option<HttpMethod>,
        overrides: Option<&RequestOverrides>,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            resource,
            method.unwrap_or(HttpMethod::Post),
            Submission::Multipart(form),
            overrides,
        )
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Sends `resource` with an explicit method and decodes the response.
    ///
    /// Dropping the returned future aborts the request and any pending decode.
    ///
    /// # Errors
    ///
    /// Returns one of:
    /// - [`ApiError::Resolution`] if the path cannot be resolved (nothing is sent)
    /// - [`ApiError::Transport`] for network failures, timeouts, and non-2xx
    ///   statuses while success is expected
    /// - [`ApiError::Decoding`] if the body does not match `R::Response`
    pub async fn dispatch<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        method: HttpMethod,
        overrides: Option<&RequestOverrides>,
    ) -> Result<TypedResponse<R::Response>, ApiError> {
        let request = self.prepare(resource, method, overrides)?;
        self.send(&request).await
    }

    /// Sends a GET request for `resource`.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn get<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        overrides: Option<&RequestOverrides>,
    ) -> Result<TypedResponse<R::Response>, ApiError> {
        self.dispatch(resource, HttpMethod::Get, overrides).await
    }

    /// Sends a POST request for `resource`.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn post<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        overrides: Option<&RequestOverrides>,
    ) -> Result<TypedResponse<R::Response>, ApiError> {
        self.dispatch(resource, HttpMethod::Post, overrides).await
    }

    /// Sends a PUT request for `resource`.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn put<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        overrides: Option<&RequestOverrides>,
    ) -> Result<TypedResponse<R::Response>, ApiError> {
        self.dispatch(resource, HttpMethod::Put, overrides).await
    }

    /// Sends a PATCH request for `resource`.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn patch<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        overrides: Option<&RequestOverrides>,
    ) -> Result<TypedResponse<R::Response>, ApiError> {
        self.dispatch(resource, HttpMethod::Patch, overrides).await
    }

    /// Sends a DELETE request for `resource`.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn delete<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        overrides: Option<&RequestOverrides>,
    ) -> Result<TypedResponse<R::Response>, ApiError> {
        self.dispatch(resource, HttpMethod::Delete, overrides).await
    }

    /// Submits URL-encoded form parameters to `resource`.
    ///
    /// With [`FormEncoding::Body`] the parameters form the request body and
    /// the method defaults to POST. With [`FormEncoding::Query`] they are
    /// appended to the query string, no body is sent, and the method defaults
    /// to GET. The resource's own body, if any, is not sent.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn submit_form<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        params: FormParameters,
        encoding: FormEncoding,
        method: Option<HttpMethod>,
        overrides: Option<&RequestOverrides>,
    ) -> Result<TypedResponse<R::Response>, ApiError> {
        let request = self.prepare_submit_form(resource, params, encoding, method, overrides)?;
        self.send(&request).await
    }

    /// Submits a multipart form to `resource`.
    ///
    /// The method defaults to POST. The resource's own body, if any, is not
    /// sent.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn submit_form_with_binary_data<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        form: MultipartForm,
        method: Option<HttpMethod>,
        overrides: Option<&RequestOverrides>,
    ) -> Result<TypedResponse<R::Response>, ApiError> {
        let request =
            self.prepare_submit_form_with_binary_data(resource, form, method, overrides)?;
        self.send(&request).await
    }

    /// Sends a prepared request and decodes its response into `Body`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] or [`ApiError::Decoding`].
    pub async fn send<Body: DeserializeOwned>(
        &self,
        request: &HttpRequest,
    ) -> Result<TypedResponse<Body>, ApiError> {
        tracing::debug!("Dispatching {} {}", request.http_method, request.path);

        let response = self.client.execute(request).await?;
        tracing::debug!(
            "Received {} for {} {}; decoding into {}",
            response.code,
            request.http_method,
            request.path,
            std::any::type_name::<Body>()
        );

        let typed = TypedResponse::from_http_response(response, &self.codec)?;
        Ok(typed)
    }

    fn build_request<R: ApiResource + ?Sized>(
        &self,
        resource: &R,
        method: HttpMethod,
        submission: Submission,
        overrides: Option<&RequestOverrides>,
    ) -> Result<HttpRequest, ApiError> {
        let endpoint = resource.endpoint();
        let (path, mut query) = endpoint.node().resolve()?.into_parts();

        let body = match submission {
            Submission::Declared => match endpoint {
                Endpoint::Plain(_) => None,
                Endpoint::WithBody { body, .. } => Some(RequestBody::Json(self.codec.encode(body)?)),
            },
            Submission::Form {
                params,
                encoding: FormEncoding::Body,
            } => Some(RequestBody::Form(params)),
            Submission::Form {
                params,
                encoding: FormEncoding::Query,
            } => {
                query.extend(params.into_pairs());
                None
            }
            Submission::Multipart(form) => Some(RequestBody::Multipart(form)),
        };

        let mut headers = Vec::new();
        let is_json = body.as_ref().map(RequestBody::data_type) == Some(DataType::Json);
        if is_json {
            headers.push((
                CONTENT_TYPE.to_string(),
                DataType::Json.as_content_type().to_string(),
            ));
        }

        if let Some(overrides) = overrides {
            if !overrides.query.is_empty() {
                query.retain(|(name, _)| !overrides.query.iter().any(|(key, _)| key == name));
                query.extend(overrides.query.iter().cloned());
            }

            for (name, value) in &overrides.headers {
                if name.eq_ignore_ascii_case(CONTENT_TYPE) {
                    tracing::warn!(
                        "Ignoring Content-Type header override for {} {}; use RequestOverrides::content_type instead",
                        method,
                        path
                    );
                    continue;
                }
                headers.push((name.clone(), value.clone()));
            }

            if let Some(content_type) = &overrides.content_type {
                if body.is_none() || is_json {
                    headers.retain(|(name, _)| !name.eq_ignore_ascii_case(CONTENT_TYPE));
                    headers.push((CONTENT_TYPE.to_string(), content_type.clone()));
                } else {
                    tracing::warn!(
                        "Ignoring content type override for {} {}; form submissions set their own",
                        method,
                        path
                    );
                }
            }
        }

        let mut builder = HttpRequest::builder(method, path).query(query);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        builder.build().map_err(|e| HttpError::from(e).into())
    }
}
