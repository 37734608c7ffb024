//! HTTP transport for the API resource client.
//!
//! This module provides the [`HttpClient`] type, a thin layer over
//! `reqwest` that applies the configured base URL, default headers, timeout,
//! and success policy to every [`HttpRequest`].

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::clients::errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
use crate::clients::http_request::{DataType, HttpRequest, RequestBody};
use crate::clients::http_response::HttpResponse;
use crate::config::{BaseUrl, ClientConfig};
use crate::error::ConfigError;

/// Library version from Cargo.toml.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Headers whose values are never written to logs.
const MASKED_HEADERS: [&str; 3] = ["authorization", "cookie", "set-cookie"];

/// HTTP client shared by every call made through a
/// [`RemoteService`](crate::RemoteService).
///
/// The client handles:
/// - URL construction from the configured [`BaseUrl`]
/// - Default headers including User-Agent, Accept, and Authorization
/// - The transport timeout
/// - Rejecting non-2xx responses when success is expected
/// - Optional `info`-level request/response logging
///
/// Cloning is cheap: the underlying connection pool is shared.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use api_resource::{BaseUrl, ClientConfig};
/// use api_resource::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://api.example.com").unwrap())
///     .build()
///     .unwrap();
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/users").build()?;
/// let response = client.execute(&request).await?;
/// println!("{}", response.body_text());
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: BaseUrl,
    /// Headers sent with every request, in application order.
    default_headers: Vec<(String, String)>,
    logging_enabled: bool,
    expect_success: bool,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the underlying `reqwest` client
    /// cannot be created (e.g. TLS initialization failure).
    ///
    /// # Example
    ///
    /// ```rust
    /// use api_resource::{AccessToken, BaseUrl, ClientConfig};
    /// use api_resource::clients::HttpClient;
    ///
    /// let config = ClientConfig::builder()
    ///     .base_url(BaseUrl::new("https://api.example.com").unwrap())
    ///     .access_token(AccessToken::new("Bearer abc").unwrap())
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = HttpClient::new(&config).unwrap();
    /// assert_eq!(client.base_url().as_ref(), "https://api.example.com");
    /// ```
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::Transport {
                reason: e.to_string(),
            })?;

        Ok(Self::with_reqwest_client(client, config))
    }

    /// Creates a client around an existing `reqwest` client.
    ///
    /// The configured timeout is not applied; the given client's own settings
    /// are used instead.
    #[must_use]
    pub fn with_reqwest_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url().clone(),
            default_headers: Self::build_default_headers(config),
            logging_enabled: config.logging_enabled(),
            expect_success: config.expect_success(),
        }
    }

    fn build_default_headers(config: &ClientConfig) -> Vec<(String, String)> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!(
            "{user_agent_prefix}api-resource-client v{CLIENT_VERSION} | Rust {rust_version}"
        );

        let mut headers = vec![
            ("User-Agent".to_string(), user_agent),
            ("Accept".to_string(), "application/json".to_string()),
        ];

        if let Some(token) = config.access_token() {
            headers.push(("Authorization".to_string(), token.as_ref().to_string()));
        }

        for (name, value) in config.default_headers() {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }

        headers
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the headers sent with every request.
    #[must_use]
    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    /// Returns the value of the default header `name` (case-insensitive).
    #[must_use]
    pub fn default_header(&self, name: &str) -> Option<&str> {
        self.default_headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns whether non-2xx responses are turned into errors.
    #[must_use]
    pub const fn expect_success(&self) -> bool {
        self.expect_success
    }

    /// Returns whether request/response logging is enabled.
    #[must_use]
    pub const fn logging_enabled(&self) -> bool {
        self.logging_enabled
    }

    /// Sends an HTTP request and materializes the whole response.
    ///
    /// This method handles:
    /// - Request validation
    /// - URL construction
    /// - Header merging (request headers replace same-named defaults)
    /// - Body encoding for JSON, URL-encoded, and multipart payloads
    /// - Reading the full response body
    /// - The success policy
    ///
    /// Dropping the returned future cancels the exchange.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - A network error or timeout occurs (`Network`)
    /// - A non-2xx response is received while success is expected (`Response`)
    pub async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.base_url.join(&request.path);
        let headers = self.merge_headers(request)?;
        let request_headers = self.logging_enabled.then(|| {
            header_summary(
                headers
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.to_str().unwrap_or("<binary>"))),
            )
        });

        let mut req_builder = self
            .client
            .request(request.http_method.as_reqwest(), &url)
            .headers(headers);

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        req_builder = match &request.body {
            None => req_builder,
            Some(RequestBody::Json(bytes)) => req_builder.body(bytes.clone()),
            Some(RequestBody::Form(params)) => req_builder.form(params.pairs()),
            Some(RequestBody::Multipart(form)) => req_builder.multipart(form.to_reqwest()?),
        };

        if let Some(request_headers) = &request_headers {
            tracing::info!("Sending {} request to {}", request.http_method, url);
            tracing::debug!(
                "Request headers for {} {}: {}",
                request.http_method,
                url,
                request_headers
            );
        }

        let request_time = Utc::now();
        let res = req_builder.send().await?;
        let response_time = Utc::now();

        let code = res.status().as_u16();
        let version = res.version();
        let res_headers = HttpResponse::parse_headers(res.headers());
        let body = res.bytes().await?.to_vec();

        let response = HttpResponse::new(code, res_headers, body).with_metadata(
            version,
            request_time,
            response_time,
        );

        if self.logging_enabled {
            tracing::info!(
                "Received {} from {} {} in {} ms ({} bytes)",
                code,
                request.http_method,
                url,
                (response_time - request_time).num_milliseconds(),
                response.body.len()
            );
            tracing::debug!(
                "Response headers for {} {}: {}",
                request.http_method,
                url,
                header_summary(response.headers.iter().flat_map(|(name, values)| {
                    values.iter().map(move |value| (name.as_str(), value.as_str()))
                }))
            );
        }

        if self.expect_success && !response.is_ok() {
            return Err(HttpResponseError::from_response(response).into());
        }

        Ok(response)
    }

    /// Applies default headers, then request headers, then the body's
    /// content type.
    ///
    /// URL-encoded and multipart bodies always use the content type `reqwest`
    /// computes for them, so any inherited `Content-Type` is dropped.
    fn merge_headers(&self, request: &HttpRequest) -> Result<HeaderMap, InvalidHttpRequestError> {
        let mut headers = HeaderMap::new();
        for (name, value) in self.default_headers.iter().chain(&request.headers) {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                InvalidHttpRequestError::InvalidHeaderName { name: name.clone() }
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                InvalidHttpRequestError::InvalidHeaderValue { name: name.clone() }
            })?;
            headers.insert(header_name, header_value);
        }

        match request.body.as_ref().map(RequestBody::data_type) {
            Some(DataType::Json) if !headers.contains_key(CONTENT_TYPE) => {
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static(DataType::Json.as_content_type()),
                );
            }
            Some(DataType::FormUrlEncoded | DataType::Multipart) => {
                headers.remove(CONTENT_TYPE);
            }
            _ => {}
        }

        Ok(headers)
    }
}

/// Renders headers as `name: value` pairs for logging, masking credentials.
fn header_summary<'a>(headers: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    headers
        .into_iter()
        .map(|(name, value)| {
            if MASKED_HEADERS
                .iter()
                .any(|masked| name.eq_ignore_ascii_case(masked))
            {
                format!("{name}: *****")
            } else {
                format!("{name}: {value}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::http_request::HttpMethod;
    use crate::config::AccessToken;

    fn config_builder() -> crate::config::ClientConfigBuilder {
        ClientConfig::builder().base_url(BaseUrl::new("https://api.example.com").unwrap())
    }

    fn create_test_client() -> HttpClient {
        HttpClient::new(&config_builder().build().unwrap()).unwrap()
    }

    #[test]
    fn test_client_construction_from_config() {
        let client = create_test_client();

        assert_eq!(client.base_url().as_ref(), "https://api.example.com");
        assert!(client.expect_success());
        assert!(!client.logging_enabled());
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = create_test_client();

        let user_agent = client.default_header("User-Agent").unwrap();
        assert!(user_agent.starts_with("api-resource-client v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = config_builder().user_agent_prefix("MyApp/1.0").build().unwrap();
        let client = HttpClient::new(&config).unwrap();

        let user_agent = client.default_header("user-agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
        assert!(user_agent.contains("api-resource-client"));
    }

    #[test]
    fn test_accept_header_is_json() {
        let client = create_test_client();
        assert_eq!(client.default_header("Accept"), Some("application/json"));
    }

    #[test]
    fn test_access_token_is_sent_verbatim_as_authorization() {
        let config = config_builder()
            .access_token(AccessToken::new("Bearer secret-token").unwrap())
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        assert_eq!(
            client.default_header("Authorization"),
            Some("Bearer secret-token")
        );
    }

    #[test]
    fn test_no_authorization_header_without_token() {
        let client = create_test_client();
        assert!(client.default_header("Authorization").is_none());
    }

    #[test]
    fn test_configured_default_headers_replace_builtin_ones() {
        let config = config_builder()
            .default_header("accept", "application/vnd.example+json")
            .default_header("X-Tenant", "acme")
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        assert_eq!(
            client.default_header("Accept"),
            Some("application/vnd.example+json")
        );
        assert_eq!(client.default_header("x-tenant"), Some("acme"));
        assert_eq!(
            client
                .default_headers()
                .iter()
                .filter(|(name, _)| name.eq_ignore_ascii_case("accept"))
                .count(),
            1
        );
    }

    #[test]
    fn test_merge_headers_request_headers_win() {
        let client = create_test_client();
        let request = HttpRequest::builder(HttpMethod::Get, "/users")
            .header("Accept", "text/plain")
            .build()
            .unwrap();

        let headers = client.merge_headers(&request).unwrap();
        assert_eq!(headers.get("accept").unwrap(), "text/plain");
        assert_eq!(headers.get_all("accept").iter().count(), 1);
    }

    #[test]
    fn test_merge_headers_sets_json_content_type_for_json_body() {
        let client = create_test_client();
        let request = HttpRequest::builder(HttpMethod::Post, "/users")
            .body(RequestBody::Json(b"{}".to_vec()))
            .build()
            .unwrap();

        let headers = client.merge_headers(&request).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_merge_headers_drops_content_type_for_form_body() {
        let config = config_builder()
            .default_header("Content-Type", "application/json")
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();
        let request = HttpRequest::builder(HttpMethod::Post, "/forms")
            .body(RequestBody::Form(crate::clients::FormParameters::new()))
            .build()
            .unwrap();

        let headers = client.merge_headers(&request).unwrap();
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_header_summary_masks_credentials() {
        let summary = header_summary([
            ("accept", "application/json"),
            ("Authorization", "Bearer secret-token"),
            ("set-cookie", "session=abc"),
        ]);

        assert_eq!(
            summary,
            "accept: application/json, Authorization: *****, set-cookie: *****"
        );
        assert!(!summary.contains("secret-token"));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
