//! Configuration types for the API resource client.
//!
//! This module provides the configuration used to construct an
//! [`HttpClient`](crate::clients::HttpClient) and, through it, a
//! [`RemoteService`](crate::RemoteService).
//!
//! # Overview
//!
//! - [`ClientConfig`]: Immutable client settings
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`BaseUrl`]: A validated base URL
//! - [`AccessToken`]: A validated access token with masked debug output
//!
//! # Example
//!
//! ```rust
//! use api_resource::{AccessToken, BaseUrl, ClientConfig};
//! use std::time::Duration;
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com/v1").unwrap())
//!     .access_token(AccessToken::new("Bearer abc123").unwrap())
//!     .request_timeout(Duration::from_secs(5))
//!     .logging_enabled(true)
//!     .build()
//!     .unwrap();
//!
//! assert!(config.expect_success());
//! ```

mod newtypes;

pub use newtypes::{AccessToken, BaseUrl};

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};

use crate::codec::JsonCodec;
use crate::error::ConfigError;

/// Default transport timeout applied to every request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Configuration for the API resource client.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
///
/// # Example
///
/// ```rust
/// use api_resource::{BaseUrl, ClientConfig};
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("http://localhost:8080").unwrap())
///     .default_header("X-Client", "docs")
///     .expect_success(false)
///     .build()
///     .unwrap();
///
/// assert!(!config.expect_success());
/// assert_eq!(config.default_headers().get("X-Client").map(String::as_str), Some("docs"));
/// ```
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: BaseUrl,
    access_token: Option<AccessToken>,
    default_headers: BTreeMap<String, String>,
    logging_enabled: bool,
    expect_success: bool,
    request_timeout: Duration,
    user_agent_prefix: Option<String>,
    codec: JsonCodec,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the access token, if configured.
    #[must_use]
    pub const fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    /// Returns the configured default headers.
    #[must_use]
    pub const fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    /// Returns whether request/response logging is enabled.
    #[must_use]
    pub const fn logging_enabled(&self) -> bool {
        self.logging_enabled
    }

    /// Returns whether non-2xx responses are turned into errors.
    #[must_use]
    pub const fn expect_success(&self) -> bool {
        self.expect_success
    }

    /// Returns the transport-level request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the JSON codec settings.
    #[must_use]
    pub const fn codec(&self) -> &JsonCodec {
        &self.codec
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// `base_url` is the only required field.
///
/// # Defaults
///
/// - `access_token`: `None`
/// - `default_headers`: empty
/// - `logging_enabled`: `false`
/// - `expect_success`: `true`
/// - `request_timeout`: 20 seconds
/// - `user_agent_prefix`: `None`
/// - `codec`: [`JsonCodec::default`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<BaseUrl>,
    access_token: Option<AccessToken>,
    default_headers: BTreeMap<String, String>,
    logging_enabled: Option<bool>,
    expect_success: Option<bool>,
    request_timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
    codec: Option<JsonCodec>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the access token sent in the `Authorization` header.
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Adds a header sent with every request.
    ///
    /// Validated when [`build`](Self::build) is called.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Enables `info`-level logging of every request and response.
    #[must_use]
    pub const fn logging_enabled(mut self, enabled: bool) -> Self {
        self.logging_enabled = Some(enabled);
        self
    }

    /// Sets whether a non-2xx response fails the call.
    #[must_use]
    pub const fn expect_success(mut self, expect: bool) -> Self {
        self.expect_success = Some(expect);
        self
    }

    /// Sets the transport-level timeout applied to every request.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the JSON codec used for request and response bodies.
    #[must_use]
    pub const fn codec(mut self, codec: JsonCodec) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Builds the [`ClientConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set,
    /// or [`ConfigError::InvalidHeader`] if a default header is not valid HTTP.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        for (name, value) in &self.default_headers {
            validate_header(name, value)?;
        }

        Ok(ClientConfig {
            base_url,
            access_token: self.access_token,
            default_headers: self.default_headers,
            logging_enabled: self.logging_enabled.unwrap_or(false),
            expect_success: self.expect_success.unwrap_or(true),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            user_agent_prefix: self.user_agent_prefix,
            codec: self.codec.unwrap_or_default(),
        })
    }
}

fn validate_header(name: &str, value: &str) -> Result<(), ConfigError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> BaseUrl {
        BaseUrl::new("https://api.example.com").unwrap()
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientConfigBuilder::new().build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "base_url" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ClientConfig::builder().base_url(base_url()).build().unwrap();

        assert!(config.access_token().is_none());
        assert!(config.default_headers().is_empty());
        assert!(!config.logging_enabled());
        assert!(config.expect_success());
        assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        assert!(config.user_agent_prefix().is_none());
        assert_eq!(config.codec(), &JsonCodec::default());
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let codec = JsonCodec::new().pretty_print(false).explicit_nulls(true);
        let config = ClientConfig::builder()
            .base_url(base_url())
            .access_token(AccessToken::new("Bearer t").unwrap())
            .default_header("X-Tenant", "acme")
            .logging_enabled(true)
            .expect_success(false)
            .request_timeout(Duration::from_millis(250))
            .user_agent_prefix("MyApp/1.0")
            .codec(codec.clone())
            .build()
            .unwrap();

        assert_eq!(config.access_token().unwrap().as_ref(), "Bearer t");
        assert_eq!(
            config.default_headers().get("X-Tenant"),
            Some(&"acme".to_string())
        );
        assert!(config.logging_enabled());
        assert!(!config.expect_success());
        assert_eq!(config.request_timeout(), Duration::from_millis(250));
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
        assert_eq!(config.codec(), &codec);
    }

    #[test]
    fn test_builder_rejects_invalid_header_name() {
        let result = ClientConfig::builder()
            .base_url(base_url())
            .default_header("X Bad Name", "value")
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidHeader { name, .. }) if name == "X Bad Name"
        ));
    }

    #[test]
    fn test_builder_rejects_invalid_header_value() {
        let result = ClientConfig::builder()
            .base_url(base_url())
            .default_header("X-Ok", "line\nbreak")
            .build();

        assert!(matches!(result, Err(ConfigError::InvalidHeader { .. })));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientConfig>();
    }

    #[test]
    fn test_config_debug_masks_access_token() {
        let config = ClientConfig::builder()
            .base_url(base_url())
            .access_token(AccessToken::new("very-secret").unwrap())
            .build()
            .unwrap();

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("ClientConfig"));
        assert!(!debug_str.contains("very-secret"));
    }
}
