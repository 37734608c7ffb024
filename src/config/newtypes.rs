//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated base URL that every resolved resource path is appended to.
///
/// The URL must be absolute with an `http` or `https` scheme and a non-empty
/// host. It may carry a path prefix (e.g. `https://api.example.com/v1`).
/// Trailing slashes are removed so that joining with a resolved path never
/// produces a duplicate separator.
///
/// # Example
///
/// ```rust
/// use api_resource::BaseUrl;
///
/// let url = BaseUrl::new("https://api.example.com/v1/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.example.com/v1");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), "api.example.com");
/// assert_eq!(url.join("/users/7"), "https://api.example.com/v1/users/7");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no `http`/`https`
    /// scheme, no host, or carries a query string or fragment.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = url.into();
        let url = raw.trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidBaseUrl { url: raw.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = &url[..scheme_end];
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(invalid());
        }

        // Host ends at port, path, or end of string
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/'])
            .map_or(url.len(), |i| host_start + i);
        if host_end == host_start {
            return Err(invalid());
        }

        // Query parameters belong to resources, not to the base
        if remainder.contains(['?', '#']) {
            return Err(invalid());
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Appends an absolute resolved path to this base URL.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{}/", self.url)
        } else {
            format!("{}/{path}", self.url)
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// A validated access token sent in the `Authorization` header.
///
/// The token is sent verbatim, so include any scheme prefix yourself
/// (e.g. `"Bearer abc123"`).
///
/// # Security
///
/// The `Debug` implementation masks the token, displaying only
/// `AccessToken(*****)`.
///
/// # Example
///
/// ```rust
/// use api_resource::AccessToken;
///
/// let token = AccessToken::new("Bearer abc123").unwrap();
/// assert_eq!(token.as_ref(), "Bearer abc123");
/// assert_eq!(format!("{:?}", token), "AccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_accepts_http_and_https() {
        assert!(BaseUrl::new("http://localhost:8080").is_ok());
        assert!(BaseUrl::new("https://api.example.com").is_ok());
    }

    #[test]
    fn test_base_url_strips_trailing_slashes() {
        let url = BaseUrl::new("https://api.example.com/v1//").unwrap();
        assert_eq!(url.as_ref(), "https://api.example.com/v1");
    }

    #[test]
    fn test_base_url_rejects_missing_or_foreign_scheme() {
        for input in ["api.example.com", "ftp://files.example.com", "://host"] {
            assert!(
                matches!(BaseUrl::new(input), Err(ConfigError::InvalidBaseUrl { .. })),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_base_url_rejects_empty_host() {
        assert!(BaseUrl::new("https://").is_err());
        assert!(BaseUrl::new("https://:8080").is_err());
    }

    #[test]
    fn test_base_url_rejects_query_string() {
        assert!(BaseUrl::new("https://api.example.com/v1?key=1").is_err());
    }

    #[test]
    fn test_base_url_host_name_with_port() {
        let url = BaseUrl::new("http://127.0.0.1:3000/api").unwrap();
        assert_eq!(url.host_name(), "127.0.0.1");
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_base_url_join_avoids_duplicate_separators() {
        let url = BaseUrl::new("http://localhost/api/").unwrap();
        assert_eq!(url.join("/users"), "http://localhost/api/users");
        assert_eq!(url.join("users"), "http://localhost/api/users");
        assert_eq!(url.join("/"), "http://localhost/api/");
    }

    #[test]
    fn test_access_token_rejects_empty_string() {
        assert!(matches!(
            AccessToken::new(""),
            Err(ConfigError::EmptyAccessToken)
        ));
        assert!(matches!(
            AccessToken::new("   "),
            Err(ConfigError::EmptyAccessToken)
        ));
    }

    #[test]
    fn test_access_token_debug_is_masked() {
        let token = AccessToken::new("super-secret").unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains("super-secret"));
        assert_eq!(debug, "AccessToken(*****)");
    }
}
