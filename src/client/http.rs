//! Shared reqwest clients.

use reqwest::Url;

use super::request::Credentials;
use crate::config::ClientConfig;
use crate::error::{Result, TownError};

/// The pair of clients backing credential modes.
///
/// `with_cookies` owns the cookie jar that holds the refresh cookie; it must
/// be the client used for login, reissue and every credentialed call.
#[derive(Debug, Clone)]
pub struct HttpClients {
    with_cookies: reqwest::Client,
    without_cookies: reqwest::Client,
    api_origin: Option<String>,
}

impl HttpClients {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let with_cookies = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(10)
            .cookie_store(true)
            .build()
            .map_err(|e| TownError::Configuration(format!("Failed to build HTTP client: {e}")))?;
        let without_cookies = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| TownError::Configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            with_cookies,
            without_cookies,
            api_origin: origin_of(&config.api_base_url),
        })
    }

    /// Client that carries the cookie jar.
    pub fn cookie_client(&self) -> &reqwest::Client {
        &self.with_cookies
    }

    /// Pick the client for a credentials mode and target URL.
    pub fn for_credentials(&self, credentials: Credentials, url: &str) -> &reqwest::Client {
        let include = match credentials {
            Credentials::Include => true,
            Credentials::Omit => false,
            Credentials::SameOrigin => {
                self.api_origin.is_some() && origin_of(url) == self.api_origin
            }
        };
        if include {
            &self.with_cookies
        } else {
            &self.without_cookies
        }
    }
}

/// `scheme://host:port` of a URL, or `None` if it does not parse.
pub fn origin_of(url: &str) -> Option<String> {
    Url::parse(url).ok().map(|u| u.origin().ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_ignores_path_and_query() {
        assert_eq!(
            origin_of("http://localhost:8080/api/meetings?page=0").as_deref(),
            Some("http://localhost:8080")
        );
        assert_eq!(origin_of("not a url"), None);
    }

    #[test]
    fn same_origin_selects_cookie_client_only_for_api_host() {
        let clients = HttpClients::new(&ClientConfig::new("http://localhost:8080")).unwrap();
        let cookie = clients.cookie_client() as *const reqwest::Client;

        let same = clients.for_credentials(Credentials::SameOrigin, "http://localhost:8080/api/x");
        let other = clients.for_credentials(Credentials::SameOrigin, "http://example.com/api/x");
        let omit = clients.for_credentials(Credentials::Omit, "http://localhost:8080/api/x");

        assert!(std::ptr::eq(same, cookie));
        assert!(!std::ptr::eq(other, cookie));
        assert!(!std::ptr::eq(omit, cookie));
    }
}
