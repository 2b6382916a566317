//! Configuration system (layered: code > env > config file > defaults).

pub mod file;

pub use file::ConfigFile;

use std::path::Path;
use std::time::Duration;

use crate::error::{Result, TownError};

/// Local development backend; keeping it on `localhost` avoids cookie-domain
/// mismatches with `127.0.0.1`.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_PROXY_HOST: &str = "127.0.0.1";
pub const DEFAULT_PROXY_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const ENV_API_BASE_URL: &str = "TOWNSQUARE_API_BASE_URL";
pub const ENV_PROXY_HOST: &str = "TOWNSQUARE_PROXY_HOST";
pub const ENV_PROXY_PORT: &str = "TOWNSQUARE_PROXY_PORT";
pub const ENV_BACKEND_URL: &str = "TOWNSQUARE_BACKEND_URL";
pub const ENV_FALLBACK_TOKEN: &str = "TOWNSQUARE_FALLBACK_TOKEN";
pub const ENV_CONFIG_FILE: &str = "TOWNSQUARE_CONFIG";

/// Settings for the authenticated API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin of the backend REST API, without a trailing slash.
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(api_base_url.into()),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from the process environment, falling back to the local default.
    pub fn from_env() -> Self {
        Self::resolve(None, |key| std::env::var(key).ok())
    }

    /// Resolve settings from an optional config file and an env lookup.
    pub fn resolve(file: Option<&ConfigFile>, env: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(client) = file.and_then(|f| f.client.as_ref()) {
            if let Some(url) = &client.api_base_url {
                config.api_base_url = url.clone();
            }
            if let Some(secs) = client.timeout_secs {
                config.timeout = Duration::from_secs(secs);
            }
        }
        if let Some(url) = env(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url;
        }
        config.api_base_url = normalize_base_url(config.api_base_url);
        config
    }

    /// Join an API path (`/api/...`) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base_url, path)
        } else {
            format!("{}/{}", self.api_base_url, path)
        }
    }
}

/// Settings for the same-origin proxy server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    /// Backend prefix the proxy forwards to, e.g. `http://localhost:8080/api`.
    pub backend_url: String,
    /// Development-only bearer token used when an inbound request carries none.
    pub fallback_token: Option<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PROXY_HOST.to_string(),
            port: DEFAULT_PROXY_PORT,
            backend_url: format!("{DEFAULT_API_BASE_URL}/api"),
            fallback_token: None,
        }
    }
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self> {
        Self::resolve(None, |key| std::env::var(key).ok())
    }

    pub fn resolve(
        file: Option<&ConfigFile>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();
        if let Some(proxy) = file.and_then(|f| f.proxy.as_ref()) {
            if let Some(host) = &proxy.host {
                config.host = host.clone();
            }
            if let Some(port) = proxy.port {
                config.port = port;
            }
            if let Some(url) = &proxy.backend_url {
                config.backend_url = url.clone();
            }
            if proxy.fallback_token.is_some() {
                config.fallback_token = proxy.fallback_token.clone();
            }
        }
        if let Some(host) = env(ENV_PROXY_HOST) {
            config.host = host;
        }
        if let Some(port) = env(ENV_PROXY_PORT) {
            config.port = port.parse().map_err(|_| {
                TownError::Configuration(format!("Invalid {ENV_PROXY_PORT}: {port}"))
            })?;
        }
        if let Some(url) = env(ENV_BACKEND_URL) {
            config.backend_url = url;
        }
        if let Some(token) = env(ENV_FALLBACK_TOKEN).filter(|v| !v.is_empty()) {
            config.fallback_token = Some(token);
        }
        config.backend_url = normalize_base_url(config.backend_url);
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load both configs, reading `TOWNSQUARE_CONFIG` (or `path`) as the file layer.
pub fn load(path: Option<&Path>) -> Result<(ClientConfig, ProxyConfig)> {
    let env_path = std::env::var(ENV_CONFIG_FILE).ok();
    let file = match path.or(env_path.as_deref().map(Path::new)) {
        Some(p) => Some(ConfigFile::load(p)?),
        None => None,
    };
    let lookup = |key: &str| std::env::var(key).ok();
    let client = ClientConfig::resolve(file.as_ref(), lookup);
    let proxy = ProxyConfig::resolve(file.as_ref(), lookup)?;
    Ok((client, proxy))
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
