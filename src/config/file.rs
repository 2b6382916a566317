//! Optional TOML config file, the lowest configuration layer above defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TownError};

/// On-disk configuration.
///
/// ```toml
/// [client]
/// api_base_url = "http://localhost:8080"
///
/// [proxy]
/// port = 3000
/// backend_url = "http://localhost:8080/api"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub client: Option<ClientSection>,
    pub proxy: Option<ProxySection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSection {
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub backend_url: Option<String>,
    pub fallback_token: Option<String>,
}

impl ConfigFile {
    /// Read a config file. A missing file is a configuration error: the path
    /// was asked for explicitly.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| {
            TownError::Configuration(format!("Cannot read {}: {err}", path.display()))
        })?;
        toml::from_str(&raw).map_err(|err| {
            TownError::Configuration(format!("Invalid config file {}: {err}", path.display()))
        })
    }
}
