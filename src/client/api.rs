//! Envelope-aware API client over [`AuthFetch`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::auth_fetch::AuthFetch;
use super::envelope::{safe_json, ApiResponse};
use super::http::HttpClients;
use super::request::RequestOptions;
use crate::auth::{HttpReissuer, MemoryTokenStore, Session, TokenStore};
use crate::config::ClientConfig;
use crate::error::{Result, TownError};

pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

/// Client for the backend REST API.
///
/// Every resource binding goes through [`ApiClient::fetch_json`], so they all
/// share bearer attachment, 401 recovery and envelope error mapping.
///
/// # Example
/// ```no_run
/// use townsquare::client::ApiClient;
/// use townsquare::config::ClientConfig;
///
/// # async fn example() -> townsquare::error::Result<()> {
/// let api = ApiClient::new(ClientConfig::from_env())?;
/// let categories = townsquare::resources::categories::list(&api).await?;
/// println!("{categories:?}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    fetch: Arc<AuthFetch>,
}

impl ApiClient {
    /// Build a client with an in-memory token store and HTTP reissue.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_token_store(config, Arc::new(MemoryTokenStore::new()))
    }

    pub fn with_token_store(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let clients = HttpClients::new(&config)?;
        let reissuer = HttpReissuer::new(clients.cookie_client().clone(), &config.api_base_url);
        let session = Session::new(store, Arc::new(reissuer));
        Ok(Self::from_parts(config, clients, session))
    }

    /// Assemble from pre-built parts. `session`'s reissuer should share the
    /// cookie jar of `clients`.
    pub fn from_parts(config: ClientConfig, clients: HttpClients, session: Session) -> Self {
        Self {
            config,
            fetch: Arc::new(AuthFetch::new(clients, session)),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        self.fetch.session()
    }

    pub fn auth_fetch(&self) -> &AuthFetch {
        &self.fetch
    }

    pub fn url(&self, path: &str) -> String {
        self.config.url(path)
    }

    /// Authenticated request to an API path; the raw response is returned.
    pub async fn fetch_raw(&self, path: &str, options: RequestOptions) -> Result<reqwest::Response> {
        self.fetch.fetch(&self.url(path), options).await
    }

    /// Authenticated request whose response follows the envelope convention.
    ///
    /// Non-2xx statuses and `success: false` bodies become [`TownError::Api`]
    /// carrying the backend's status, code and message.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>> {
        let resp = self.fetch_raw(path, options).await?;
        let status = resp.status();
        let body: Option<serde_json::Value> = safe_json(resp).await;

        let failed = body
            .as_ref()
            .and_then(|b| b.get("success"))
            .and_then(|s| s.as_bool())
            == Some(false);
        if !status.is_success() || failed {
            return Err(api_error(status.as_u16(), body));
        }

        let body = body.ok_or_else(|| {
            TownError::InvalidResponse(format!("{path} returned an empty or non-JSON body"))
        })?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.fetch_json(path, RequestOptions::get()).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch_json(path, RequestOptions::post().json(body)?).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.fetch_json(path, RequestOptions::post()).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch_json(path, RequestOptions::patch().json(body)?).await
    }

    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.fetch_json(path, RequestOptions::patch()).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.fetch_json(path, RequestOptions::delete()).await
    }
}

fn api_error(status: u16, body: Option<serde_json::Value>) -> TownError {
    let field = |name: &str| {
        body.as_ref()
            .and_then(|b| b.get(name))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };
    TownError::Api {
        status,
        code: field("code"),
        message: field("message").unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_error_uses_envelope_fields() {
        let err = api_error(
            409,
            Some(json!({ "success": false, "code": "USER_001", "message": "taken" })),
        );
        match err {
            TownError::Api {
                status,
                code,
                message,
                body,
            } => {
                assert_eq!(status, 409);
                assert_eq!(code.as_deref(), Some("USER_001"));
                assert_eq!(message, "taken");
                assert!(body.is_some());
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn api_error_without_body_uses_default_message() {
        let err = api_error(502, None);
        assert_eq!(err.code(), None);
        assert_eq!(err.to_string(), format!("API error (status 502): {DEFAULT_ERROR_MESSAGE}"));
    }
}
