//! Forwarding of one inbound request to the backend.

use axum::body::Bytes;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error};

use crate::auth::AccessToken;
use crate::config::ProxyConfig;
use crate::error::unified::PROXY_ERROR_CODE;
use crate::error::{Result, TownError};

pub const PROXY_ERROR_MESSAGE: &str = "proxy request failed";

/// Shared state of the proxy router.
#[derive(Debug, Clone)]
pub struct ProxyState {
    client: reqwest::Client,
    backend_url: String,
    fallback_token: Option<AccessToken>,
}

impl ProxyState {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TownError::Configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &ProxyConfig) -> Self {
        Self {
            client,
            backend_url: config.backend_url.trim_end_matches('/').to_string(),
            fallback_token: config
                .fallback_token
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(AccessToken::new),
        }
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Authorization for the outbound request: the inbound header when
    /// present, otherwise the configured fallback token.
    fn authorization(&self, inbound: &HeaderMap) -> Option<HeaderValue> {
        inbound
            .get(AUTHORIZATION)
            .cloned()
            .or_else(|| self.fallback_token.as_ref().and_then(|t| t.header_value()))
    }
}

/// Why a forwarded call produced no mirrorable response.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("inbound body is not JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),
    #[error("backend request failed: {0}")]
    Backend(#[from] reqwest::Error),
    #[error("backend body is not JSON (status {status})")]
    UnreadableBackendBody { status: u16 },
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error!(error = %self, "proxy request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "code": PROXY_ERROR_CODE,
                "message": PROXY_ERROR_MESSAGE,
            })),
        )
            .into_response()
    }
}

/// Send `method` to `{backend_url}{path}` and mirror the backend's status and
/// JSON body.
pub async fn forward(
    state: &ProxyState,
    method: Method,
    path: &str,
    inbound: &HeaderMap,
    body: Option<Bytes>,
) -> std::result::Result<Response, ProxyError> {
    let url = format!("{}{}", state.backend_url, path);
    let mut request = state
        .client
        .request(method.clone(), &url)
        .header(CONTENT_TYPE, "application/json");
    if let Some(auth) = state.authorization(inbound) {
        request = request.header(AUTHORIZATION, auth);
    }
    if let Some(body) = body {
        let value: Value = serde_json::from_slice(&body).map_err(ProxyError::InvalidBody)?;
        request = request.json(&value);
    }

    let resp = request.send().await?;
    let status = resp.status();
    let bytes = resp.bytes().await?;
    let data: Value = serde_json::from_slice(&bytes).map_err(|_| {
        ProxyError::UnreadableBackendBody {
            status: status.as_u16(),
        }
    })?;
    debug!(%method, url, status = status.as_u16(), "proxied request");
    Ok((status, Json(data)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(fallback: Option<&str>) -> ProxyState {
        ProxyState::with_client(
            reqwest::Client::new(),
            &ProxyConfig {
                backend_url: "http://localhost:8080/api/".to_string(),
                fallback_token: fallback.map(str::to_string),
                ..ProxyConfig::default()
            },
        )
    }

    #[test]
    fn inbound_authorization_wins_over_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer caller"));
        let auth = state(Some("dev")).authorization(&headers);
        assert_eq!(auth, Some(HeaderValue::from_static("Bearer caller")));
    }

    #[test]
    fn fallback_used_without_inbound_header() {
        let auth = state(Some("dev")).authorization(&HeaderMap::new());
        assert_eq!(auth, Some(HeaderValue::from_static("Bearer dev")));
        assert_eq!(state(None).authorization(&HeaderMap::new()), None);
        assert_eq!(state(Some("")).authorization(&HeaderMap::new()), None);
    }

    #[test]
    fn backend_url_loses_trailing_slash() {
        assert_eq!(state(None).backend_url(), "http://localhost:8080/api");
    }
}
